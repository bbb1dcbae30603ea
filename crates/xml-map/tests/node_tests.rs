//! Read-side behavior: lookups, selections, text access and paths.

use pretty_assertions::assert_eq;
use xml_map::{Error, Lookup, Selection, XmlMap};

const REPLY: &str = r#"<reply>
    <status>ok</status>
    <cars>
        <car id="1">
            <brand>BMW</brand>
            <capacity units="ccm">3000</capacity>
        </car>
        <car id="2">
            <brand>Audi</brand>
            <capacity units="ccm">4000</capacity>
        </car>
    </cars>
</reply>"#;

#[test]
fn child_returns_one_for_a_unique_tag() {
    let m = XmlMap::parse(REPLY).unwrap();
    let status = m.child("status").unwrap();
    assert!(matches!(status, Selection::One(_)));
    assert_eq!(status.one().unwrap().to_str(), "ok");
}

#[test]
fn child_returns_many_for_repeated_tags() {
    let m = XmlMap::parse(REPLY).unwrap();
    let cars = m.child("cars").unwrap().one().unwrap();
    let selection = cars.child("car").unwrap();
    assert_eq!(selection.len(), 2);
    assert!(matches!(selection, Selection::Many(_)));
    let brands: Vec<String> = selection
        .iter()
        .map(|car| car.child("brand").unwrap().one().unwrap().to_str())
        .collect();
    assert_eq!(brands, vec!["BMW".to_string(), "Audi".to_string()]);
}

#[test]
fn child_is_case_sensitive_and_exact() {
    let m = XmlMap::parse("<a><Offer-ID>7</Offer-ID></a>").unwrap();
    assert!(matches!(m.child("offer_id"), Err(Error::KeyNotFound(_))));
    assert!(m.child("Offer-ID").is_ok());
}

#[test]
fn get_normalized_matches_lowercased_underscored_names() {
    let m = XmlMap::parse("<a><Offer-ID>7</Offer-ID></a>").unwrap();
    let child = m.get_normalized("offer_id").unwrap().one().unwrap();
    assert_eq!(child.tag(), "Offer-ID");
    assert_eq!(child.to_int().unwrap(), 7);
}

#[test]
fn get_normalized_rejects_reserved_names() {
    let m = XmlMap::parse("<a><to-int>5</to-int></a>").unwrap();
    assert!(matches!(
        m.get_normalized("to_int"),
        Err(Error::ReservedName(_))
    ));
    // the child stays reachable through exact access
    assert_eq!(m.child("to-int").unwrap().one().unwrap().to_str(), "5");
}

#[test]
fn get_normalized_collects_colliding_spellings_in_order() {
    let m = XmlMap::parse("<a><Model-Name>1</Model-Name><Model_Name>2</Model_Name></a>").unwrap();
    let selection = m.get_normalized("model_name").unwrap();
    assert!(matches!(selection, Selection::Many(_)));
    let texts: Vec<String> = selection.iter().map(|node| node.to_str()).collect();
    assert_eq!(texts, vec!["1".to_string(), "2".to_string()]);
}

#[test]
fn get_normalized_reports_missing_names() {
    let m = XmlMap::parse(REPLY).unwrap();
    assert!(matches!(
        m.get_normalized("missing"),
        Err(Error::AttributeNotFound(_))
    ));
}

#[test]
fn lookup_tags_every_outcome() {
    let m = XmlMap::parse("<a><b>1</b><b>2</b><c>3</c></a>").unwrap();
    assert!(matches!(m.lookup("c"), Lookup::Child(_)));
    assert!(matches!(m.lookup("b"), Lookup::Children(_)));
    assert!(matches!(m.lookup("to_date"), Lookup::Reserved(_)));
    assert!(matches!(m.lookup("d"), Lookup::NotFound));
}

#[test]
fn selection_one_fails_on_many() {
    let m = XmlMap::parse("<a><b>1</b><b>2</b></a>").unwrap();
    let selection = m.child("b").unwrap();
    assert!(matches!(selection.one(), Err(Error::NotUnique(2))));
}

#[test]
fn selection_many_promotes_a_single_node() {
    let m = XmlMap::parse(REPLY).unwrap();
    let nodes = m.child("status").unwrap().many();
    assert_eq!(nodes.len(), 1);
}

#[test]
fn selection_indexes_in_document_order() {
    let m = XmlMap::parse("<a><b>x</b><b>y</b></a>").unwrap();
    let selection = m.child("b").unwrap();
    assert_eq!(selection[0].to_str(), "x");
    assert_eq!(selection[1].to_str(), "y");
    assert!(selection.at(2).is_none());
}

#[test]
fn selection_chains_through_a_single_node() {
    let m = XmlMap::parse(REPLY).unwrap();
    let cars = m.child("cars").unwrap().child("car").unwrap();
    assert_eq!(cars.len(), 2);
    assert!(matches!(cars.child("brand"), Err(Error::NotUnique(2))));
}

#[test]
fn text_is_trimmed_and_none_when_empty() {
    let m = XmlMap::parse("<a><b>  spaced  </b><c/><d></d></a>").unwrap();
    assert_eq!(
        m.child("b").unwrap().one().unwrap().text(),
        Some("spaced".to_string())
    );
    assert_eq!(m.child("c").unwrap().one().unwrap().text(), None);
    assert_eq!(m.child("d").unwrap().one().unwrap().text(), None);
}

#[test]
fn get_or_falls_back_on_empty_nodes() {
    let m = XmlMap::parse("<a><b/><c>v</c></a>").unwrap();
    assert_eq!(m.child("b").unwrap().one().unwrap().get_or("dflt"), "dflt");
    assert_eq!(m.child("c").unwrap().one().unwrap().get_or("dflt"), "v");
}

#[test]
fn get_with_hands_text_to_the_callback() {
    let m = XmlMap::parse("<a><b>21</b><c/></a>").unwrap();
    let doubled = m
        .child("b")
        .unwrap()
        .one()
        .unwrap()
        .get_with(|text| text.parse::<i64>().map(|n| n * 2));
    assert_eq!(doubled, Some(Ok(42)));
    let none = m.child("c").unwrap().one().unwrap().get_with(str::len);
    assert_eq!(none, None);
}

#[test]
fn attributes_keep_document_order() {
    let m = XmlMap::parse(r#"<a z="1" b="2" m="3"/>"#).unwrap();
    assert_eq!(
        m.attrs(),
        vec![
            ("z".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
            ("m".to_string(), "3".to_string()),
        ]
    );
    assert_eq!(m.attr("b").as_deref(), Some("2"));
    assert_eq!(m.attr("q"), None);
}

#[test]
fn display_shows_tag_attrs_and_child_count() {
    let m = XmlMap::parse(REPLY).unwrap();
    assert_eq!(m.to_string(), "<reply> (2)");
    let car = m.sget("cars.car.0").and_then(|v| v.one()).unwrap();
    assert_eq!(car.to_string(), r#"<car id="1"> (2)"#);
    let brand = car.child("brand").unwrap().one().unwrap();
    assert_eq!(brand.to_string(), "<brand/> (0)");
    assert_eq!(format!("{brand:?}"), "<brand/> (0)");
}

#[test]
fn iteration_visits_children_in_order() {
    let m = XmlMap::parse("<a><x/><y/><z/></a>").unwrap();
    let tags: Vec<String> = (&m).into_iter().map(|child| child.tag()).collect();
    assert_eq!(tags, vec!["x", "y", "z"]);
    assert_eq!(m.child_count(), 3);
    assert!(m.has_children());
}

#[test]
fn equality_compares_serialized_subtrees() {
    let left = XmlMap::parse("<a><b>1</b></a>").unwrap();
    let right = XmlMap::parse("<a><b>1</b></a>").unwrap();
    let other = XmlMap::parse("<a><b>2</b></a>").unwrap();
    assert_eq!(left, right);
    assert_ne!(left, other);
}

#[test]
fn sget_walks_names_indexes_and_attributes() {
    let m = XmlMap::parse(REPLY).unwrap();
    let capacity = m.sget("cars.car.1.capacity").and_then(|v| v.one()).unwrap();
    assert_eq!(capacity.to_int().unwrap(), 4000);
    assert_eq!(
        m.sget("cars.car.0.capacity.@units").and_then(|v| v.text()),
        Some("ccm".to_string())
    );
    assert_eq!(
        m.sget("status.#text").and_then(|v| v.text()),
        Some("ok".to_string())
    );
}

#[test]
fn sget_applies_trailing_helpers() {
    let m = XmlMap::parse(REPLY).unwrap();
    let value = m.sget("cars.car.0.capacity.to_int").and_then(|v| v.value());
    assert_eq!(value, Some(xml_map::Value::Int(3000)));
}

#[test]
fn sget_returns_none_on_any_miss() {
    let m = XmlMap::parse(REPLY).unwrap();
    assert!(m.sget("cars.bike").is_none());
    assert!(m.sget("cars.car.9").is_none());
    assert!(m.sget("status.0").is_none());
    assert!(m.sget("cars.car.brand").is_none());
    assert!(m.sget("").is_none());
    // a helper cannot appear mid-path
    assert!(m.sget("status.to_int.more").is_none());
    // a failing conversion is a miss, not a panic
    assert!(m.sget("status.to_int").is_none());
}

#[test]
fn contains_mirrors_sget() {
    let m = XmlMap::parse(REPLY).unwrap();
    assert!(m.contains("cars.car.1.brand"));
    assert!(m.contains("status"));
    assert!(!m.contains("cars.truck"));
}

#[test]
fn sget_resolves_normalized_names() {
    let m = XmlMap::parse("<a><Outer-Box><Inner-Id>9</Inner-Id></Outer-Box></a>").unwrap();
    let inner = m.sget("outer_box.inner_id").and_then(|v| v.one()).unwrap();
    assert_eq!(inner.to_int().unwrap(), 9);
}
