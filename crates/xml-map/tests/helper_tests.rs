//! Coercion helpers, the value stringification rule and helper dispatch.

use chrono::{DateTime, NaiveDate, NaiveTime};
use pretty_assertions::assert_eq;
use xml_map::{helpers, Error, Helper, Value, XmlMap};

fn leaf(text: &str) -> XmlMap {
    XmlMap::parse(&format!("<a><v>{text}</v></a>"))
        .unwrap()
        .child("v")
        .unwrap()
        .one()
        .unwrap()
}

#[test]
fn to_bool_accepts_both_token_sets_case_insensitively() {
    for token in ["1", "true", "True", "YES", "on"] {
        assert!(helpers::to_bool(token).unwrap(), "{token}");
    }
    for token in ["0", "false", "False", "NO", "off"] {
        assert!(!helpers::to_bool(token).unwrap(), "{token}");
    }
    assert!(matches!(helpers::to_bool("2"), Err(Error::Conversion(_))));
    assert!(matches!(helpers::to_bool("ok"), Err(Error::Conversion(_))));
}

#[test]
fn numeric_conversions_parse_and_reject() {
    assert_eq!(leaf("-42").to_int().unwrap(), -42);
    assert_eq!(leaf(" 17 ").to_int().unwrap(), 17);
    assert!(leaf("4.5").to_int().is_err());
    assert_eq!(leaf("4.5").to_float().unwrap(), 4.5);
    assert_eq!(leaf("-0.25").to_float().unwrap(), -0.25);
    assert!(leaf("four").to_float().is_err());
}

#[test]
fn to_str_never_fails() {
    assert_eq!(leaf("text").to_str(), "text");
    let empty = XmlMap::parse("<a><v/></a>")
        .unwrap()
        .child("v")
        .unwrap()
        .one()
        .unwrap();
    assert_eq!(empty.to_str(), "");
}

#[test]
fn empty_nodes_fail_every_strict_conversion() {
    let empty = XmlMap::parse("<a><v/></a>")
        .unwrap()
        .child("v")
        .unwrap()
        .one()
        .unwrap();
    assert!(matches!(empty.to_bool(), Err(Error::Conversion(_))));
    assert!(matches!(empty.to_int(), Err(Error::Conversion(_))));
    assert!(matches!(empty.to_date(), Err(Error::Conversion(_))));
}

#[test]
fn to_date_takes_plain_dates_and_datetime_prefixes() {
    let expected = NaiveDate::from_ymd_opt(2016, 9, 30).unwrap();
    assert_eq!(leaf("2016-09-30").to_date().unwrap(), expected);
    assert_eq!(
        leaf("2016-09-30T12:00:00+02:00").to_date().unwrap(),
        expected
    );
    assert!(leaf("30/09/2016").to_date().is_err());
}

#[test]
fn to_time_takes_full_short_and_bare_hour_forms() {
    assert_eq!(
        leaf("21:14:37").to_time().unwrap(),
        NaiveTime::from_hms_opt(21, 14, 37).unwrap()
    );
    assert_eq!(
        leaf("21:14:37.25").to_time().unwrap(),
        NaiveTime::from_hms_milli_opt(21, 14, 37, 250).unwrap()
    );
    assert_eq!(
        leaf("21:14").to_time().unwrap(),
        NaiveTime::from_hms_opt(21, 14, 0).unwrap()
    );
    assert_eq!(
        leaf("9").to_time().unwrap(),
        NaiveTime::from_hms_opt(9, 0, 0).unwrap()
    );
    assert!(leaf("25:00").to_time().is_err());
    assert!(leaf("noon").to_time().is_err());
}

#[test]
fn to_datetime_requires_a_full_offset_timestamp() {
    let parsed = leaf("2016-09-30T21:14:37+02:00").to_datetime().unwrap();
    assert_eq!(
        parsed,
        DateTime::parse_from_rfc3339("2016-09-30T21:14:37+02:00").unwrap()
    );
    assert!(leaf("2016-09-30").to_datetime().is_err());
    assert!(leaf("2016-09-30 21:14:37").to_datetime().is_err());
}

#[test]
fn normalize_tag_lowercases_and_replaces_hyphens() {
    assert_eq!(helpers::normalize_tag("Offer-ID"), "offer_id");
    assert_eq!(helpers::normalize_tag("plain"), "plain");
    assert_eq!(helpers::normalize_tag("A-B-C"), "a_b_c");
}

#[test]
fn value_stringification_round_trips_through_the_parsers() {
    assert_eq!(Value::Bool(true).to_text(), "true");
    assert_eq!(Value::Bool(false).to_text(), "false");
    assert!(helpers::to_bool(&Value::Bool(true).to_text()).unwrap());
    assert_eq!(Value::Int(-3).to_text(), "-3");
    assert_eq!(Value::Float(1.5).to_text(), "1.5");
    assert_eq!(Value::Str("x".into()).to_text(), "x");

    let date = NaiveDate::from_ymd_opt(2017, 1, 31).unwrap();
    assert_eq!(Value::Date(date).to_text(), "2017-01-31");
    assert_eq!(helpers::to_date("2017-01-31").unwrap(), date);

    let time = NaiveTime::from_hms_opt(8, 5, 0).unwrap();
    assert_eq!(Value::Time(time).to_text(), "08:05:00");
    assert_eq!(helpers::to_time("08:05:00").unwrap(), time);

    let datetime = DateTime::parse_from_rfc3339("2017-01-31T08:05:00+01:00").unwrap();
    assert_eq!(Value::DateTime(datetime).to_text(), "2017-01-31T08:05:00+01:00");
    assert_eq!(
        helpers::to_datetime(&Value::DateTime(datetime).to_text()).unwrap(),
        datetime
    );
}

#[test]
fn helper_dispatch_covers_every_reserved_name() {
    for name in Helper::NAMES {
        assert!(Helper::from_name(name).is_some(), "{name}");
    }
    assert_eq!(Helper::from_name("to_int"), Some(Helper::ToInt));
    assert_eq!(Helper::from_name("to_string"), Some(Helper::ToString));
    assert_eq!(Helper::from_name("To_Int"), None);
    assert_eq!(Helper::from_name("brand"), None);
}

#[test]
fn invoke_applies_a_runtime_selected_helper() {
    let node = leaf("5");
    assert_eq!(node.invoke(Helper::ToInt).unwrap(), Some(Value::Int(5)));
    assert_eq!(
        node.invoke(Helper::Get).unwrap(),
        Some(Value::Str("5".to_string()))
    );
    assert!(node.invoke(Helper::ToDate).is_err());

    let empty = XmlMap::parse("<a><v/></a>")
        .unwrap()
        .child("v")
        .unwrap()
        .one()
        .unwrap();
    assert_eq!(empty.invoke(Helper::Get).unwrap(), None);
    assert_eq!(
        empty.invoke(Helper::ToStr).unwrap(),
        Some(Value::Str(String::new()))
    );
    assert!(empty.invoke(Helper::ToInt).is_err());
}
