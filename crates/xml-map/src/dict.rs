//! JSON-shaped construction and extraction.
//!
//! The mapping mirrors the classic element-to-dict convention: attributes
//! become `@`-prefixed keys, direct text becomes `#text` when it has to
//! coexist with other keys, and repeated child tags collapse into arrays.

use serde_json::{Map, Value as Json};
use xml_map_engine::{Document, NodeId};

use crate::error::{Error, Result};
use crate::node::XmlMap;

impl XmlMap {
    /// Builds a document from a JSON object.
    ///
    /// A single-key object whose key is a plain tag name becomes the root
    /// element; any other object is wrapped under a `root` element. Non-object
    /// input is rejected.
    pub fn from_value(value: &Json) -> Result<XmlMap> {
        let object = match value {
            Json::Object(object) => object,
            other => {
                return Err(Error::InvalidInput(format!(
                    "expected a JSON object describing a document, got {other}"
                )))
            }
        };
        let (root_name, body) = match (object.len(), object.iter().next()) {
            (1, Some((key, body))) if !key.starts_with('@') && !key.starts_with('#') => {
                (key.as_str(), body)
            }
            _ => ("root", value),
        };
        let mut doc = Document::new(root_name);
        let root = doc.root();
        apply_value(&mut doc, root, body)?;
        Ok(XmlMap::from_document(doc))
    }

    /// Replaces the content of the child named `tag` with the JSON shape.
    ///
    /// The target is resolved like [`XmlMap::set`]: a unique existing child
    /// is rebuilt in place (keeping its position among its siblings), a
    /// missing one is appended, several are [`Error::AmbiguousAssignment`].
    /// A top-level array applies each object item to the same target, which
    /// matches feeding the shapes one after another.
    pub fn set_from_value(&self, tag: &str, value: &Json) -> Result<XmlMap> {
        let target = self.unique_child(tag)?;
        let mut doc = self.doc.borrow_mut();
        let id = match target {
            Some(id) => {
                doc.clear_element(id);
                id
            }
            None => {
                let id = doc.create_element(tag);
                doc.append_child(self.node, id);
                id
            }
        };
        match value {
            Json::Array(items) => {
                for item in items {
                    if !item.is_object() {
                        return Err(Error::InvalidInput(format!(
                            "array items under `{tag}` must be objects, got {item}"
                        )));
                    }
                    apply_value(&mut doc, id, item)?;
                }
            }
            other => apply_value(&mut doc, id, other)?,
        }
        drop(doc);
        Ok(self.derived(id))
    }

    /// JSON rendition of the wrapped subtree, keyed by the root tag name.
    pub fn to_value(&self) -> Json {
        let doc = self.doc.borrow();
        let mut object = Map::new();
        object.insert(
            doc.name(self.node).to_string(),
            element_to_value(&doc, self.node),
        );
        Json::Object(object)
    }
}

/// Writes a JSON shape into an existing, already cleared element.
fn apply_value(doc: &mut Document, node: NodeId, value: &Json) -> Result<()> {
    match value {
        Json::Object(object) => {
            for (key, item) in object {
                if let Some(attr) = key.strip_prefix('@') {
                    doc.set_attribute(node, attr, &json_scalar_text(item)?);
                } else if key == "#text" {
                    doc.set_text(node, &json_scalar_text(item)?);
                } else if let Json::Array(items) = item {
                    for entry in items {
                        let child = doc.create_element(key);
                        doc.append_child(node, child);
                        apply_value(doc, child, entry)?;
                    }
                } else {
                    let child = doc.create_element(key);
                    doc.append_child(node, child);
                    apply_value(doc, child, item)?;
                }
            }
            Ok(())
        }
        Json::Array(_) => Err(Error::InvalidInput(
            "nested arrays have no XML form".to_string(),
        )),
        Json::Null => Ok(()),
        scalar => {
            doc.set_text(node, &json_scalar_text(scalar)?);
            Ok(())
        }
    }
}

/// Stringifies a JSON scalar for storage as text or an attribute value.
fn json_scalar_text(value: &Json) -> Result<String> {
    match value {
        Json::String(text) => Ok(text.clone()),
        Json::Bool(true) => Ok("true".to_string()),
        Json::Bool(false) => Ok("false".to_string()),
        Json::Number(number) => Ok(number.to_string()),
        Json::Null => Ok(String::new()),
        other => Err(Error::InvalidInput(format!(
            "expected a scalar, got {other}"
        ))),
    }
}

/// Converts an element to its JSON body, not including its own tag key.
fn element_to_value(doc: &Document, node: NodeId) -> Json {
    let attributes = doc.attributes(node);
    let children = doc.children(node);
    let text = doc
        .text(node)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string);

    if attributes.is_empty() && children.is_empty() {
        return match text {
            Some(text) => Json::String(text),
            None => Json::Null,
        };
    }

    let mut object = Map::new();
    for (key, value) in attributes {
        object.insert(format!("@{key}"), Json::String(value.clone()));
    }
    if let Some(text) = text {
        object.insert("#text".to_string(), Json::String(text));
    }
    for &child in children {
        let key = doc.name(child).to_string();
        let body = element_to_value(doc, child);
        match object.get_mut(&key) {
            None => {
                object.insert(key, body);
            }
            Some(Json::Array(items)) => items.push(body),
            Some(existing) => {
                let first = existing.take();
                *existing = Json::Array(vec![first, body]);
            }
        }
    }
    Json::Object(object)
}
