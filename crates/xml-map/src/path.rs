//! Dotted-path access without intermediate error handling.

use crate::node::{Lookup, Selection, XmlMap};
use crate::value::Value;

/// What a dotted path resolved to.
#[derive(Debug, Clone)]
pub enum PathValue {
    /// A single node
    One(XmlMap),
    /// A sequence of nodes
    Many(Vec<XmlMap>),
    /// A scalar produced by a trailing helper, attribute or text step
    Text(Value),
}

impl XmlMap {
    /// Resolves a `.`-separated path of normalized names, numeric indexes,
    /// `@attribute` steps and trailing reserved helper names. Any miss along
    /// the way is `None`; nothing panics and nothing errors.
    ///
    /// ```
    /// # use xml_map::XmlMap;
    /// let m = XmlMap::parse("<a><b><c>13</c><c>14</c></b></a>").unwrap();
    /// assert!(m.sget("b.c.1").is_some());
    /// assert!(m.sget("b.d").is_none());
    /// ```
    pub fn sget(&self, path: &str) -> Option<PathValue> {
        let steps: Vec<&str> = path.split('.').collect();
        let mut current = Selection::One(self.clone());
        for (position, step) in steps.iter().enumerate() {
            let step = *step;
            let last = position + 1 == steps.len();
            if step.is_empty() {
                return None;
            }
            if let Some(attr) = step.strip_prefix('@') {
                // attributes end a path
                let node = match current {
                    Selection::One(node) if last => node,
                    _ => return None,
                };
                return node.attr(attr).map(|text| PathValue::Text(Value::Str(text)));
            }
            if step == "#text" {
                let node = match current {
                    Selection::One(node) if last => node,
                    _ => return None,
                };
                return node.text().map(|text| PathValue::Text(Value::Str(text)));
            }
            if let Ok(index) = step.parse::<usize>() {
                current = match current {
                    Selection::Many(nodes) => Selection::One(nodes.get(index)?.clone()),
                    Selection::One(_) => return None,
                };
                continue;
            }
            let node = match current {
                Selection::One(node) => node,
                Selection::Many(_) => return None,
            };
            current = match node.lookup(step) {
                Lookup::Child(child) => Selection::One(child),
                Lookup::Children(children) => Selection::Many(children),
                Lookup::Reserved(helper) if last => {
                    return match node.invoke(helper) {
                        Ok(value) => value.map(PathValue::Text),
                        Err(_) => None,
                    };
                }
                Lookup::Reserved(_) | Lookup::NotFound => return None,
            };
        }
        Some(match current {
            Selection::One(node) => PathValue::One(node),
            Selection::Many(nodes) => PathValue::Many(nodes),
        })
    }

    /// Whether the dotted path resolves to anything.
    pub fn contains(&self, path: &str) -> bool {
        self.sget(path).is_some()
    }
}

impl PathValue {
    /// The single node, when the path ended on one.
    pub fn one(self) -> Option<XmlMap> {
        match self {
            PathValue::One(node) => Some(node),
            _ => None,
        }
    }

    /// The nodes as a vector, a single node becoming a vector of one.
    pub fn many(self) -> Vec<XmlMap> {
        match self {
            PathValue::One(node) => vec![node],
            PathValue::Many(nodes) => nodes,
            PathValue::Text(_) => Vec::new(),
        }
    }

    /// The scalar, when the path ended on a helper, attribute or text step.
    pub fn value(self) -> Option<Value> {
        match self {
            PathValue::Text(value) => Some(value),
            _ => None,
        }
    }

    /// The scalar as text, when there is one and it is textual.
    pub fn text(self) -> Option<String> {
        match self.value()? {
            Value::Str(text) => Some(text),
            other => Some(other.to_text()),
        }
    }
}
