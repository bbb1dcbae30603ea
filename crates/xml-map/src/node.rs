//! The node wrapper: dictionary- and normalized-name access over one element
//! of a shared document tree.

use std::cell::RefCell;
use std::fmt;
use std::ops::Index;
use std::rc::Rc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};
use xml_map_engine::{Document, NodeId};

use crate::error::{Error, Result};
use crate::helpers;
use crate::value::{Helper, Value};

/// Wrapper over one element of a shared document tree.
///
/// Cloning is cheap (a document handle plus a node handle), and every
/// wrapper derived from the same document observes mutations made through
/// any other one. The wrapper never owns tree storage; the arena lives in
/// the shared [`Document`].
#[derive(Clone)]
pub struct XmlMap {
    pub(crate) doc: Rc<RefCell<Document>>,
    pub(crate) node: NodeId,
}

/// Result shape of a child lookup.
///
/// Whether a tag name resolves to one node or a sequence depends on how many
/// same-named siblings exist in the document instance; callers must not
/// assume a fixed arity for any tag name.
#[derive(Debug, Clone)]
pub enum Selection {
    /// Exactly one child matched
    One(XmlMap),
    /// Several children matched, in document order
    Many(Vec<XmlMap>),
}

/// Tagged result of a normalized-name lookup.
#[derive(Debug, Clone)]
pub enum Lookup {
    /// Exactly one child tag normalizes to the name
    Child(XmlMap),
    /// Several child tags normalize to the name, in document order
    Children(Vec<XmlMap>),
    /// The name is reserved; apply the helper instead of a child lookup
    Reserved(Helper),
    /// Nothing matched
    NotFound,
}

impl XmlMap {
    /// Parses XML text and wraps the root element.
    ///
    /// Engine parse failures propagate unmodified as [`Error::Engine`].
    pub fn parse(xml: &str) -> Result<Self> {
        Ok(Self::from_document(Document::parse_str(xml)?))
    }

    /// Wraps the root element of an already parsed document.
    pub fn from_document(doc: Document) -> Self {
        let node = doc.root();
        XmlMap {
            doc: Rc::new(RefCell::new(doc)),
            node,
        }
    }

    /// Wraps one element of a shared document, without copying.
    pub fn wrap(doc: Rc<RefCell<Document>>, node: NodeId) -> Self {
        XmlMap { doc, node }
    }

    /// Shared handle to the underlying document.
    pub fn document(&self) -> Rc<RefCell<Document>> {
        Rc::clone(&self.doc)
    }

    /// Handle of the wrapped element.
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub(crate) fn derived(&self, node: NodeId) -> Self {
        XmlMap {
            doc: Rc::clone(&self.doc),
            node,
        }
    }

    /// Original tag name of the wrapped element.
    pub fn tag(&self) -> String {
        self.doc.borrow().name(self.node).to_string()
    }

    /// All direct children, in document order.
    pub fn children(&self) -> Vec<XmlMap> {
        let doc = self.doc.borrow();
        doc.children(self.node)
            .iter()
            .map(|&id| self.derived(id))
            .collect()
    }

    /// Direct children with an exactly matching tag, in document order.
    pub fn children_named(&self, tag: &str) -> Vec<XmlMap> {
        let doc = self.doc.borrow();
        doc.children(self.node)
            .iter()
            .copied()
            .filter(|&id| doc.name(id) == tag)
            .map(|id| self.derived(id))
            .collect()
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.doc.borrow().child_count(self.node)
    }

    /// Whether the node has any children.
    pub fn has_children(&self) -> bool {
        self.child_count() > 0
    }

    /// Dictionary-style access: exact, case-sensitive tag lookup among
    /// direct children.
    ///
    /// One match yields [`Selection::One`], several yield
    /// [`Selection::Many`] in document order, none is [`Error::KeyNotFound`].
    pub fn child(&self, tag: &str) -> Result<Selection> {
        Selection::from_matches(self.children_named(tag))
            .ok_or_else(|| Error::KeyNotFound(tag.to_string()))
    }

    /// Normalized-name lookup with the reserved helper names checked first.
    pub fn lookup(&self, name: &str) -> Lookup {
        if let Some(helper) = Helper::from_name(name) {
            return Lookup::Reserved(helper);
        }
        let normalized = helpers::normalize_tag(name);
        let doc = self.doc.borrow();
        let mut matches: Vec<XmlMap> = doc
            .children(self.node)
            .iter()
            .copied()
            .filter(|&id| helpers::normalize_tag(doc.name(id)) == normalized)
            .map(|id| self.derived(id))
            .collect();
        drop(doc);
        match matches.len() {
            0 => Lookup::NotFound,
            1 => match matches.pop() {
                Some(child) => Lookup::Child(child),
                None => Lookup::NotFound,
            },
            _ => Lookup::Children(matches),
        }
    }

    /// Attribute-style access by normalized name.
    ///
    /// Reserved helper names are reported as [`Error::ReservedName`] rather
    /// than falling through to a child lookup; a name matching nothing is
    /// [`Error::AttributeNotFound`].
    pub fn get_normalized(&self, name: &str) -> Result<Selection> {
        match self.lookup(name) {
            Lookup::Child(child) => Ok(Selection::One(child)),
            Lookup::Children(children) => Ok(Selection::Many(children)),
            Lookup::Reserved(_) => Err(Error::ReservedName(name.to_string())),
            Lookup::NotFound => Err(Error::AttributeNotFound(name.to_string())),
        }
    }

    /// Direct text content, trimmed of surrounding whitespace; `None` when
    /// empty or absent.
    pub fn text(&self) -> Option<String> {
        let doc = self.doc.borrow();
        let text = doc.text(self.node)?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Alias of [`XmlMap::text`], the base of every coercion helper.
    pub fn get(&self) -> Option<String> {
        self.text()
    }

    /// Text content, or `default` when empty or absent.
    pub fn get_or(&self, default: &str) -> String {
        self.text().unwrap_or_else(|| default.to_string())
    }

    /// Applies `callback` to the text content when there is one. Whatever
    /// the callback returns, including an error, is handed back unmodified.
    pub fn get_with<T>(&self, callback: impl FnOnce(&str) -> T) -> Option<T> {
        self.text().map(|text| callback(&text))
    }

    fn require_text(&self) -> Result<String> {
        self.text().ok_or_else(helpers::empty_value)
    }

    /// Text as a boolean; see [`helpers::to_bool`] for the token sets.
    pub fn to_bool(&self) -> Result<bool> {
        helpers::to_bool(&self.require_text()?)
    }

    /// Text as an integer.
    pub fn to_int(&self) -> Result<i64> {
        helpers::to_int(&self.require_text()?)
    }

    /// Text as a float.
    pub fn to_float(&self) -> Result<f64> {
        helpers::to_float(&self.require_text()?)
    }

    /// Text as-is, `""` when empty or absent.
    pub fn to_str(&self) -> String {
        self.text().unwrap_or_default()
    }

    /// Text as a calendar date.
    pub fn to_date(&self) -> Result<NaiveDate> {
        helpers::to_date(&self.require_text()?)
    }

    /// Text as a wall-clock time.
    pub fn to_time(&self) -> Result<NaiveTime> {
        helpers::to_time(&self.require_text()?)
    }

    /// Text as an RFC 3339 datetime.
    pub fn to_datetime(&self) -> Result<DateTime<FixedOffset>> {
        helpers::to_datetime(&self.require_text()?)
    }

    /// Applies a reserved helper selected at run time, as string-driven
    /// dispatch (path access) does. `Get` on an empty node is `Ok(None)`;
    /// every other helper requires text, except `to_str` which falls back
    /// to `""`.
    pub fn invoke(&self, helper: Helper) -> Result<Option<Value>> {
        let value = match helper {
            Helper::Get => return Ok(self.text().map(Value::Str)),
            Helper::ToStr | Helper::ToString => Value::Str(self.to_str()),
            Helper::ToBool => Value::Bool(self.to_bool()?),
            Helper::ToInt => Value::Int(self.to_int()?),
            Helper::ToFloat => Value::Float(self.to_float()?),
            Helper::ToDate => Value::Date(self.to_date()?),
            Helper::ToTime => Value::Time(self.to_time()?),
            Helper::ToDateTime => Value::DateTime(self.to_datetime()?),
        };
        Ok(Some(value))
    }

    /// Value of an attribute on this element.
    pub fn attr(&self, name: &str) -> Option<String> {
        self.doc
            .borrow()
            .attribute(self.node, name)
            .map(str::to_string)
    }

    /// Sets an attribute on this element, stringifying the value with the
    /// fixed [`Value::to_text`] rule.
    pub fn set_attr(&self, name: &str, value: impl Into<Value>) {
        self.doc
            .borrow_mut()
            .set_attribute(self.node, name, &value.into().to_text());
    }

    /// Attribute pairs of this element, in document order.
    pub fn attrs(&self) -> Vec<(String, String)> {
        self.doc.borrow().attributes(self.node).to_vec()
    }

    /// Resolves the unique assignment target for `tag`, or reports
    /// ambiguity without mutating anything.
    pub(crate) fn unique_child(&self, tag: &str) -> Result<Option<NodeId>> {
        let doc = self.doc.borrow();
        let matches: Vec<NodeId> = doc
            .children(self.node)
            .iter()
            .copied()
            .filter(|&id| doc.name(id) == tag)
            .collect();
        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.first().copied()),
            count => Err(Error::AmbiguousAssignment {
                tag: tag.to_string(),
                count,
            }),
        }
    }

    /// Assigns a scalar to the child named `tag`.
    ///
    /// A unique existing child is cleared (text, attributes and children)
    /// and given the stringified value; a missing child is appended as the
    /// last child. Several same-named children are rejected with
    /// [`Error::AmbiguousAssignment`]. Returns a wrapper for the target.
    pub fn set(&self, tag: &str, value: impl Into<Value>) -> Result<XmlMap> {
        let target = self.unique_child(tag)?;
        let text = value.into().to_text();
        let id = {
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
            doc.set_text(id, &text);
            id
        };
        Ok(self.derived(id))
    }

    /// Sets the text of every existing child named `name` (resolved through
    /// normalization like attribute-style access), or appends one child if
    /// none exist. When distinct spellings collide after normalization,
    /// only the first spelling in document order is written.
    pub fn update(&self, name: &str, value: impl Into<Value>) {
        let tag = self.resolve_tag(name);
        let text = value.into().to_text();
        let mut doc = self.doc.borrow_mut();
        let matches: Vec<NodeId> = doc
            .children(self.node)
            .iter()
            .copied()
            .filter(|&id| doc.name(id) == tag)
            .collect();
        if matches.is_empty() {
            let id = doc.create_element(&tag);
            doc.append_child(self.node, id);
            doc.set_text(id, &text);
        } else {
            for id in matches {
                doc.set_text(id, &text);
            }
        }
    }

    /// Like [`XmlMap::set`], but fails with [`Error::AlreadyExists`] when a
    /// child with the tag is already present.
    pub fn create(&self, tag: &str, value: impl Into<Value>) -> Result<XmlMap> {
        if !self.children_named(tag).is_empty() {
            return Err(Error::AlreadyExists(tag.to_string()));
        }
        self.set(tag, value)
    }

    /// Removes every child whose tag matches `name` exactly, or, when
    /// nothing matches exactly, whose tag normalizes to it (first colliding
    /// spelling only, like [`XmlMap::update`]). Returns how many were
    /// removed.
    pub fn delete(&self, name: &str) -> usize {
        let tag = self.resolve_tag(name);
        let mut doc = self.doc.borrow_mut();
        let matches: Vec<NodeId> = doc
            .children(self.node)
            .iter()
            .copied()
            .filter(|&id| doc.name(id) == tag)
            .collect();
        let count = matches.len();
        for id in matches {
            doc.remove_child(self.node, id);
        }
        count
    }

    /// Maps a possibly normalized name back to an original child tag; a
    /// name with no normalized match is returned as-is. When several
    /// distinct spellings normalize to the name, the first one in document
    /// order wins and only its children are targeted.
    fn resolve_tag(&self, name: &str) -> String {
        let doc = self.doc.borrow();
        if doc
            .children(self.node)
            .iter()
            .any(|&id| doc.name(id) == name)
        {
            return name.to_string();
        }
        let normalized = helpers::normalize_tag(name);
        doc.children(self.node)
            .iter()
            .map(|&id| doc.name(id))
            .find(|tag| helpers::normalize_tag(tag) == normalized)
            .map(str::to_string)
            .unwrap_or_else(|| name.to_string())
    }

    /// XML text of the wrapped subtree, original names and attribute order
    /// preserved.
    pub fn to_xml(&self) -> Result<String> {
        Ok(self.doc.borrow().to_xml(self.node)?)
    }

    /// XML text of the whole document, including the captured declaration.
    pub fn to_xml_document(&self) -> Result<String> {
        Ok(self.doc.borrow().to_xml_document()?)
    }

    /// Whole document encoded per its declared encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.doc.borrow().to_bytes()?)
    }

    /// Copies the whole document into a fresh arena and wraps the
    /// corresponding element there. Mutations on the copy are invisible to
    /// the original.
    pub fn deep_clone(&self) -> XmlMap {
        let doc = self.doc.borrow().clone();
        XmlMap {
            doc: Rc::new(RefCell::new(doc)),
            node: self.node,
        }
    }
}

impl fmt::Display for XmlMap {
    /// `<tag attr="val"> (children)`, with `/>` for childless nodes. Shows
    /// the original, non-normalized tag name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let doc = self.doc.borrow();
        write!(f, "<{}", doc.name(self.node))?;
        for (key, value) in doc.attributes(self.node) {
            write!(f, " {key}=\"{value}\"")?;
        }
        let count = doc.child_count(self.node);
        if count == 0 {
            write!(f, "/> (0)")
        } else {
            write!(f, "> ({count})")
        }
    }
}

impl fmt::Debug for XmlMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Serialized-form equality over the wrapped subtrees.
impl PartialEq for XmlMap {
    fn eq(&self, other: &Self) -> bool {
        match (self.to_xml(), other.to_xml()) {
            (Ok(left), Ok(right)) => left == right,
            _ => false,
        }
    }
}

impl IntoIterator for &XmlMap {
    type Item = XmlMap;
    type IntoIter = std::vec::IntoIter<XmlMap>;

    fn into_iter(self) -> Self::IntoIter {
        self.children().into_iter()
    }
}

impl Selection {
    pub(crate) fn from_matches(mut matches: Vec<XmlMap>) -> Option<Selection> {
        match matches.len() {
            0 => None,
            1 => matches.pop().map(Selection::One),
            _ => Some(Selection::Many(matches)),
        }
    }

    /// The single node, or [`Error::NotUnique`] for a sequence.
    pub fn one(self) -> Result<XmlMap> {
        match self {
            Selection::One(node) => Ok(node),
            Selection::Many(nodes) => Err(Error::NotUnique(nodes.len())),
        }
    }

    /// The nodes as a vector, a single node becoming a vector of one.
    pub fn many(self) -> Vec<XmlMap> {
        match self {
            Selection::One(node) => vec![node],
            Selection::Many(nodes) => nodes,
        }
    }

    /// Number of selected nodes, at least 1.
    pub fn len(&self) -> usize {
        match self {
            Selection::One(_) => 1,
            Selection::Many(nodes) => nodes.len(),
        }
    }

    /// A selection is never empty; lookups with no match fail instead.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The node at `index`, in document order.
    pub fn at(&self, index: usize) -> Option<&XmlMap> {
        match self {
            Selection::One(node) => (index == 0).then_some(node),
            Selection::Many(nodes) => nodes.get(index),
        }
    }

    /// Iterates over the selected nodes in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, XmlMap> {
        match self {
            Selection::One(node) => std::slice::from_ref(node).iter(),
            Selection::Many(nodes) => nodes.iter(),
        }
    }

    /// Dictionary-style access through a single selection; a sequence is
    /// [`Error::NotUnique`].
    pub fn child(&self, tag: &str) -> Result<Selection> {
        match self {
            Selection::One(node) => node.child(tag),
            Selection::Many(nodes) => Err(Error::NotUnique(nodes.len())),
        }
    }

    /// Normalized access through a single selection; a sequence is
    /// [`Error::NotUnique`].
    pub fn get_normalized(&self, name: &str) -> Result<Selection> {
        match self {
            Selection::One(node) => node.get_normalized(name),
            Selection::Many(nodes) => Err(Error::NotUnique(nodes.len())),
        }
    }
}

impl Index<usize> for Selection {
    type Output = XmlMap;

    fn index(&self, index: usize) -> &XmlMap {
        match self.at(index) {
            Some(node) => node,
            None => panic!(
                "selection index out of bounds: the len is {} but the index is {}",
                self.len(),
                index
            ),
        }
    }
}

impl IntoIterator for Selection {
    type Item = XmlMap;
    type IntoIter = std::vec::IntoIter<XmlMap>;

    fn into_iter(self) -> Self::IntoIter {
        self.many().into_iter()
    }
}
