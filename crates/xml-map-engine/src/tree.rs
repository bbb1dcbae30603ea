//! Arena document tree built from quick-xml events.
//!
//! All elements live in one arena owned by [`Document`]; callers address them
//! through [`NodeId`] handles. Detached elements stay allocated, so a handle
//! obtained from a document is valid for the document's whole life.

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};

/// Handle to one element in a [`Document`] arena.
///
/// Handles must only be used with the document they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Captured XML declaration, kept for round-tripping the declared encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDecl {
    /// XML version, normally `1.0`
    pub version: String,
    /// Declared encoding label, if any
    pub encoding: Option<String>,
    /// Standalone flag, if any
    pub standalone: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct ElementData {
    pub(crate) name: String,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) text: Option<String>,
}

/// An XML document: an arena of elements plus the root handle.
///
/// Each element has a tag name, ordered `(name, value)` attribute pairs,
/// ordered children and optional text content. Text content is the text
/// before the first child element; tail text between children is not modeled.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<ElementData>,
    root: NodeId,
    decl: Option<XmlDecl>,
}

impl Document {
    /// Creates a document with a single empty root element.
    pub fn new(root_name: &str) -> Self {
        Document {
            nodes: vec![ElementData {
                name: root_name.to_string(),
                attributes: Vec::new(),
                parent: None,
                children: Vec::new(),
                text: None,
            }],
            root: NodeId(0),
            decl: None,
        }
    }

    /// Parses an XML document from text.
    ///
    /// Surrounding whitespace in text content is trimmed and CDATA sections
    /// are treated as text. Character references and the predefined entities
    /// are resolved; other entity references are an error.
    pub fn parse_str(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);

        let mut nodes: Vec<ElementData> = Vec::new();
        let mut root: Option<NodeId> = None;
        let mut decl: Option<XmlDecl> = None;
        let mut stack: Vec<NodeId> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Decl(event) => {
                    decl = Some(decl_from_event(&event)?);
                }
                Event::Start(start) => {
                    let id = NodeId(nodes.len());
                    nodes.push(element_from_start(&start, stack.last().copied())?);
                    attach_top_level(&mut nodes, &mut root, &stack, id)?;
                    stack.push(id);
                }
                Event::Empty(start) => {
                    let id = NodeId(nodes.len());
                    nodes.push(element_from_start(&start, stack.last().copied())?);
                    attach_top_level(&mut nodes, &mut root, &stack, id)?;
                }
                Event::Text(text) => {
                    let raw = String::from_utf8_lossy(&text).into_owned();
                    let unescaped =
                        unescape(&raw).map_err(|e| Error::Text(e.to_string()))?;
                    if let Some(&current) = stack.last() {
                        append_text(&mut nodes, current, &unescaped);
                    }
                }
                Event::CData(data) => {
                    let raw = String::from_utf8_lossy(&data).into_owned();
                    if let Some(&current) = stack.last() {
                        append_text(&mut nodes, current, &raw);
                    }
                }
                Event::GeneralRef(reference) => {
                    let resolved = match reference
                        .resolve_char_ref()
                        .map_err(|e| Error::Text(e.to_string()))?
                    {
                        Some(ch) => ch.to_string(),
                        None => {
                            let name = reference
                                .decode()
                                .map_err(|e| Error::Text(e.to_string()))?;
                            predefined_entity(&name)
                                .ok_or_else(|| {
                                    Error::Text(format!(
                                        "unresolved entity reference: &{};",
                                        name
                                    ))
                                })?
                                .to_string()
                        }
                    };
                    if let Some(&current) = stack.last() {
                        append_text(&mut nodes, current, &resolved);
                    }
                }
                Event::End(end) => {
                    let found = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                    match stack.pop() {
                        Some(id) if nodes[id.0].name == found => {
                            finalize_text(&mut nodes, id);
                        }
                        Some(id) => {
                            return Err(Error::MismatchedEnd {
                                expected: nodes[id.0].name.clone(),
                                found,
                            })
                        }
                        None => {
                            return Err(Error::MismatchedEnd {
                                expected: String::new(),
                                found,
                            })
                        }
                    }
                }
                Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        if let Some(&open) = stack.last() {
            return Err(Error::Unclosed(nodes[open.0].name.clone()));
        }
        let root = root.ok_or(Error::NoRootElement)?;
        Ok(Document { nodes, root, decl })
    }

    /// Handle of the root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The captured XML declaration, if the source document had one.
    pub fn decl(&self) -> Option<&XmlDecl> {
        self.decl.as_ref()
    }

    /// Sets or removes the XML declaration.
    pub fn set_decl(&mut self, decl: Option<XmlDecl>) {
        self.decl = decl;
    }

    /// Tag name of an element. Names are stored exactly as parsed.
    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    /// Renames an element.
    pub fn set_name(&mut self, id: NodeId, name: &str) {
        self.nodes[id.0].name = name.to_string();
    }

    /// Text content of an element, if any.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.nodes[id.0].text.as_deref()
    }

    /// Sets the text content of an element.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        self.nodes[id.0].text = Some(text.to_string());
    }

    /// Removes the text content of an element.
    pub fn clear_text(&mut self, id: NodeId) {
        self.nodes[id.0].text = None;
    }

    /// Attribute pairs of an element, in document order.
    pub fn attributes(&self, id: NodeId) -> &[(String, String)] {
        &self.nodes[id.0].attributes
    }

    /// Value of one attribute.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes[id.0]
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Sets an attribute, replacing an existing one in place so that the
    /// stored attribute order is preserved.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        let attributes = &mut self.nodes[id.0].attributes;
        match attributes.iter_mut().find(|(key, _)| key == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => attributes.push((name.to_string(), value.to_string())),
        }
    }

    /// Removes an attribute. Returns whether it existed.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> bool {
        let attributes = &mut self.nodes[id.0].attributes;
        let before = attributes.len();
        attributes.retain(|(key, _)| key != name);
        attributes.len() != before
    }

    /// Child handles of an element, in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Number of direct children.
    pub fn child_count(&self, id: NodeId) -> usize {
        self.nodes[id.0].children.len()
    }

    /// Parent handle, `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Creates a new detached element.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(ElementData {
            name: name.to_string(),
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
            text: None,
        });
        id
    }

    /// Appends `child` as the last child of `parent`, detaching it from its
    /// previous parent first if it had one.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(old_parent) = self.nodes[child.0].parent {
            self.nodes[old_parent.0].children.retain(|&id| id != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Detaches `child` from `parent`. Returns whether it was a child.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let children = &mut self.nodes[parent.0].children;
        let before = children.len();
        children.retain(|&id| id != child);
        let removed = children.len() != before;
        if removed {
            self.nodes[child.0].parent = None;
        }
        removed
    }

    /// Replaces `old` with `new` in place, keeping the child position.
    /// Returns whether `old` was found.
    pub fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) -> bool {
        let position = self.nodes[parent.0]
            .children
            .iter()
            .position(|&id| id == old);
        match position {
            Some(index) => {
                self.nodes[parent.0].children[index] = new;
                self.nodes[old.0].parent = None;
                self.nodes[new.0].parent = Some(parent);
                true
            }
            None => false,
        }
    }

    /// Removes text content, attributes and children of an element.
    pub fn clear_element(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
        self.nodes[id.0].attributes.clear();
        self.nodes[id.0].text = None;
    }
}

fn element_from_start(start: &BytesStart, parent: Option<NodeId>) -> Result<ElementData> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attribute.value).into_owned();
        let value = unescape(&raw)
            .map_err(|e| Error::Text(e.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(ElementData {
        name,
        attributes,
        parent,
        children: Vec::new(),
        text: None,
    })
}

fn attach_top_level(
    nodes: &mut [ElementData],
    root: &mut Option<NodeId>,
    stack: &[NodeId],
    id: NodeId,
) -> Result<()> {
    match stack.last() {
        Some(&parent) => {
            nodes[parent.0].children.push(id);
            Ok(())
        }
        None if root.is_some() => Err(Error::MultipleRoots),
        None => {
            *root = Some(id);
            Ok(())
        }
    }
}

/// Text is only kept while the element has no children yet; text after a
/// child element (tail text) is dropped. Pieces concatenate raw: the reader
/// splits text around entity references, so trimming any single piece would
/// eat interior whitespace. The assembled text is trimmed once when the
/// element closes.
fn append_text(nodes: &mut [ElementData], id: NodeId, piece: &str) {
    let element = &mut nodes[id.0];
    if !element.children.is_empty() {
        return;
    }
    match &mut element.text {
        Some(text) => text.push_str(piece),
        None => element.text = Some(piece.to_string()),
    }
}

/// Trims surrounding whitespace of the assembled text content; whitespace-only
/// content (indentation around child elements) becomes no text at all.
fn finalize_text(nodes: &mut [ElementData], id: NodeId) {
    if let Some(text) = nodes[id.0].text.take() {
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            nodes[id.0].text = Some(trimmed.to_string());
        }
    }
}

fn decl_from_event(event: &quick_xml::events::BytesDecl) -> Result<XmlDecl> {
    let version = event
        .version()
        .map_err(|e| Error::Decl(e.to_string()))?
        .into_owned();
    let encoding = match event.encoding() {
        Some(encoding) => Some(
            encoding
                .map_err(|e| Error::Decl(e.to_string()))?
                .into_owned(),
        ),
        None => None,
    };
    let standalone = match event.standalone() {
        Some(standalone) => Some(
            standalone
                .map_err(|e| Error::Decl(e.to_string()))?
                .into_owned(),
        ),
        None => None,
    };
    Ok(XmlDecl {
        version: String::from_utf8_lossy(&version).into_owned(),
        encoding: encoding.map(|e| String::from_utf8_lossy(&e).into_owned()),
        standalone: standalone.map(|s| String::from_utf8_lossy(&s).into_owned()),
    })
}

fn predefined_entity(name: &str) -> Option<&'static str> {
    match name {
        "amp" => Some("&"),
        "lt" => Some("<"),
        "gt" => Some(">"),
        "quot" => Some("\""),
        "apos" => Some("'"),
        _ => None,
    }
}
