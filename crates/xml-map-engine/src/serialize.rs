//! Serialization of the document tree through the quick-xml writer.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{Error, Result};
use crate::tree::{Document, NodeId};

impl Document {
    /// Serializes the subtree rooted at `node`, without an XML declaration.
    ///
    /// Tag and attribute names are written exactly as stored, attribute
    /// order preserved. Elements without text and children come out as
    /// self-closing tags.
    pub fn to_xml(&self, node: NodeId) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        self.write_element(&mut writer, node)?;
        into_text(writer.into_inner())
    }

    /// Serializes the whole document, emitting the captured declaration
    /// first, so the declared encoding round-trips.
    pub fn to_xml_document(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        if let Some(decl) = self.decl() {
            writer.write_event(Event::Decl(BytesDecl::new(
                &decl.version,
                decl.encoding.as_deref(),
                decl.standalone.as_deref(),
            )))?;
        }
        self.write_element(&mut writer, self.root())?;
        into_text(writer.into_inner())
    }

    /// Serializes the document to bytes in the declared encoding
    /// (UTF-8 when no encoding is declared).
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let text = self.to_xml_document()?;
        match self.decl().and_then(|decl| decl.encoding.as_deref()) {
            Some(label) => {
                let encoding = encoding_rs::Encoding::for_label(label.as_bytes())
                    .ok_or_else(|| Error::UnknownEncoding(label.to_string()))?;
                let (bytes, _, _) = encoding.encode(&text);
                Ok(bytes.into_owned())
            }
            None => Ok(text.into_bytes()),
        }
    }

    fn write_element(&self, writer: &mut Writer<Vec<u8>>, id: NodeId) -> Result<()> {
        let name = self.name(id);
        let mut start = BytesStart::new(name);
        for (key, value) in self.attributes(id) {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        let children = self.children(id);
        let text = self.text(id);
        if children.is_empty() && text.is_none() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        if let Some(text) = text {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        for &child in children {
            self.write_element(writer, child)?;
        }
        writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }
}

fn into_text(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| Error::Text(e.to_string()))
}
