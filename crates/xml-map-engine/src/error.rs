//! Error types for document tree operations

/// Result type for document tree operations
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for parsing, mutation and serialization
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// XML parsing failed
    #[error("XML parsing error: {0}")]
    Parse(#[from] quick_xml::Error),

    /// Malformed attribute inside a start tag
    #[error("attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// IO error while writing serialized output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Text content could not be decoded or unescaped
    #[error("text content error: {0}")]
    Text(String),

    /// Malformed XML declaration
    #[error("XML declaration error: {0}")]
    Decl(String),

    /// End tag does not match the open element
    #[error("mismatched end tag: expected </{expected}>, found </{found}>")]
    MismatchedEnd {
        /// Name of the element that is currently open
        expected: String,
        /// Name found in the end tag
        found: String,
    },

    /// Element still open when the document ended
    #[error("unexpected end of document: <{0}> is not closed")]
    Unclosed(String),

    /// More than one top-level element
    #[error("document has more than one root element")]
    MultipleRoots,

    /// No top-level element at all
    #[error("document has no root element")]
    NoRootElement,

    /// Declared encoding label is not recognized
    #[error("unknown encoding label: {0}")]
    UnknownEncoding(String),
}
