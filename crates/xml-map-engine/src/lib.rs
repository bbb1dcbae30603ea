//! Arena XML document tree built on the quick-xml engine.
//!
//! This crate owns the document side of xml-map: parsing text into an arena
//! of elements, handle-based access to names, attributes, children and text
//! content, in-place mutation, and serialization back to text in the
//! declared encoding. The caller-facing wrapper lives in the `xml-map`
//! crate.

pub mod error;
mod serialize;
pub mod tree;

pub use error::{Error, Result};
pub use tree::{Document, NodeId, XmlDecl};
