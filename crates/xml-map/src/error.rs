//! Error types for node wrapper operations

/// Result type for node wrapper operations
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for node wrapper operations.
///
/// Every failure is raised at the offending access or conversion; nothing
/// is swallowed, logged or retried by this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Constructor input that cannot describe a document
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Dictionary-style access to a tag with no matching child
    #[error("no child element `{0}`")]
    KeyNotFound(String),

    /// Normalized access to a name that is neither a helper nor a child
    #[error("no child or helper named `{0}`")]
    AttributeNotFound(String),

    /// Normalized access to a reserved helper name
    #[error("`{0}` is a reserved helper name")]
    ReservedName(String),

    /// A coercion helper was given text it cannot convert
    #[error("conversion error: {0}")]
    Conversion(String),

    /// A selection of several nodes was consumed where one was expected
    #[error("expected a single node, found {0}")]
    NotUnique(usize),

    /// `create` on a tag that already exists
    #[error("child `{0}` already exists")]
    AlreadyExists(String),

    /// Assignment target is ambiguous; nothing was mutated
    #[error("ambiguous assignment: {count} children named `{tag}`")]
    AmbiguousAssignment {
        /// Tag the assignment was addressed to
        tag: String,
        /// How many children share it
        count: usize,
    },

    /// Failure from the XML engine, propagated unmodified
    #[error(transparent)]
    Engine(#[from] xml_map_engine::Error),
}
