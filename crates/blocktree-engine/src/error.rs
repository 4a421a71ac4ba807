/// Errors raised while converting untyped or textual input into blocks.
#[derive(Debug, thiserror::Error)]
pub enum BlockError {
    /// A required field (`id` or `type`) was absent. `field` is the path from
    /// the root, e.g. `children[1].type`.
    #[error("{field} not found")]
    MissingField { field: String },

    /// A field was present but held the wrong kind of value.
    #[error("{field} must be {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },

    /// The input text was not a syntactically valid JSON document of the
    /// expected shape.
    #[error("malformed block JSON: {0}")]
    MalformedInput(#[from] serde_json::Error),

    /// The input nested blocks deeper than the configured limit. `location`
    /// is the path of the first block past the limit, or a line and column
    /// when the text nests too deep to be parsed at all.
    #[error("block nesting exceeds maximum depth of {max_depth} at {location}")]
    DepthExceeded { location: String, max_depth: usize },

    /// A registered validator rejected a block somewhere in a tree.
    #[error("block {block_id} failed validation: {source}")]
    Validation {
        block_id: String,
        #[source]
        source: ValidationError,
    },
}

/// Error returned by a per-type validator. Passed back to the caller of
/// [`crate::BlockValidator::validate`] exactly as the validator produced it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
