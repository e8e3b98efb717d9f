//! # Node Errors
//!
//! Error types for ingesting the external parser's node tree.

use thiserror::Error;

/// Errors that can occur while building the node tree.
#[derive(Debug, Error)]
pub enum NodeError {
    /// The parser output is not valid JSON or does not have the node shape.
    #[error("Parse failure: {0}")]
    ParseFailure(#[from] serde_json::Error),

    /// A field is present but has the wrong arity or type.
    #[error("Invalid field `{field}` on {node}: {message}")]
    InvalidField {
        node: String,
        field: &'static str,
        message: String,
    },
}

impl NodeError {
    /// Creates an invalid field error.
    pub fn invalid_field(
        node: impl Into<String>,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            node: node.into(),
            field,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NodeError::invalid_field("Box", "size", "expected 3 components, got 2");
        let text = err.to_string();
        assert!(text.contains("size"));
        assert!(text.contains("Box"));
    }
}
