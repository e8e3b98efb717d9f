//! # Mesh Errors
//!
//! Error types for geometry synthesis and scene conversion.
//!
//! [`MeshError`] is local to one Shape: the walker turns it into a
//! [`Diagnostic`](crate::diagnostic::Diagnostic) and keeps going.
//! [`ConvertError`] aborts a whole conversion.

use crate::diagnostic::DiagnosticKind;
use config::constants::ConfigError;
use thiserror::Error;
use vrml_nodes::NodeError;

/// Errors that can occur while building the geometry of one Shape.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// A primitive dimension is non-positive or non-finite
    #[error("Invalid geometry parameter: {message}")]
    InvalidGeometryParameter { message: String },

    /// An index list references missing data or parallel loops disagree
    #[error("Malformed face set: {message}")]
    MalformedFaceSet { message: String },

    /// Too many vertices
    #[error("Too many vertices: {count} (max: {max})")]
    TooManyVertices { count: usize, max: usize },
}

impl MeshError {
    /// Creates an invalid geometry parameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidGeometryParameter {
            message: message.into(),
        }
    }

    /// Creates a malformed face set error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedFaceSet {
            message: message.into(),
        }
    }

    /// Returns the diagnostic kind this error is reported as.
    pub fn diagnostic_kind(&self) -> DiagnosticKind {
        match self {
            Self::InvalidGeometryParameter { .. } => DiagnosticKind::InvalidGeometryParameter,
            Self::MalformedFaceSet { .. } | Self::TooManyVertices { .. } => {
                DiagnosticKind::MalformedFaceSet
            }
        }
    }
}

/// Errors that abort a conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The document has no top-level nodes
    #[error("Empty document: no top-level nodes")]
    EmptyDocument,

    /// The parser output could not be ingested
    #[error(transparent)]
    Parse(#[from] NodeError),

    /// The conversion options are out of range
    #[error("Invalid options: {0}")]
    InvalidOptions(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            MeshError::invalid_parameter("radius").diagnostic_kind(),
            DiagnosticKind::InvalidGeometryParameter
        );
        assert_eq!(
            MeshError::malformed("index").diagnostic_kind(),
            DiagnosticKind::MalformedFaceSet
        );
        let too_many = MeshError::TooManyVertices { count: 11, max: 10 };
        assert_eq!(too_many.diagnostic_kind(), DiagnosticKind::MalformedFaceSet);
        assert!(too_many.to_string().contains("11"));
    }

    #[test]
    fn test_convert_error_display() {
        assert!(ConvertError::EmptyDocument.to_string().contains("Empty document"));
        let options = ConvertError::from(ConfigError::InvalidSegments(1));
        assert!(options.to_string().starts_with("Invalid options"));
    }
}
