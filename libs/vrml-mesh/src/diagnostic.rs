//! # Diagnostics
//!
//! Non-fatal problems found while walking a scene. A conversion always
//! returns every diagnostic it produced alongside the records that did
//! convert.

use crate::error::MeshError;
use serde::Serialize;
use std::fmt;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    /// The offending Shape produced no record
    Error,
    /// The node was skipped; its siblings and children are unaffected
    Warning,
}

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    InvalidGeometryParameter,
    MalformedFaceSet,
    UnsupportedNodeType,
    UndefinedNodeType,
    UnresolvedReference,
}

impl DiagnosticKind {
    /// Returns the fixed severity of this kind.
    pub fn severity(self) -> Severity {
        match self {
            Self::InvalidGeometryParameter | Self::MalformedFaceSet => Severity::Error,
            Self::UnsupportedNodeType | Self::UndefinedNodeType | Self::UnresolvedReference => {
                Severity::Warning
            }
        }
    }
}

/// A diagnostic attached to one node of the scene.
///
/// # Example
///
/// ```rust
/// use vrml_mesh::{Diagnostic, DiagnosticKind, Severity};
///
/// let diag = Diagnostic::new(DiagnosticKind::UnsupportedNodeType, "PointLight", "skipped")
///     .with_node_name(Some("Lamp"));
/// assert_eq!(diag.severity, Severity::Warning);
/// assert_eq!(diag.node_name.as_deref(), Some("Lamp"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    /// Tag of the node the diagnostic is about
    pub node_tag: String,
    /// DEF name of that node, if any
    pub node_name: Option<String>,
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic with the kind's fixed severity.
    pub fn new(
        kind: DiagnosticKind,
        node_tag: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            node_tag: node_tag.into(),
            node_name: None,
            message: message.into(),
        }
    }

    /// Creates a diagnostic from a per-Shape geometry error.
    pub fn from_mesh_error(error: &MeshError, node_tag: impl Into<String>) -> Self {
        Self::new(error.diagnostic_kind(), node_tag, error.to_string())
    }

    /// Attaches the DEF name of the offending node.
    pub fn with_node_name(mut self, name: Option<impl Into<String>>) -> Self {
        self.node_name = name.map(Into::into);
        self
    }

    /// Returns true for error severity.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match &self.node_name {
            Some(name) => write!(f, "{level}: {} `{name}`: {}", self.node_tag, self.message),
            None => write!(f, "{level}: {}: {}", self.node_tag, self.message),
        }
    }
}
