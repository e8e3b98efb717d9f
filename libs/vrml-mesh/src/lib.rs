//! # VRML Mesh
//!
//! Render-agnostic geometry for VRML scene trees.
//! Converts the typed node tree from `vrml-nodes` into welded triangle
//! meshes with materials and transforms, ready for any renderer.
//!
//! ## Architecture
//!
//! ```text
//! vrml-nodes (Node) → walker → primitives | triangulate → normals → weld → MeshRecord
//! ```
//!
//! ## Algorithms
//!
//! - **Primitives**: analytic box, cylinder, cone and sphere tessellation
//! - **Triangulation**: vertex-0 fan per polygon loop
//! - **Normals**: flat, or crease-angle smoothing over shared positions
//! - **Welding**: grid-quantized dedup of (position, normal, uv)
//!
//! ## Usage
//!
//! ```rust
//! use vrml_mesh::{convert_json, ConvertOptions};
//!
//! let scene = convert_json(
//!     r#"[{"node": "Shape", "geometry": {"node": "Box", "size": [2, 4, 6]}}]"#,
//!     &ConvertOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(scene.records.len(), 1);
//! assert!(scene.diagnostics.is_empty());
//! ```

pub mod diagnostic;
pub mod error;
pub mod material;
pub mod math;
pub mod mesh;
pub mod normals;
pub mod options;
pub mod primitives;
pub mod transform;
pub mod triangulate;
pub mod walker;
pub mod weld;

pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use error::{ConvertError, MeshError};
pub use material::Material;
pub use mesh::{CompactMesh, Geometry, LineSet, PointCloud, TriangleSoup, Vertex};
pub use normals::Shading;
pub use options::ConvertOptions;
pub use transform::TransformState;
pub use walker::{Definition, MeshRecord, NamedRegistry, Walk, Walker};

use rayon::prelude::*;
use serde::Serialize;
use vrml_nodes::Node;

/// Everything one conversion produced.
#[derive(Debug, Clone, Serialize)]
pub struct SceneOutput {
    /// One record per successfully converted Shape, in document order
    pub records: Vec<MeshRecord>,
    /// Every DEF name seen during the walk
    pub registry: NamedRegistry,
    /// Per-node problems; the records above are still usable
    pub diagnostics: Vec<Diagnostic>,
}

impl SceneOutput {
    /// Returns true if any diagnostic has error severity.
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

/// Converts top-level nodes into mesh records.
///
/// A fresh [`NamedRegistry`] is created for the call and returned in the
/// output, so DEF names never leak between conversions.
///
/// # Errors
///
/// - [`ConvertError::InvalidOptions`] if the options are out of range
/// - [`ConvertError::EmptyDocument`] if `roots` is empty
///
/// Problems with individual nodes are reported as diagnostics instead.
pub fn convert(roots: &[Node], options: &ConvertOptions) -> Result<SceneOutput, ConvertError> {
    options.validate()?;
    if roots.is_empty() {
        return Err(ConvertError::EmptyDocument);
    }

    let walker = Walker::new(options);
    let mut registry = NamedRegistry::new();
    let mut walk = Walk::default();
    for root in roots {
        walk.append(walker.walk(root, TransformState::IDENTITY, &mut registry));
    }

    log::debug!(
        "converted {} record(s) with {} diagnostic(s)",
        walk.records.len(),
        walk.diagnostics.len()
    );

    Ok(SceneOutput {
        records: walk.records,
        registry,
        diagnostics: walk.diagnostics,
    })
}

/// Parses the external parser's JSON output and converts it.
///
/// # Errors
///
/// [`ConvertError::Parse`] for unreadable input, plus everything
/// [`convert`] can return.
pub fn convert_json(source: &str, options: &ConvertOptions) -> Result<SceneOutput, ConvertError> {
    let roots = vrml_nodes::parse_json(source)?;
    convert(&roots, options)
}

/// Converts independent JSON documents in parallel.
///
/// Each document gets its own registry; results are in input order.
///
/// # Example
///
/// ```rust
/// use vrml_mesh::{convert_batch, ConvertOptions};
///
/// let results = convert_batch(
///     &[r#"{"node": "Sphere"}"#, "[]"],
///     &ConvertOptions::default(),
/// );
/// assert!(results[0].is_ok());
/// assert!(results[1].is_err());
/// ```
pub fn convert_batch(
    sources: &[&str],
    options: &ConvertOptions,
) -> Vec<Result<SceneOutput, ConvertError>> {
    sources
        .par_iter()
        .map(|source| convert_json(source, options))
        .collect()
}
