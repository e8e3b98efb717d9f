//! # VRML Nodes
//!
//! Typed scene-node tree consumed by the geometry pipeline in `vrml-mesh`.
//!
//! ## Architecture
//!
//! ```text
//! VRML text → external parser (JSON tree) → vrml-nodes (Node) → vrml-mesh (MeshRecord)
//! ```
//!
//! The crate does not lex VRML itself. It accepts the tree the external
//! grammar-based parser produces and gives it a closed, typed shape.
//!
//! ## Example
//!
//! ```rust
//! use vrml_nodes::{parse_json, NodeKind};
//!
//! let nodes = parse_json(r#"[{"node": "Group", "children": [{"node": "PointLight"}]}]"#).unwrap();
//! assert_eq!(nodes[0].kind, NodeKind::Group);
//! assert!(matches!(nodes[0].children[0].kind, NodeKind::Unsupported { recognized: true, .. }));
//! ```

pub mod error;
pub mod node;
pub mod wire;

pub use error::NodeError;
pub use node::{
    Appearance, AppearanceRef, BoxFields, ConeFields, CylinderFields, IndexedFaceSetFields,
    IndexedLineSetFields, MaterialFields, MaterialRef, Node, NodeKind, PointSetFields,
    ShapeFields, SphereFields, TransformFields, RECOGNIZED_UNSUPPORTED_TAGS,
};
pub use wire::parse_json;
