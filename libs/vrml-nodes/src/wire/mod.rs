//! # Parser Output Ingestion
//!
//! The external VRML grammar parser emits its tree as JSON objects of the
//! form `{"node": "<Tag>", "name": "<DEF>", "children": [...], <fields>}`.
//! This module deserializes that shape with `serde` and converts it into the
//! typed [`Node`] tree.
//!
//! ## Accepted encodings
//!
//! - Vectors as `{"x":..,"y":..,"z":..[,"w":..]}` objects or plain arrays
//! - Index fields (`coordIndex`, `texCoordIndex`, `normalIndex`) either as
//!   nested loops or as the raw VRML flat list with `-1` separators
//!
//! ## Example
//!
//! ```rust
//! use vrml_nodes::{parse_json, NodeKind};
//!
//! let nodes = parse_json(r#"[{"node": "Shape", "geometry": {"node": "Sphere", "radius": 2}}]"#)
//!     .unwrap();
//! match &nodes[0].kind {
//!     NodeKind::Shape(shape) => assert_eq!(shape.geometry.as_ref().unwrap().tag(), "Sphere"),
//!     other => panic!("expected Shape, got {other:?}"),
//! }
//! ```

use crate::error::NodeError;
use crate::node::*;
use glam::{DVec2, DVec3, DVec4};
use serde::Deserialize;
use serde_json::Value;

// =============================================================================
// PUBLIC API
// =============================================================================

/// Parses the external parser's JSON output into top-level nodes.
///
/// The document may be a single node object or an array of nodes; `null`
/// yields an empty list.
pub fn parse_json(source: &str) -> Result<Vec<Node>, NodeError> {
    let value: Value = serde_json::from_str(source)?;
    let raws: Vec<RawNode> = match value {
        Value::Null => Vec::new(),
        Value::Array(_) => serde_json::from_value(value)?,
        other => vec![serde_json::from_value(other)?],
    };
    raws.into_iter().map(convert).collect()
}

// =============================================================================
// RAW SHAPES
// =============================================================================

/// A node exactly as the parser emits it. Every field is optional; the
/// conversion decides which ones matter for the node's tag.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    #[serde(default, alias = "type")]
    node: Option<String>,
    #[serde(default, alias = "def")]
    name: Option<String>,
    #[serde(default)]
    children: Vec<RawNode>,

    // Transform
    translation: Option<RawVec>,
    rotation: Option<RawVec>,
    scale: Option<RawVec>,

    // Shape / Appearance / Material
    appearance: Option<Box<RawNode>>,
    geometry: Option<Box<RawNode>>,
    material: Option<Box<RawNode>>,
    diffuse_color: Option<RawVec>,
    emissive_color: Option<RawVec>,
    transparency: Option<f64>,

    // Primitives
    size: Option<RawVec>,
    radius: Option<f64>,
    height: Option<f64>,
    bottom_radius: Option<f64>,
    top_radius: Option<f64>,

    // Indexed geometry
    coord: Option<Box<RawNode>>,
    point: Option<Vec<RawVec>>,
    vector: Option<Vec<RawVec>>,
    coord_index: Option<RawIndices>,
    tex_coord: Option<Box<RawNode>>,
    tex_coord_index: Option<RawIndices>,
    normal: Option<Box<RawNode>>,
    normal_index: Option<RawIndices>,
    normal_per_vertex: Option<bool>,
    ccw: Option<bool>,
    crease_angle: Option<f64>,
    solid: Option<bool>,
}

/// A vector as an object with named components or as a list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawVec {
    Components {
        x: f64,
        y: f64,
        #[serde(default)]
        z: Option<f64>,
        #[serde(default)]
        w: Option<f64>,
    },
    List(Vec<f64>),
}

impl RawVec {
    fn components(&self) -> Vec<f64> {
        match self {
            RawVec::Components { x, y, z, w } => {
                let mut out = vec![*x, *y];
                out.extend(z.iter().chain(w.iter()).copied());
                out
            }
            RawVec::List(values) => values.clone(),
        }
    }
}

/// Index lists as nested loops or as a flat `-1` separated list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawIndices {
    Loops(Vec<Vec<i64>>),
    Flat(Vec<i64>),
}

impl RawIndices {
    /// Normalises both encodings into one loop per polygon.
    ///
    /// A flat list is split at every `-1`; a final loop without terminator
    /// still counts. Nested loops may carry a single trailing `-1`, which is
    /// dropped. Empty loops are kept so parallel index fields stay aligned.
    fn into_loops(self) -> Vec<Vec<i64>> {
        match self {
            RawIndices::Loops(loops) => loops
                .into_iter()
                .map(|mut l| {
                    if l.last() == Some(&-1) {
                        l.pop();
                    }
                    l
                })
                .collect(),
            RawIndices::Flat(flat) => {
                let mut loops = Vec::new();
                let mut current = Vec::new();
                for index in flat {
                    if index == -1 {
                        loops.push(std::mem::take(&mut current));
                    } else {
                        current.push(index);
                    }
                }
                if !current.is_empty() {
                    loops.push(current);
                }
                loops
            }
        }
    }
}

// =============================================================================
// CONVERSION
// =============================================================================

fn convert(mut raw: RawNode) -> Result<Node, NodeError> {
    let children = std::mem::take(&mut raw.children)
        .into_iter()
        .map(convert)
        .collect::<Result<Vec<_>, _>>()?;

    let tag = raw.node.take();
    let tag = tag.as_deref().map(str::trim).filter(|t| !t.is_empty());
    let mut name = raw.name.take();

    let kind = match tag {
        None => NodeKind::Undefined,
        Some("USE") | Some("Use") => {
            let target = name
                .take()
                .ok_or_else(|| NodeError::invalid_field("USE", "name", "missing reference target"))?;
            NodeKind::Use { target }
        }
        Some("Group") => NodeKind::Group,
        Some("Transform") => NodeKind::Transform(TransformFields {
            translation: opt_vec3("Transform", "translation", raw.translation)?,
            rotation: opt_vec4("Transform", "rotation", raw.rotation)?,
            scale: opt_vec3("Transform", "scale", raw.scale)?,
        }),
        Some("Shape") => NodeKind::Shape(ShapeFields {
            appearance: raw.appearance.map(|a| appearance(*a)).transpose()?,
            geometry: raw
                .geometry
                .map(|g| convert(*g).map(Box::new))
                .transpose()?,
        }),
        Some("Box") => NodeKind::Box(BoxFields {
            size: opt_vec3("Box", "size", raw.size)?.unwrap_or(BoxFields::default().size),
        }),
        Some("Cylinder") => {
            let defaults = CylinderFields::default();
            NodeKind::Cylinder(CylinderFields {
                radius: raw.radius.unwrap_or(defaults.radius),
                height: raw.height.unwrap_or(defaults.height),
            })
        }
        Some("Cone") => {
            let defaults = ConeFields::default();
            NodeKind::Cone(ConeFields {
                bottom_radius: raw.bottom_radius.unwrap_or(defaults.bottom_radius),
                top_radius: raw.top_radius.unwrap_or(defaults.top_radius),
                height: raw.height.unwrap_or(defaults.height),
            })
        }
        Some("Sphere") => NodeKind::Sphere(SphereFields {
            radius: raw.radius.unwrap_or(SphereFields::default().radius),
        }),
        Some("PointSet") => NodeKind::PointSet(PointSetFields {
            points: coordinate_points("PointSet", raw.coord)?,
        }),
        Some("IndexedLineSet") => NodeKind::IndexedLineSet(IndexedLineSetFields {
            points: coordinate_points("IndexedLineSet", raw.coord)?,
            coord_index: raw.coord_index.map(RawIndices::into_loops).unwrap_or_default(),
        }),
        Some("IndexedFaceSet") => NodeKind::IndexedFaceSet(face_set(raw)?),
        Some(other) => NodeKind::unsupported(other),
    };

    Ok(Node {
        name,
        kind,
        children,
    })
}

fn appearance(raw: RawNode) -> Result<AppearanceRef, NodeError> {
    if matches!(raw.node.as_deref(), Some("USE") | Some("Use")) {
        let target = raw
            .name
            .ok_or_else(|| NodeError::invalid_field("USE", "name", "missing reference target"))?;
        return Ok(AppearanceRef::Use(target));
    }
    Ok(AppearanceRef::Inline(Appearance {
        name: raw.name,
        material: raw.material.map(|m| material_ref(*m)).transpose()?,
    }))
}

fn material_ref(raw: RawNode) -> Result<MaterialRef, NodeError> {
    if matches!(raw.node.as_deref(), Some("USE") | Some("Use")) {
        let target = raw
            .name
            .ok_or_else(|| NodeError::invalid_field("USE", "name", "missing reference target"))?;
        return Ok(MaterialRef::Use(target));
    }
    Ok(MaterialRef::Inline(MaterialFields {
        name: raw.name,
        diffuse_color: opt_vec3("Material", "diffuseColor", raw.diffuse_color)?,
        emissive_color: opt_vec3("Material", "emissiveColor", raw.emissive_color)?,
        transparency: raw.transparency,
    }))
}

fn face_set(raw: RawNode) -> Result<IndexedFaceSetFields, NodeError> {
    const TAG: &str = "IndexedFaceSet";
    let defaults = IndexedFaceSetFields::default();

    let tex_coords = raw
        .tex_coord
        .and_then(|t| t.point)
        .map(|points| {
            points
                .iter()
                .map(|p| vec2(TAG, "texCoord", p))
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?;

    let normals = raw
        .normal
        .and_then(|n| n.vector)
        .map(|vectors| {
            vectors
                .iter()
                .map(|v| vec3(TAG, "normal", v))
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?;

    Ok(IndexedFaceSetFields {
        points: coordinate_points(TAG, raw.coord)?,
        coord_index: raw.coord_index.map(RawIndices::into_loops),
        tex_coords,
        tex_coord_index: raw.tex_coord_index.map(RawIndices::into_loops),
        normals,
        normal_index: raw.normal_index.map(RawIndices::into_loops),
        normal_per_vertex: raw.normal_per_vertex.unwrap_or(defaults.normal_per_vertex),
        ccw: raw.ccw,
        crease_angle: raw.crease_angle,
        solid: raw.solid.unwrap_or(defaults.solid),
    })
}

fn coordinate_points(node: &str, coord: Option<Box<RawNode>>) -> Result<Vec<DVec3>, NodeError> {
    coord
        .and_then(|c| c.point)
        .unwrap_or_default()
        .iter()
        .map(|p| vec3(node, "coord", p))
        .collect()
}

// =============================================================================
// VECTOR HELPERS
// =============================================================================

fn vec2(node: &str, field: &'static str, raw: &RawVec) -> Result<DVec2, NodeError> {
    match raw.components().as_slice() {
        [x, y, ..] => Ok(DVec2::new(*x, *y)),
        other => Err(arity_error(node, field, 2, other.len())),
    }
}

fn vec3(node: &str, field: &'static str, raw: &RawVec) -> Result<DVec3, NodeError> {
    match raw.components().as_slice() {
        [x, y, z] => Ok(DVec3::new(*x, *y, *z)),
        other => Err(arity_error(node, field, 3, other.len())),
    }
}

fn opt_vec3(
    node: &str,
    field: &'static str,
    raw: Option<RawVec>,
) -> Result<Option<DVec3>, NodeError> {
    raw.as_ref().map(|r| vec3(node, field, r)).transpose()
}

fn opt_vec4(
    node: &str,
    field: &'static str,
    raw: Option<RawVec>,
) -> Result<Option<DVec4>, NodeError> {
    raw.map(|r| match r.components().as_slice() {
        [x, y, z, w] => Ok(DVec4::new(*x, *y, *z, *w)),
        other => Err(arity_error(node, field, 4, other.len())),
    })
    .transpose()
}

fn arity_error(node: &str, field: &'static str, expected: usize, got: usize) -> NodeError {
    NodeError::invalid_field(
        node,
        field,
        format!("expected {expected} components, got {got}"),
    )
}
