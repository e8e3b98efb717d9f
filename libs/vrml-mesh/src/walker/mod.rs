//! # Scene Tree Walker
//!
//! Depth-first, pre-order traversal of the node tree that emits one
//! [`MeshRecord`] per Shape.
//!
//! ## Transforms
//!
//! Each Group or Transform walks its children with its own local
//! [`TransformState`]; the parent's state is not inherited, so a record's
//! `transform` is the nearest enclosing node's own fields. The full
//! placement is accumulated on the way back up: every group premultiplies
//! the `world` matrix of the records it returns by its own matrix.
//!
//! ## Faults
//!
//! A Shape whose geometry cannot be built produces a [`Diagnostic`] instead
//! of a record. Unsupported and untyped nodes produce warnings and their
//! children are still walked. Nothing here aborts the walk.

mod face_set;
mod registry;

pub use face_set::FaceSetSettings;
pub use registry::{Definition, NamedRegistry};

use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::error::MeshError;
use crate::material::Material;
use crate::mesh::{CompactMesh, Geometry};
use crate::options::ConvertOptions;
use crate::primitives::{create_box, create_cone, create_cylinder, create_sphere};
use crate::transform::TransformState;
use config::constants::{DEFAULT_WELD_EPSILON, STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
use face_set::{build_face_set, build_line_set, build_point_set};
use glam::DMat4;
use serde::Serialize;
use vrml_nodes::{AppearanceRef, MaterialRef, Node, NodeKind, ShapeFields};

// =============================================================================
// OUTPUT
// =============================================================================

/// One renderable Shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshRecord {
    /// DEF name of the Shape, if any
    pub name: Option<String>,
    /// Local state of the nearest enclosing Group or Transform
    pub transform: TransformState,
    /// Composition of every enclosing Transform, root first
    pub world: DMat4,
    pub geometry: Geometry,
    pub material: Material,
    /// Back faces must be drawn too (`solid FALSE` on a face set)
    pub double_sided: bool,
}

impl MeshRecord {
    /// Returns the triangle mesh, if the geometry is one.
    pub fn mesh(&self) -> Option<&CompactMesh> {
        self.geometry.as_mesh()
    }
}

/// Records and diagnostics produced by one subtree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Walk {
    pub records: Vec<MeshRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Walk {
    fn from_record(record: MeshRecord) -> Self {
        Self {
            records: vec![record],
            diagnostics: Vec::new(),
        }
    }

    fn from_diagnostic(diagnostic: Diagnostic) -> Self {
        Self {
            records: Vec::new(),
            diagnostics: vec![diagnostic],
        }
    }

    /// Appends another walk's output after this one's.
    pub fn append(&mut self, mut other: Walk) {
        self.records.append(&mut other.records);
        self.diagnostics.append(&mut other.diagnostics);
    }
}

// =============================================================================
// WALKER
// =============================================================================

/// Walks node trees under one set of options.
///
/// # Example
///
/// ```rust
/// use vrml_mesh::{ConvertOptions, NamedRegistry, TransformState, Walker};
/// use vrml_nodes::{Node, NodeKind, SphereFields};
///
/// let options = ConvertOptions::default();
/// let mut registry = NamedRegistry::new();
/// let root = Node::new(NodeKind::Group)
///     .with_children(vec![Node::shape(Node::new(NodeKind::Sphere(SphereFields::default())))]);
///
/// let walk = Walker::new(&options).walk(&root, TransformState::IDENTITY, &mut registry);
/// assert_eq!(walk.records.len(), 1);
/// assert!(walk.diagnostics.is_empty());
/// ```
pub struct Walker<'a> {
    options: &'a ConvertOptions,
}

impl<'a> Walker<'a> {
    /// Creates a walker.
    pub fn new(options: &'a ConvertOptions) -> Self {
        Self { options }
    }

    /// Walks `node` and its subtree.
    ///
    /// `transform` is the local state of the enclosing group.
    pub fn walk(
        &self,
        node: &Node,
        transform: TransformState,
        registry: &mut NamedRegistry,
    ) -> Walk {
        stacker::maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            self.visit(node, transform, registry)
        })
    }

    fn visit(&self, node: &Node, transform: TransformState, registry: &mut NamedRegistry) -> Walk {
        match &node.kind {
            NodeKind::Group => self.visit_group(node, TransformState::IDENTITY, registry),
            NodeKind::Transform(fields) => {
                self.visit_group(node, TransformState::from_fields(fields), registry)
            }
            NodeKind::Shape(fields) => {
                let mut walk = self.visit_shape(node, fields, transform, registry);
                walk.append(self.visit_children(node, transform, registry));
                walk
            }
            NodeKind::Box(_)
            | NodeKind::Cylinder(_)
            | NodeKind::Cone(_)
            | NodeKind::Sphere(_)
            | NodeKind::PointSet(_)
            | NodeKind::IndexedLineSet(_)
            | NodeKind::IndexedFaceSet(_) => {
                // Geometry outside a Shape.
                let mut walk = self.emit(
                    node.name.as_deref(),
                    node,
                    Material::fallback(),
                    transform,
                    registry,
                );
                walk.append(self.visit_children(node, transform, registry));
                walk
            }
            NodeKind::Use { target } => self.visit_use(target, transform, registry),
            NodeKind::Unsupported { tag, recognized } => {
                log::warn!("skipping unsupported node type `{tag}`");
                let message = if *recognized {
                    "node type is not rendered"
                } else {
                    "unknown node type"
                };
                let mut walk = Walk::from_diagnostic(
                    Diagnostic::new(DiagnosticKind::UnsupportedNodeType, tag.as_str(), message)
                        .with_node_name(node.name.as_deref()),
                );
                walk.append(self.visit_children(node, transform, registry));
                walk
            }
            NodeKind::Undefined => {
                log::warn!("skipping node without a type tag");
                let mut walk = Walk::from_diagnostic(
                    Diagnostic::new(
                        DiagnosticKind::UndefinedNodeType,
                        "Undefined",
                        "node has no type tag",
                    )
                    .with_node_name(node.name.as_deref()),
                );
                walk.append(self.visit_children(node, transform, registry));
                walk
            }
        }
    }

    fn visit_children(
        &self,
        node: &Node,
        transform: TransformState,
        registry: &mut NamedRegistry,
    ) -> Walk {
        let mut walk = Walk::default();
        for child in &node.children {
            walk.append(self.walk(child, transform, registry));
        }
        walk
    }

    fn visit_group(&self, node: &Node, local: TransformState, registry: &mut NamedRegistry) -> Walk {
        // Bound on entry so that a reuse of the name below takes over.
        let reserved = node.name.as_deref().map(|name| {
            let token = registry.reserve(
                name,
                Definition::Group {
                    transform: local,
                    records: Vec::new(),
                },
            );
            (name, token)
        });

        let mut walk = self.visit_children(node, local, registry);

        if !local.is_identity() {
            let matrix = local.to_matrix();
            for record in &mut walk.records {
                record.world = matrix * record.world;
            }
        }

        if let Some((name, token)) = reserved {
            if !registry.complete_group(name, token, walk.records.clone()) {
                log::debug!("DEF `{name}` was redefined inside its own group");
            }
        }
        walk
    }

    fn visit_shape(
        &self,
        node: &Node,
        fields: &ShapeFields,
        transform: TransformState,
        registry: &mut NamedRegistry,
    ) -> Walk {
        let mut walk = Walk::default();
        let material = self.resolve_material(fields.appearance.as_ref(), registry, &mut walk);
        let name = node.name.as_deref();

        let Some(geometry) = fields.geometry.as_deref() else {
            log::debug!("Shape {} has no geometry", name.unwrap_or("<unnamed>"));
            return walk;
        };

        match &geometry.kind {
            NodeKind::Use { target } => match shared_geometry(registry, target) {
                Some((shared, double_sided)) => {
                    let record = MeshRecord {
                        name: name.map(str::to_owned),
                        transform,
                        world: DMat4::IDENTITY,
                        geometry: shared,
                        material,
                        double_sided,
                    };
                    if let Some(name) = name {
                        registry.define(name, Definition::Shape(record.clone()));
                    }
                    walk.records.push(record);
                }
                None => walk.diagnostics.push(unresolved("geometry", target, name)),
            },
            kind if kind.is_geometry() => {
                walk.append(self.emit(name, geometry, material, transform, registry));
            }
            _ => walk.diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::UnsupportedNodeType,
                    geometry.tag(),
                    "not a geometry node",
                )
                .with_node_name(name),
            ),
        }
        walk
    }

    fn visit_use(&self, target: &str, transform: TransformState, registry: &NamedRegistry) -> Walk {
        match registry.get(target) {
            Some(Definition::Shape(record)) => Walk::from_record(MeshRecord {
                transform,
                world: DMat4::IDENTITY,
                ..record.clone()
            }),
            Some(Definition::Group { records, .. }) => Walk {
                records: records.clone(),
                diagnostics: Vec::new(),
            },
            Some(definition @ (Definition::Material(_) | Definition::Appearance(_))) => {
                log::debug!(
                    "USE `{target}` names {}; nothing to place",
                    definition.kind_name()
                );
                Walk::default()
            }
            None => {
                log::warn!("USE `{target}` does not name a definition");
                Walk::from_diagnostic(unresolved("node", target, None))
            }
        }
    }

    /// Builds one record, or a diagnostic if the geometry is invalid.
    fn emit(
        &self,
        name: Option<&str>,
        geometry: &Node,
        material: Material,
        transform: TransformState,
        registry: &mut NamedRegistry,
    ) -> Walk {
        match self.build_geometry(geometry) {
            Ok(built) => {
                let record = MeshRecord {
                    name: name.map(str::to_owned),
                    transform,
                    world: DMat4::IDENTITY,
                    geometry: built,
                    material,
                    double_sided: is_double_sided(geometry),
                };
                if let Some(name) = name {
                    registry.define(name, Definition::Shape(record.clone()));
                }
                if let Some(geometry_name) = geometry.name.as_deref().filter(|g| Some(*g) != name) {
                    registry.define(geometry_name, Definition::Shape(record.clone()));
                }
                Walk::from_record(record)
            }
            Err(error) => {
                log::warn!("skipping {}: {error}", geometry.tag());
                Walk::from_diagnostic(
                    Diagnostic::from_mesh_error(&error, geometry.tag())
                        .with_node_name(name.or(geometry.name.as_deref())),
                )
            }
        }
    }

    fn build_geometry(&self, node: &Node) -> Result<Geometry, MeshError> {
        let segments = self.options.segments;
        let mesh = match &node.kind {
            NodeKind::Box(fields) => create_box(fields.size / 2.0)?,
            NodeKind::Cylinder(fields) => create_cylinder(fields.radius, fields.height, segments)?,
            NodeKind::Cone(fields) => create_cone(
                fields.bottom_radius,
                fields.top_radius,
                fields.height,
                segments,
            )?,
            NodeKind::Sphere(fields) => create_sphere(fields.radius, segments)?,
            NodeKind::IndexedFaceSet(fields) => {
                let settings = FaceSetSettings::resolve(fields, self.options);
                return build_face_set(fields, &settings).map(Geometry::Mesh);
            }
            NodeKind::IndexedLineSet(fields) => return build_line_set(fields).map(Geometry::Lines),
            NodeKind::PointSet(fields) => return Ok(Geometry::Points(build_point_set(fields))),
            other => {
                return Err(MeshError::invalid_parameter(format!(
                    "{} is not a geometry node",
                    other.tag()
                )))
            }
        };

        let epsilon = self.options.weld_epsilon;
        let mesh = if !self.options.emit_uv {
            mesh.without_uvs(epsilon)
        } else if epsilon != DEFAULT_WELD_EPSILON {
            mesh.reweld(epsilon)
        } else {
            mesh
        };
        Ok(Geometry::Mesh(mesh))
    }

    fn resolve_material(
        &self,
        appearance: Option<&AppearanceRef>,
        registry: &mut NamedRegistry,
        walk: &mut Walk,
    ) -> Material {
        let appearance = match appearance {
            None => return Material::fallback(),
            Some(AppearanceRef::Use(target)) => {
                return registry.appearance(target).unwrap_or_else(|| {
                    log::warn!("appearance USE `{target}` does not name an appearance");
                    walk.diagnostics.push(unresolved("appearance", target, None));
                    Material::fallback()
                });
            }
            Some(AppearanceRef::Inline(appearance)) => appearance,
        };

        let material = self.resolve_inline_material(appearance.material.as_ref(), registry, walk);
        if let Some(name) = &appearance.name {
            registry.define(name.as_str(), Definition::Appearance(material));
        }
        material
    }

    fn resolve_inline_material(
        &self,
        material: Option<&MaterialRef>,
        registry: &mut NamedRegistry,
        walk: &mut Walk,
    ) -> Material {
        let Some(material) = material else {
            return Material::fallback();
        };

        match material {
            MaterialRef::Inline(fields) => {
                let synthesized = Material::from_fields(fields);
                if let Some(name) = &fields.name {
                    registry.define(name.as_str(), Definition::Material(synthesized));
                }
                synthesized
            }
            MaterialRef::Use(target) => registry.material(target).unwrap_or_else(|| {
                log::warn!("material USE `{target}` does not name a material");
                walk.diagnostics.push(unresolved("material", target, None));
                Material::fallback()
            }),
        }
    }
}

/// Geometry and sidedness of the Shape a `geometry USE` refers to.
fn shared_geometry(registry: &NamedRegistry, target: &str) -> Option<(Geometry, bool)> {
    match registry.get(target) {
        Some(Definition::Shape(record)) => Some((record.geometry.clone(), record.double_sided)),
        _ => None,
    }
}

/// Only face sets can be open surfaces; primitives are always solid.
fn is_double_sided(geometry: &Node) -> bool {
    matches!(&geometry.kind, NodeKind::IndexedFaceSet(fields) if !fields.solid)
}

fn unresolved(what: &str, target: &str, name: Option<&str>) -> Diagnostic {
    Diagnostic::new(
        DiagnosticKind::UnresolvedReference,
        "USE",
        format!("{what} `{target}` is not defined"),
    )
    .with_node_name(name)
}
