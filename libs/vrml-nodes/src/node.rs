//! # Scene Nodes
//!
//! The typed node tree produced from the external parser's output. Nodes are
//! immutable input to the geometry pipeline: the walker only reads them.
//!
//! Field structs carry the VRML97 defaults in their `Default` impls, so a
//! node missing a field behaves exactly like the source format says it
//! should.

use glam::{DVec2, DVec3, DVec4};

/// Type tags that are part of VRML but produce no geometry here.
///
/// Nodes with these tags become [`NodeKind::Unsupported`] with
/// `recognized: true`; their children are still walked.
pub const RECOGNIZED_UNSUPPORTED_TAGS: &[&str] = &[
    "Light",
    "AmbientLight",
    "DirectionalLight",
    "PointLight",
    "SpotLight",
    "Background",
    "Fog",
    "OrientationInterpolator",
    "PositionInterpolator",
    "ColorInterpolator",
    "ScalarInterpolator",
    "Viewpoint",
    "NavigationInfo",
    "WorldInfo",
    "Text",
    "Inline",
    "Switch",
    "LOD",
    "TimeSensor",
    "TouchSensor",
    "ProximitySensor",
];

// =============================================================================
// NODE
// =============================================================================

/// One entry of the parsed scene tree.
///
/// # Example
///
/// ```rust
/// use vrml_nodes::{BoxFields, Node, NodeKind};
/// use glam::DVec3;
///
/// let node = Node::shape(Node::new(NodeKind::Box(BoxFields::new(DVec3::splat(2.0)))))
///     .named("Crate");
/// assert_eq!(node.tag(), "Shape");
/// assert_eq!(node.name.as_deref(), Some("Crate"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// `DEF` name, if any.
    pub name: Option<String>,
    /// Type tag plus type-specific fields.
    pub kind: NodeKind,
    /// Ordered child nodes.
    pub children: Vec<Node>,
}

impl Node {
    /// Creates an unnamed node without children.
    pub fn new(kind: NodeKind) -> Self {
        Self {
            name: None,
            kind,
            children: Vec::new(),
        }
    }

    /// Creates a `Shape` node wrapping `geometry` with no appearance.
    pub fn shape(geometry: Node) -> Self {
        Self::new(NodeKind::Shape(ShapeFields {
            appearance: None,
            geometry: Some(Box::new(geometry)),
        }))
    }

    /// Creates a `Shape` node wrapping `geometry` with an inline material.
    pub fn shape_with_material(geometry: Node, material: MaterialFields) -> Self {
        Self::new(NodeKind::Shape(ShapeFields {
            appearance: Some(AppearanceRef::Inline(Appearance {
                name: None,
                material: Some(MaterialRef::Inline(material)),
            })),
            geometry: Some(Box::new(geometry)),
        }))
    }

    /// Creates a `USE` reference to a previously defined name.
    pub fn use_ref(target: impl Into<String>) -> Self {
        Self::new(NodeKind::Use {
            target: target.into(),
        })
    }

    /// Sets the `DEF` name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the children.
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    /// Returns the source type tag.
    pub fn tag(&self) -> &str {
        self.kind.tag()
    }
}

// =============================================================================
// NODE KIND
// =============================================================================

/// Closed set of node types understood by the pipeline.
///
/// Anything else is kept as [`NodeKind::Unsupported`] with its original tag,
/// so new source node types fail safely instead of matching a wrong branch.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Grouping node without a transform of its own.
    Group,
    /// Grouping node with translation, rotation and scale.
    Transform(TransformFields),
    /// Geometry plus appearance.
    Shape(ShapeFields),

    /// Axis-aligned box centred on the origin.
    Box(BoxFields),
    /// Capped cylinder along +Y.
    Cylinder(CylinderFields),
    /// Cone (or frustum) along +Y.
    Cone(ConeFields),
    /// Sphere centred on the origin.
    Sphere(SphereFields),
    /// Unconnected points.
    PointSet(PointSetFields),
    /// Indexed polylines.
    IndexedLineSet(IndexedLineSetFields),
    /// Indexed polygons.
    IndexedFaceSet(IndexedFaceSetFields),

    /// `USE` of a name defined earlier in the document.
    Use {
        /// The referenced `DEF` name.
        target: String,
    },
    /// A tagged node with no geometry meaning here.
    Unsupported {
        /// Original type tag.
        tag: String,
        /// True when the tag is a known VRML node type.
        recognized: bool,
    },
    /// A node with no type tag at all.
    Undefined,
}

impl NodeKind {
    /// Classifies a tag that does not map to a supported node type.
    pub fn unsupported(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        let recognized = RECOGNIZED_UNSUPPORTED_TAGS.contains(&tag.as_str());
        Self::Unsupported { tag, recognized }
    }

    /// Returns the source type tag.
    pub fn tag(&self) -> &str {
        match self {
            Self::Group => "Group",
            Self::Transform(_) => "Transform",
            Self::Shape(_) => "Shape",
            Self::Box(_) => "Box",
            Self::Cylinder(_) => "Cylinder",
            Self::Cone(_) => "Cone",
            Self::Sphere(_) => "Sphere",
            Self::PointSet(_) => "PointSet",
            Self::IndexedLineSet(_) => "IndexedLineSet",
            Self::IndexedFaceSet(_) => "IndexedFaceSet",
            Self::Use { .. } => "USE",
            Self::Unsupported { tag, .. } => tag,
            Self::Undefined => "",
        }
    }

    /// Returns true for node types that describe geometry.
    pub fn is_geometry(&self) -> bool {
        matches!(
            self,
            Self::Box(_)
                | Self::Cylinder(_)
                | Self::Cone(_)
                | Self::Sphere(_)
                | Self::PointSet(_)
                | Self::IndexedLineSet(_)
                | Self::IndexedFaceSet(_)
        )
    }
}

// =============================================================================
// GROUPING FIELDS
// =============================================================================

/// Fields of a `Transform` node. Absent fields mean identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformFields {
    /// Translation vector.
    pub translation: Option<DVec3>,
    /// Rotation as axis `(x, y, z)` plus angle in radians `w`.
    pub rotation: Option<DVec4>,
    /// Non-uniform scale.
    pub scale: Option<DVec3>,
}

/// Fields of a `Shape` node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeFields {
    /// Optional appearance, inline or referenced.
    pub appearance: Option<AppearanceRef>,
    /// Optional geometry node.
    pub geometry: Option<Box<Node>>,
}

/// An appearance given inline or by `USE`.
#[derive(Debug, Clone, PartialEq)]
pub enum AppearanceRef {
    /// Inline `Appearance` node.
    Inline(Appearance),
    /// `USE` of a named appearance.
    Use(String),
}

impl AppearanceRef {
    /// Material of an inline appearance. A reference has none of its own.
    pub fn material(&self) -> Option<&MaterialRef> {
        match self {
            Self::Inline(appearance) => appearance.material.as_ref(),
            Self::Use(_) => None,
        }
    }
}

/// An `Appearance` node. Textures are not carried.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Appearance {
    /// `DEF` name of the appearance.
    pub name: Option<String>,
    /// Material, inline or referenced.
    pub material: Option<MaterialRef>,
}

/// A material given inline or by `USE`.
#[derive(Debug, Clone, PartialEq)]
pub enum MaterialRef {
    /// Inline `Material` node.
    Inline(MaterialFields),
    /// `USE` of a named material.
    Use(String),
}

/// Fields of a `Material` node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialFields {
    /// `DEF` name of the material.
    pub name: Option<String>,
    pub diffuse_color: Option<DVec3>,
    pub emissive_color: Option<DVec3>,
    /// 0 = opaque, 1 = fully transparent.
    pub transparency: Option<f64>,
}

// =============================================================================
// GEOMETRY FIELDS
// =============================================================================

/// Fields of a `Box` node. `size` holds full extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxFields {
    pub size: DVec3,
}

impl BoxFields {
    pub fn new(size: DVec3) -> Self {
        Self { size }
    }
}

impl Default for BoxFields {
    fn default() -> Self {
        Self {
            size: DVec3::splat(2.0),
        }
    }
}

/// Fields of a `Cylinder` node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylinderFields {
    pub radius: f64,
    pub height: f64,
}

impl Default for CylinderFields {
    fn default() -> Self {
        Self {
            radius: 1.0,
            height: 2.0,
        }
    }
}

/// Fields of a `Cone` node. `top_radius` is an extension and defaults to a
/// sharp apex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeFields {
    pub bottom_radius: f64,
    pub top_radius: f64,
    pub height: f64,
}

impl Default for ConeFields {
    fn default() -> Self {
        Self {
            bottom_radius: 1.0,
            top_radius: 0.0,
            height: 2.0,
        }
    }
}

/// Fields of a `Sphere` node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereFields {
    pub radius: f64,
}

impl Default for SphereFields {
    fn default() -> Self {
        Self { radius: 1.0 }
    }
}

/// Fields of a `PointSet` node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointSetFields {
    pub points: Vec<DVec3>,
}

/// Fields of an `IndexedLineSet` node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedLineSetFields {
    pub points: Vec<DVec3>,
    /// One polyline per entry.
    pub coord_index: Vec<Vec<i64>>,
}

/// Fields of an `IndexedFaceSet` node.
///
/// Index lists are already split into one loop per polygon. They stay
/// signed so the pipeline can report negative indices as malformed input.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedFaceSetFields {
    /// `coord.point`.
    pub points: Vec<DVec3>,
    /// `coordIndex`, one loop per polygon. `None` when the field is absent.
    pub coord_index: Option<Vec<Vec<i64>>>,
    /// `texCoord.point`.
    pub tex_coords: Option<Vec<DVec2>>,
    pub tex_coord_index: Option<Vec<Vec<i64>>>,
    /// `normal.vector`.
    pub normals: Option<Vec<DVec3>>,
    pub normal_index: Option<Vec<Vec<i64>>>,
    pub normal_per_vertex: bool,
    /// Winding override; `None` defers to the conversion options.
    pub ccw: Option<bool>,
    /// Crease angle in radians; `None` means flat shading unless the
    /// conversion options say otherwise.
    pub crease_angle: Option<f64>,
    pub solid: bool,
}

impl Default for IndexedFaceSetFields {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            coord_index: None,
            tex_coords: None,
            tex_coord_index: None,
            normals: None,
            normal_index: None,
            normal_per_vertex: true,
            ccw: None,
            crease_angle: None,
            solid: true,
        }
    }
}

impl IndexedFaceSetFields {
    /// Creates a face set from points and polygon loops.
    pub fn new(points: Vec<DVec3>, loops: Vec<Vec<i64>>) -> Self {
        Self {
            points,
            coord_index: Some(loops),
            ..Self::default()
        }
    }
}
