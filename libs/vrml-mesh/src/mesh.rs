//! # Mesh Data Structures
//!
//! Two triangle representations and the geometry a record can carry.
//!
//! - [`TriangleSoup`]: shared positions plus triangles, with UVs and normals
//!   stored per corner (`3 * triangle + k`). This is what the primitives and
//!   the face-set assembler produce.
//! - [`CompactMesh`]: deduplicated [`Vertex`] list plus triangles, produced by
//!   the [welder](crate::weld). This is what records carry.

use crate::math::UP_AXIS;
use crate::weld::weld_triangles;
use glam::{DVec2, DVec3};
use serde::Serialize;

// =============================================================================
// VERTEX
// =============================================================================

/// One welded vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vertex {
    pub position: DVec3,
    /// Unit length
    pub normal: DVec3,
    pub uv: Option<DVec2>,
}

impl Vertex {
    /// Creates a vertex.
    pub fn new(position: DVec3, normal: DVec3, uv: Option<DVec2>) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

// =============================================================================
// TRIANGLE SOUP
// =============================================================================

/// Triangles over shared positions with per-corner attributes.
///
/// When `uvs` or `normals` is present it holds exactly three entries per
/// triangle, in triangle order.
///
/// # Example
///
/// ```rust
/// use vrml_mesh::TriangleSoup;
/// use glam::DVec3;
///
/// let mut soup = TriangleSoup::new(vec![DVec3::ZERO, DVec3::X, DVec3::Y]);
/// soup.add_triangle(0, 1, 2);
/// assert_eq!(soup.triangle_count(), 1);
/// assert!(soup.validate());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleSoup {
    pub positions: Vec<DVec3>,
    pub triangles: Vec<[u32; 3]>,
    pub uvs: Option<Vec<DVec2>>,
    pub normals: Option<Vec<DVec3>>,
}

impl TriangleSoup {
    /// Creates a soup over the given positions with no triangles.
    pub fn new(positions: Vec<DVec3>) -> Self {
        Self {
            positions,
            ..Self::default()
        }
    }

    /// Creates an empty soup with pre-allocated capacity.
    pub fn with_capacity(position_count: usize, triangle_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(position_count),
            triangles: Vec::with_capacity(triangle_count),
            uvs: None,
            normals: None,
        }
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Adds a position and returns its index.
    pub fn add_position(&mut self, position: DVec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        index
    }

    /// Adds a triangle by position indices, without corner attributes.
    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) {
        self.triangles.push([v0, v1, v2]);
    }

    /// Adds a triangle together with its corner normals and UVs.
    ///
    /// Only meaningful on a soup whose every triangle is added this way.
    pub fn add_shaded_triangle(&mut self, indices: [u32; 3], normals: [DVec3; 3], uvs: [DVec2; 3]) {
        self.triangles.push(indices);
        self.normals.get_or_insert_with(Vec::new).extend(normals);
        self.uvs.get_or_insert_with(Vec::new).extend(uvs);
    }

    /// Appends the fan triangulation of one polygon loop.
    ///
    /// See [`crate::triangulate`] for the slot order.
    pub fn append_polygon(&mut self, polygon: &[u32], ccw: bool) {
        crate::triangulate::append_loop(&mut self.triangles, polygon, ccw);
    }

    /// Returns corner `k` of triangle `tri` as a vertex, or `None` when the
    /// triangle or its position does not exist.
    ///
    /// Missing normals read as [`UP_AXIS`] and missing UVs as `None`.
    pub fn corner(&self, tri: usize, k: usize) -> Option<Vertex> {
        let slot = 3 * tri + k;
        let index = *self.triangles.get(tri)?.get(k)? as usize;
        Some(Vertex {
            position: *self.positions.get(index)?,
            normal: self
                .normals
                .as_ref()
                .and_then(|n| n.get(slot).copied())
                .unwrap_or(UP_AXIS),
            uv: self.uvs.as_ref().and_then(|uv| uv.get(slot).copied()),
        })
    }

    /// Iterates over every triangle as three corner vertices.
    ///
    /// Triangles that index past `positions` are skipped; [`validate`]
    /// reports them.
    ///
    /// [`validate`]: Self::validate
    pub fn corners(&self) -> impl Iterator<Item = [Vertex; 3]> + '_ {
        (0..self.triangles.len()).filter_map(move |tri| {
            Some([self.corner(tri, 0)?, self.corner(tri, 1)?, self.corner(tri, 2)?])
        })
    }

    /// Checks that every index is in range and every present corner
    /// attribute list has three entries per triangle.
    pub fn validate(&self) -> bool {
        let position_count = self.positions.len();
        let corner_count = self.triangles.len() * 3;
        self.triangles
            .iter()
            .all(|tri| tri.iter().all(|&i| (i as usize) < position_count))
            && self.uvs.as_ref().map_or(true, |uv| uv.len() == corner_count)
            && self.normals.as_ref().map_or(true, |n| n.len() == corner_count)
    }
}

// =============================================================================
// COMPACT MESH
// =============================================================================

/// Welded triangle mesh: distinct vertices and triangles into them.
///
/// Every index is in range and the three indices of a triangle are
/// distinct.
///
/// # Example
///
/// ```rust
/// use vrml_mesh::primitives::create_box;
/// use glam::DVec3;
///
/// let mesh = create_box(DVec3::ONE).unwrap();
/// assert_eq!(mesh.vertex_count(), 24);
/// assert_eq!(mesh.triangle_count(), 12);
/// assert!(mesh.validate());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompactMesh {
    vertices: Vec<Vertex>,
    triangles: Vec<[u32; 3]>,
}

impl CompactMesh {
    /// Builds a mesh from already welded parts.
    pub(crate) fn from_parts(vertices: Vec<Vertex>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            vertices,
            triangles,
        }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh has no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Returns a reference to the vertices.
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Returns a reference to the triangles.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Returns true if any vertex carries a UV.
    pub fn has_uvs(&self) -> bool {
        self.vertices.iter().any(|v| v.uv.is_some())
    }

    /// Iterates over every triangle as three vertices.
    pub fn corners(&self) -> impl Iterator<Item = [Vertex; 3]> + '_ {
        self.triangles.iter().map(move |tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }

    /// Welds this mesh again with the given epsilon.
    ///
    /// Welding an already welded mesh with the same epsilon leaves it
    /// unchanged.
    pub fn reweld(&self, epsilon: f64) -> CompactMesh {
        weld_triangles(self.corners(), epsilon)
    }

    /// Drops every UV and welds the result, so vertices that differed only
    /// by UV merge.
    pub fn without_uvs(&self, epsilon: f64) -> CompactMesh {
        weld_triangles(
            self.corners().map(|tri| tri.map(|v| Vertex { uv: None, ..v })),
            epsilon,
        )
    }

    /// Computes the axis-aligned bounding box.
    ///
    /// Returns (min, max) corners of the bounding box.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        let Some(first) = self.vertices.first() else {
            return (DVec3::ZERO, DVec3::ZERO);
        };

        self.vertices[1..]
            .iter()
            .fold((first.position, first.position), |(min, max), v| {
                (min.min(v.position), max.max(v.position))
            })
    }

    /// Validates the mesh for correctness.
    ///
    /// Checks:
    /// - All triangle indices are valid
    /// - No triangle repeats a vertex index
    /// - All normals have unit length
    ///
    /// Returns true if valid.
    pub fn validate(&self) -> bool {
        let vertex_count = self.vertices.len() as u32;

        let triangles_ok = self.triangles.iter().all(|tri| {
            tri.iter().all(|&i| i < vertex_count)
                && tri[0] != tri[1]
                && tri[1] != tri[2]
                && tri[0] != tri[2]
        });

        triangles_ok
            && self
                .vertices
                .iter()
                .all(|v| (v.normal.length() - 1.0).abs() < 1e-6)
    }

    /// Exports positions as f32 array for GPU.
    ///
    /// Returns flattened [x, y, z, x, y, z, ...] array.
    pub fn positions_f32(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| [v.position.x as f32, v.position.y as f32, v.position.z as f32])
            .collect()
    }

    /// Exports normals as f32 array for GPU.
    pub fn normals_f32(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|v| [v.normal.x as f32, v.normal.y as f32, v.normal.z as f32])
            .collect()
    }

    /// Exports UVs as f32 array for GPU, or `None` when the mesh has none.
    ///
    /// Vertices without a UV export `(0, 0)`.
    pub fn uvs_f32(&self) -> Option<Vec<f32>> {
        if !self.has_uvs() {
            return None;
        }
        Some(
            self.vertices
                .iter()
                .flat_map(|v| {
                    let uv = v.uv.unwrap_or(DVec2::ZERO);
                    [uv.x as f32, uv.y as f32]
                })
                .collect(),
        )
    }

    /// Exports triangle indices as u32 array for GPU.
    ///
    /// Returns flattened [i0, i1, i2, i0, i1, i2, ...] array.
    pub fn indices_u32(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }
}

// =============================================================================
// NON-TRIANGLE GEOMETRY
// =============================================================================

/// Line segments over shared positions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LineSet {
    pub positions: Vec<DVec3>,
    pub segments: Vec<[u32; 2]>,
}

/// Unconnected points.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PointCloud {
    pub positions: Vec<DVec3>,
}

/// The geometry a record carries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Geometry {
    /// Box, Cylinder, Cone, Sphere, IndexedFaceSet
    Mesh(CompactMesh),
    /// IndexedLineSet
    Lines(LineSet),
    /// PointSet
    Points(PointCloud),
}

impl Geometry {
    /// Returns the triangle mesh, if this is one.
    pub fn as_mesh(&self) -> Option<&CompactMesh> {
        match self {
            Self::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad_soup() -> TriangleSoup {
        let mut soup = TriangleSoup::new(vec![
            DVec3::ZERO,
            DVec3::X,
            DVec3::new(1.0, 1.0, 0.0),
            DVec3::Y,
        ]);
        soup.add_triangle(0, 1, 2);
        soup.add_triangle(0, 2, 3);
        soup
    }

    #[test]
    fn test_soup_corner_defaults() {
        let soup = quad_soup();
        let corner = soup.corner(1, 2).unwrap();
        assert_eq!(corner.position, DVec3::Y);
        assert_eq!(corner.normal, UP_AXIS);
        assert_eq!(corner.uv, None);
    }

    #[test]
    fn test_soup_shaded_triangle_keeps_corner_alignment() {
        let mut soup = TriangleSoup::with_capacity(3, 1);
        let a = soup.add_position(DVec3::ZERO);
        let b = soup.add_position(DVec3::X);
        let c = soup.add_position(DVec3::Y);
        soup.add_shaded_triangle(
            [a, b, c],
            [DVec3::Z; 3],
            [DVec2::ZERO, DVec2::X, DVec2::Y],
        );
        assert!(soup.validate());
        assert_eq!(soup.corner(0, 1).unwrap().uv, Some(DVec2::X));
        assert_eq!(soup.corner(0, 2).unwrap().normal, DVec3::Z);
    }

    #[test]
    fn test_soup_validate_rejects_bad_index_and_short_uvs() {
        let mut soup = quad_soup();
        assert!(soup.validate());
        soup.uvs = Some(vec![DVec2::ZERO; 5]);
        assert!(!soup.validate());
        soup.uvs = None;
        soup.add_triangle(0, 1, 9);
        assert!(!soup.validate());
    }

    #[test]
    fn test_compact_mesh_from_soup() {
        let mesh = weld_triangles(quad_soup().corners(), 1e-6);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.validate());
        assert!(!mesh.has_uvs());
        assert_eq!(mesh.uvs_f32(), None);
    }

    #[test]
    fn test_compact_mesh_bounding_box() {
        let mesh = weld_triangles(quad_soup().corners(), 1e-6);
        let (min, max) = mesh.bounding_box();
        assert_eq!(min, DVec3::ZERO);
        assert_eq!(max, DVec3::new(1.0, 1.0, 0.0));
        assert_eq!(CompactMesh::default().bounding_box(), (DVec3::ZERO, DVec3::ZERO));
    }

    #[test]
    fn test_compact_mesh_gpu_export() {
        let mesh = weld_triangles(quad_soup().corners(), 1e-6);
        assert_eq!(mesh.positions_f32().len(), 12);
        assert_eq!(mesh.normals_f32().len(), 12);
        assert_eq!(mesh.indices_u32(), vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_compact_mesh_validate_rejects_repeated_index() {
        let v = Vertex::new(DVec3::ZERO, DVec3::Y, None);
        let mesh = CompactMesh::from_parts(vec![v, v], vec![[0, 1, 1]]);
        assert!(!mesh.validate());
    }

    #[test]
    fn test_geometry_as_mesh() {
        let mesh = Geometry::Mesh(CompactMesh::default());
        assert!(mesh.as_mesh().is_some());
        assert!(Geometry::Points(PointCloud::default()).as_mesh().is_none());
    }
}
