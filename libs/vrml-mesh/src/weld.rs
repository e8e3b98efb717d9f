//! # Vertex Welding
//!
//! Collapses the corners of a [`TriangleSoup`] into a [`CompactMesh`].
//!
//! Two corners merge when their position, normal and UV all land on the same
//! cell of a grid with spacing `epsilon`. Each cell keeps the attributes of
//! the first corner that reached it. A triangle whose corners fall into
//! fewer than three distinct cells is dropped before it allocates anything,
//! so welding a welded mesh again with the same epsilon is a no-op.

use crate::math::{quantize2, quantize3};
use crate::mesh::{CompactMesh, TriangleSoup, Vertex};
use std::collections::HashMap;

type WeldKey = ([i64; 3], [i64; 3], Option<[i64; 2]>);

/// Welds a triangle soup.
///
/// Triangles that reference a missing position are left out.
///
/// # Example
///
/// ```rust
/// use vrml_mesh::{weld::weld, TriangleSoup};
/// use glam::DVec3;
///
/// // Two triangles that each own a copy of the shared edge.
/// let mut soup = TriangleSoup::new(vec![
///     DVec3::ZERO, DVec3::X, DVec3::Y,
///     DVec3::X, DVec3::new(1.0, 1.0, 0.0), DVec3::Y,
/// ]);
/// soup.add_triangle(0, 1, 2);
/// soup.add_triangle(3, 4, 5);
///
/// let mesh = weld(&soup, 1e-6);
/// assert_eq!(mesh.vertex_count(), 4);
/// assert_eq!(mesh.triangle_count(), 2);
/// ```
pub fn weld(soup: &TriangleSoup, epsilon: f64) -> CompactMesh {
    weld_triangles(soup.corners(), epsilon)
}

/// Welds a stream of corner triangles.
pub fn weld_triangles<I>(triangles: I, epsilon: f64) -> CompactMesh
where
    I: IntoIterator<Item = [Vertex; 3]>,
{
    let inv_epsilon = 1.0 / epsilon;
    let mut lookup: HashMap<WeldKey, u32> = HashMap::new();
    let mut vertices: Vec<Vertex> = Vec::new();
    let mut indices: Vec<[u32; 3]> = Vec::new();
    let mut dropped = 0usize;

    for corners in triangles {
        let keys = corners.map(|v| weld_key(&v, inv_epsilon));
        if keys[0] == keys[1] || keys[1] == keys[2] || keys[0] == keys[2] {
            dropped += 1;
            continue;
        }

        let mut triangle = [0u32; 3];
        for (slot, (key, vertex)) in triangle.iter_mut().zip(keys.into_iter().zip(corners)) {
            *slot = *lookup.entry(key).or_insert_with(|| {
                vertices.push(vertex);
                (vertices.len() - 1) as u32
            });
        }
        indices.push(triangle);
    }

    if dropped > 0 {
        log::debug!("welding dropped {dropped} collapsed triangle(s)");
    }

    CompactMesh::from_parts(vertices, indices)
}

fn weld_key(vertex: &Vertex, inv_epsilon: f64) -> WeldKey {
    (
        quantize3(vertex.position, inv_epsilon),
        quantize3(vertex.normal, inv_epsilon),
        vertex.uv.map(|uv| quantize2(uv, inv_epsilon)),
    )
}
