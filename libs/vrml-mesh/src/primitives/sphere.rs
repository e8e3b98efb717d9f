//! # Sphere Primitive
//!
//! Generates the mesh for the VRML `Sphere` node using latitude/longitude
//! tessellation.

use super::{require_positive, require_segments};
use crate::error::MeshError;
use crate::mesh::{CompactMesh, TriangleSoup};
use crate::weld::weld;
use config::constants::DEFAULT_WELD_EPSILON;
use glam::{DVec2, DVec3};
use std::f64::consts::{PI, TAU};

/// Creates a sphere mesh centred on the origin.
///
/// # Arguments
///
/// * `radius` - The radius of the sphere
/// * `segments` - Number of segments around the circumference
///
/// # Algorithm
///
/// - `stacks = max(segments / 2, 2)` latitude bands from +Y to -Y
/// - Rings at polar angle `phi = PI * i / stacks`, pole rows included
/// - The triangle touching a pole is dropped from each pole quad
///
/// # Example
///
/// ```rust
/// use vrml_mesh::primitives::create_sphere;
///
/// let mesh = create_sphere(5.0, 16).unwrap();
/// assert!(mesh.validate());
/// ```
pub fn create_sphere(radius: f64, segments: u32) -> Result<CompactMesh, MeshError> {
    require_positive("Sphere", "radius", radius)?;
    require_segments("Sphere", segments)?;

    let columns = segments as usize;
    let stacks = (columns / 2).max(2);

    let mut soup = TriangleSoup::with_capacity((stacks + 1) * (columns + 1), 2 * stacks * columns);

    // Ring i, column j at index i * (columns + 1) + j.
    let mut normals = Vec::with_capacity((stacks + 1) * (columns + 1));
    let mut uvs = Vec::with_capacity((stacks + 1) * (columns + 1));
    for i in 0..=stacks {
        let v = i as f64 / stacks as f64;
        let (ring, y) = (v * PI).sin_cos();
        for j in 0..=columns {
            let u = j as f64 / columns as f64;
            let (sin, cos) = (u * TAU).sin_cos();
            let normal = DVec3::new(ring * sin, y, ring * cos);
            soup.add_position(normal * radius);
            normals.push(normal);
            uvs.push(DVec2::new(u, 1.0 - v));
        }
    }

    let at = |i: usize, j: usize| i * (columns + 1) + j;
    for i in 0..stacks {
        for j in 0..columns {
            let (a0, a1) = (at(i, j), at(i, j + 1));
            let (b0, b1) = (at(i + 1, j), at(i + 1, j + 1));

            if i + 1 < stacks {
                push(&mut soup, &normals, &uvs, [b0, b1, a1]);
            }
            if i > 0 {
                push(&mut soup, &normals, &uvs, [b0, a1, a0]);
            }
        }
    }

    Ok(weld(&soup, DEFAULT_WELD_EPSILON))
}

fn push(soup: &mut TriangleSoup, normals: &[DVec3], uvs: &[DVec2], corners: [usize; 3]) {
    soup.add_shaded_triangle(
        corners.map(|c| c as u32),
        corners.map(|c| normals[c]),
        corners.map(|c| uvs[c]),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::test_support::assert_outward;
    use approx::assert_relative_eq;

    #[test]
    fn test_sphere_basic() {
        let mesh = create_sphere(5.0, 16).unwrap();
        assert!(mesh.vertex_count() > 0);
        // 8 stacks, two pole bands of single triangles.
        assert_eq!(mesh.triangle_count(), 2 * 8 * 16 - 2 * 16);
    }

    #[test]
    fn test_sphere_validates() {
        let mesh = create_sphere(5.0, 16).unwrap();
        assert!(mesh.validate());
    }

    #[test]
    fn test_sphere_vertices_on_surface() {
        let radius = 2.5;
        let mesh = create_sphere(radius, 24).unwrap();
        for v in mesh.vertices() {
            assert_relative_eq!(v.position.length(), radius, epsilon = 1e-9);
            assert_relative_eq!(v.normal.dot(v.position / radius), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_sphere_bounding_box() {
        let mesh = create_sphere(1.0, 32).unwrap();
        let (min, max) = mesh.bounding_box();
        assert_relative_eq!(max.y, 1.0);
        assert_relative_eq!(min.y, -1.0);
        assert!(max.x <= 1.0 + 1e-9);
    }

    #[test]
    fn test_sphere_is_outward() {
        assert_outward(&create_sphere(1.0, 12).unwrap());
    }

    #[test]
    fn test_sphere_minimum_segments() {
        let mesh = create_sphere(1.0, 3).unwrap();
        assert!(mesh.validate());
        assert_outward(&mesh);
    }

    #[test]
    fn test_sphere_invalid_radius() {
        assert!(create_sphere(0.0, 16).is_err());
        assert!(create_sphere(-5.0, 16).is_err());
    }

    #[test]
    fn test_sphere_too_few_segments() {
        assert!(create_sphere(5.0, 2).is_err());
    }
}
