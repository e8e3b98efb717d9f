//! # Cylinder and Cone Primitives
//!
//! Both are frusta around the Y axis: a cylinder has equal radii, a cone
//! has a top radius of zero by default. A zero radius drops that cap and
//! turns the side into a fan meeting at the apex; with both radii zero
//! nothing is left and the mesh is empty. A zero height has no side at all:
//! the two caps lie back to back as a flat disk.

use super::{require_non_negative, require_segments};
use crate::error::MeshError;
use crate::mesh::{CompactMesh, TriangleSoup};
use crate::weld::weld;
use config::constants::DEFAULT_WELD_EPSILON;
use glam::{DVec2, DVec3};
use std::f64::consts::TAU;

/// Creates a capped cylinder centred on the origin.
///
/// # Arguments
///
/// * `radius` - Radius of both caps
/// * `height` - Extent along Y, split evenly above and below the origin
/// * `segments` - Number of facets around the axis
///
/// # Example
///
/// ```rust
/// use vrml_mesh::primitives::create_cylinder;
///
/// let mesh = create_cylinder(1.0, 2.0, 8).unwrap();
/// // Side rings with a duplicated seam plus two fanned caps.
/// assert_eq!(mesh.vertex_count(), 36);
/// assert_eq!(mesh.triangle_count(), 32);
/// ```
pub fn create_cylinder(radius: f64, height: f64, segments: u32) -> Result<CompactMesh, MeshError> {
    require_non_negative("Cylinder", "radius", radius)?;
    require_non_negative("Cylinder", "height", height)?;
    require_segments("Cylinder", segments)?;
    Ok(create_frustum(radius, radius, height, segments))
}

/// Creates a cone or truncated cone centred on the origin.
///
/// # Arguments
///
/// * `bottom_radius` - Radius at `y = -height / 2`
/// * `top_radius` - Radius at `y = +height / 2`; zero gives a pointed cone
/// * `height` - Extent along Y
/// * `segments` - Number of facets around the axis
///
/// # Example
///
/// ```rust
/// use vrml_mesh::primitives::create_cone;
///
/// let mesh = create_cone(1.0, 0.0, 2.0, 16).unwrap();
/// assert!(mesh.validate());
/// assert!(create_cone(-1.0, 0.0, 2.0, 16).is_err());
/// ```
pub fn create_cone(
    bottom_radius: f64,
    top_radius: f64,
    height: f64,
    segments: u32,
) -> Result<CompactMesh, MeshError> {
    require_non_negative("Cone", "bottomRadius", bottom_radius)?;
    require_non_negative("Cone", "topRadius", top_radius)?;
    require_non_negative("Cone", "height", height)?;
    require_segments("Cone", segments)?;
    Ok(create_frustum(bottom_radius, top_radius, height, segments))
}

/// Builds the frustum once the parameters are known to be valid.
fn create_frustum(bottom_radius: f64, top_radius: f64, height: f64, segments: u32) -> CompactMesh {
    let n = segments as usize;
    let half = height / 2.0;
    // Slant normals tilt toward the narrower end.
    let slope = bottom_radius - top_radius;

    let mut soup = TriangleSoup::with_capacity(8 * n + 2, 4 * n);

    // Side
    let side = if height > 0.0 { n } else { 0 };
    for j in 0..side {
        let (dir0, u0) = ring_direction(j, n);
        let (dir1, u1) = ring_direction(j + 1, n);
        let n0 = DVec3::new(dir0.x * height, slope, dir0.z * height).normalize();
        let n1 = DVec3::new(dir1.x * height, slope, dir1.z * height).normalize();

        let b0 = soup.add_position(dir0 * bottom_radius - DVec3::Y * half);
        let b1 = soup.add_position(dir1 * bottom_radius - DVec3::Y * half);
        let t0 = soup.add_position(dir0 * top_radius + DVec3::Y * half);
        let t1 = soup.add_position(dir1 * top_radius + DVec3::Y * half);

        if bottom_radius > 0.0 {
            soup.add_shaded_triangle(
                [b0, b1, t1],
                [n0, n1, n1],
                [DVec2::new(u0, 0.0), DVec2::new(u1, 0.0), DVec2::new(u1, 1.0)],
            );
        }
        if top_radius > 0.0 {
            soup.add_shaded_triangle(
                [b0, t1, t0],
                [n0, n1, n0],
                [DVec2::new(u0, 0.0), DVec2::new(u1, 1.0), DVec2::new(u0, 1.0)],
            );
        }
    }

    if top_radius > 0.0 {
        add_cap(&mut soup, top_radius, half, n, true);
    }
    if bottom_radius > 0.0 {
        add_cap(&mut soup, bottom_radius, -half, n, false);
    }

    weld(&soup, DEFAULT_WELD_EPSILON)
}

/// Adds a fan cap around a centre vertex at height `y`.
fn add_cap(soup: &mut TriangleSoup, radius: f64, y: f64, n: usize, top: bool) {
    let normal = if top { DVec3::Y } else { DVec3::NEG_Y };
    let center = soup.add_position(DVec3::new(0.0, y, 0.0));
    let center_uv = DVec2::splat(0.5);

    for j in 0..n {
        let (dir0, _) = ring_direction(j, n);
        let (dir1, _) = ring_direction(j + 1, n);
        let p0 = soup.add_position(dir0 * radius + DVec3::Y * y);
        let p1 = soup.add_position(dir1 * radius + DVec3::Y * y);
        let uv0 = cap_uv(dir0);
        let uv1 = cap_uv(dir1);

        if top {
            soup.add_shaded_triangle([center, p0, p1], [normal; 3], [center_uv, uv0, uv1]);
        } else {
            soup.add_shaded_triangle([center, p1, p0], [normal; 3], [center_uv, uv1, uv0]);
        }
    }
}

/// Unit direction of ring column `j` of `n` and its `u` coordinate.
///
/// Column 0 points along +Z and the angle grows toward +X.
fn ring_direction(j: usize, n: usize) -> (DVec3, f64) {
    let u = j as f64 / n as f64;
    let (sin, cos) = (u * TAU).sin_cos();
    (DVec3::new(sin, 0.0, cos), u)
}

fn cap_uv(direction: DVec3) -> DVec2 {
    DVec2::new(0.5 + 0.5 * direction.x, 0.5 - 0.5 * direction.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::test_support::assert_outward;
    use approx::assert_relative_eq;

    #[test]
    fn test_cylinder_basic() {
        let mesh = create_cylinder(1.0, 2.0, 16).unwrap();
        assert!(mesh.validate());
        assert_eq!(mesh.vertex_count(), 4 * 16 + 4);
        assert_eq!(mesh.triangle_count(), 4 * 16);
    }

    #[test]
    fn test_cylinder_bounding_box() {
        let mesh = create_cylinder(2.0, 3.0, 32).unwrap();
        let (min, max) = mesh.bounding_box();
        assert_relative_eq!(max.y, 1.5);
        assert_relative_eq!(min.y, -1.5);
        assert_relative_eq!(max.z, 2.0);
        assert!(max.x <= 2.0 + 1e-9);
    }

    #[test]
    fn test_cylinder_is_outward() {
        assert_outward(&create_cylinder(1.0, 2.0, 12).unwrap());
    }

    #[test]
    fn test_cylinder_side_normals_are_horizontal() {
        let mesh = create_cylinder(1.0, 2.0, 12).unwrap();
        for v in mesh.vertices() {
            let on_side = v.normal.y.abs() < 1e-12;
            let on_cap = (v.normal.y.abs() - 1.0).abs() < 1e-12;
            assert!(on_side || on_cap);
        }
    }

    #[test]
    fn test_cone() {
        let mesh = create_cone(1.0, 0.0, 2.0, 16).unwrap();
        assert!(mesh.validate());
        assert_outward(&mesh);
        // No top cap: nothing faces straight up.
        assert!(mesh.vertices().iter().all(|v| v.normal.y < 1.0 - 1e-9));
        let (_, max) = mesh.bounding_box();
        assert_relative_eq!(max.y, 1.0);
    }

    #[test]
    fn test_inverted_cone() {
        let mesh = create_cone(0.0, 1.0, 2.0, 16).unwrap();
        assert!(mesh.validate());
        assert_outward(&mesh);
    }

    #[test]
    fn test_truncated_cone_slant_normals() {
        let mesh = create_cone(2.0, 1.0, 1.0, 8).unwrap();
        assert_outward(&mesh);
        let side = mesh
            .vertices()
            .iter()
            .find(|v| v.normal.y > 0.0 && v.normal.y < 1.0)
            .unwrap();
        // Radius drops by 1 over a height of 1: 45 degree slant.
        assert_relative_eq!(side.normal.y, std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_radii_give_empty_mesh() {
        assert!(create_cylinder(0.0, 1.0, 16).unwrap().is_empty());
        assert!(create_cone(0.0, 0.0, 1.0, 16).unwrap().is_empty());
    }

    #[test]
    fn test_zero_height_is_a_flat_disk() {
        let mesh = create_cylinder(1.0, 0.0, 16).unwrap();
        assert!(mesh.validate());
        assert_eq!(mesh.triangle_count(), 2 * 16);
        let (min, max) = mesh.bounding_box();
        assert_eq!(min.y, 0.0);
        assert_eq!(max.y, 0.0);
        assert!(mesh.vertices().iter().all(|v| v.normal.y.abs() == 1.0));

        let cone = create_cone(1.0, 0.0, 0.0, 16).unwrap();
        assert!(cone.validate());
        assert_eq!(cone.triangle_count(), 16);
    }

    #[test]
    fn test_cylinder_invalid_parameters() {
        assert!(create_cylinder(-0.5, 1.0, 16).is_err());
        assert!(create_cylinder(1.0, -1.0, 16).is_err());
        assert!(create_cylinder(1.0, f64::INFINITY, 16).is_err());
        assert!(create_cylinder(1.0, 1.0, 2).is_err());
    }

    #[test]
    fn test_cone_invalid_parameters() {
        assert!(create_cone(-1.0, 0.0, 1.0, 16).is_err());
        assert!(create_cone(1.0, 0.0, -0.5, 16).is_err());
        assert!(matches!(
            create_cone(1.0, f64::NAN, 1.0, 16),
            Err(MeshError::InvalidGeometryParameter { .. })
        ));
    }
}
