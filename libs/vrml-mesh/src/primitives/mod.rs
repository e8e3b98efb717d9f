//! # Primitives
//!
//! Mesh generation for the VRML primitives (box, cylinder, cone, sphere).
//!
//! Every primitive is centred on the origin with its axis along +Y, wound
//! counter-clockwise seen from outside, and carries analytic outward
//! normals and UVs. Round primitives duplicate the UV seam so the welder
//! keeps `u = 0` and `u = 1` apart.

pub mod cuboid;
pub mod cylinder;
pub mod sphere;

pub use cuboid::create_box;
pub use cylinder::{create_cone, create_cylinder};
pub use sphere::create_sphere;

use crate::error::MeshError;
use config::constants::{MAX_SEGMENTS, MIN_SEGMENTS};

/// Rejects a dimension that is not strictly positive and finite.
pub(crate) fn require_positive(primitive: &str, field: &str, value: f64) -> Result<(), MeshError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MeshError::invalid_parameter(format!(
            "{primitive} {field} must be positive: {value}"
        )))
    }
}

/// Rejects a dimension that is negative or not finite.
pub(crate) fn require_non_negative(primitive: &str, field: &str, value: f64) -> Result<(), MeshError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(MeshError::invalid_parameter(format!(
            "{primitive} {field} must not be negative: {value}"
        )))
    }
}

/// Rejects a segment count outside `MIN_SEGMENTS..=MAX_SEGMENTS`.
pub(crate) fn require_segments(primitive: &str, segments: u32) -> Result<(), MeshError> {
    if (MIN_SEGMENTS..=MAX_SEGMENTS).contains(&segments) {
        Ok(())
    } else {
        Err(MeshError::invalid_parameter(format!(
            "{primitive} segments must be within {MIN_SEGMENTS}..={MAX_SEGMENTS}: {segments}"
        )))
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::math::face_normal;
    use crate::mesh::CompactMesh;

    /// Asserts that every triangle of a convex, origin-centred mesh faces
    /// away from the origin and agrees with its vertex normals.
    pub fn assert_outward(mesh: &CompactMesh) {
        for [a, b, c] in mesh.corners() {
            let normal = face_normal(a.position, b.position, c.position)
                .expect("primitive triangles have area");
            let centroid = (a.position + b.position + c.position) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "inward triangle at {centroid:?}");
            for v in [a, b, c] {
                assert!(v.normal.dot(normal) > 0.0, "normal disagrees at {:?}", v.position);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_positive() {
        assert!(require_positive("Box", "size", 1.0).is_ok());
        assert!(require_positive("Box", "size", 0.0).is_err());
        assert!(require_positive("Box", "size", f64::NAN).is_err());
    }

    #[test]
    fn test_require_non_negative() {
        assert!(require_non_negative("Cone", "topRadius", 0.0).is_ok());
        let err = require_non_negative("Cone", "topRadius", -1.0).unwrap_err();
        assert!(err.to_string().contains("topRadius"));
    }

    #[test]
    fn test_require_segments() {
        assert!(require_segments("Sphere", MIN_SEGMENTS).is_ok());
        assert!(require_segments("Sphere", MIN_SEGMENTS - 1).is_err());
        assert!(require_segments("Sphere", MAX_SEGMENTS + 1).is_err());
    }
}
