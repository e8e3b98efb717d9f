//! # Vector Utilities
//!
//! Small geometric helpers shared by the primitives, the normal synthesizer
//! and the welder. Everything is `f64`; narrowing to `f32` happens only in
//! the GPU export helpers on [`CompactMesh`](crate::mesh::CompactMesh).

use config::constants::{approx_equal, DEGENERATE_NORMAL_EPSILON};
use glam::{DVec2, DVec3};

/// Normal used wherever no direction can be derived.
pub const UP_AXIS: DVec3 = DVec3::Y;

/// Returns the unit normal of triangle `(a, b, c)` by the right-hand rule,
/// or `None` when the triangle has (near) zero area.
///
/// # Example
///
/// ```rust
/// use glam::DVec3;
/// use vrml_mesh::math::face_normal;
///
/// let n = face_normal(DVec3::ZERO, DVec3::X, DVec3::Y).unwrap();
/// assert_eq!(n, DVec3::Z);
/// assert!(face_normal(DVec3::ZERO, DVec3::X, DVec3::X * 2.0).is_none());
/// ```
pub fn face_normal(a: DVec3, b: DVec3, c: DVec3) -> Option<DVec3> {
    let cross = (b - a).cross(c - a);
    if cross.length_squared() <= DEGENERATE_NORMAL_EPSILON || !cross.is_finite() {
        return None;
    }
    Some(cross.normalize())
}

/// Normalizes `v`, falling back to [`UP_AXIS`] for zero or non-finite input.
#[inline]
pub fn normalize_or_up(v: DVec3) -> DVec3 {
    v.try_normalize().unwrap_or(UP_AXIS)
}

/// Angle in radians between two unit vectors.
#[inline]
pub fn angle_between_unit(a: DVec3, b: DVec3) -> f64 {
    a.dot(b).clamp(-1.0, 1.0).acos()
}

/// Snaps a coordinate onto the welding grid.
#[inline]
pub fn quantize(value: f64, inv_epsilon: f64) -> i64 {
    (value * inv_epsilon).round() as i64
}

/// Snaps a 3D vector onto the welding grid.
#[inline]
pub fn quantize3(v: DVec3, inv_epsilon: f64) -> [i64; 3] {
    [
        quantize(v.x, inv_epsilon),
        quantize(v.y, inv_epsilon),
        quantize(v.z, inv_epsilon),
    ]
}

/// Snaps a 2D vector onto the welding grid.
#[inline]
pub fn quantize2(v: DVec2, inv_epsilon: f64) -> [i64; 2] {
    [quantize(v.x, inv_epsilon), quantize(v.y, inv_epsilon)]
}

/// Component-wise approximate equality within `EPSILON`.
#[inline]
pub fn vec3_approx_equal(a: DVec3, b: DVec3) -> bool {
    approx_equal(a.x, b.x) && approx_equal(a.y, b.y) && approx_equal(a.z, b.z)
}
