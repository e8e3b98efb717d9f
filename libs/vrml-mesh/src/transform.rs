//! # Transform State
//!
//! The local translation, rotation and scale of a `Transform` node.
//! VRML stores rotation as axis-angle; it is converted to a quaternion once
//! here. Composition into world matrices happens in the walker.

use config::constants::approx_zero;
use glam::{DMat4, DQuat, DVec3, DVec4};
use serde::Serialize;
use vrml_nodes::TransformFields;

/// Decomposed local transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransformState {
    pub translation: DVec3,
    pub rotation: DQuat,
    pub scale: DVec3,
}

impl Default for TransformState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TransformState {
    /// No translation, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        translation: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
        scale: DVec3::ONE,
    };

    /// Reads a `Transform` node's fields, taking VRML defaults for missing
    /// ones.
    ///
    /// # Example
    ///
    /// ```rust
    /// use glam::{DVec3, DVec4};
    /// use vrml_mesh::TransformState;
    /// use vrml_nodes::TransformFields;
    ///
    /// let fields = TransformFields {
    ///     translation: Some(DVec3::new(1.0, 2.0, 3.0)),
    ///     rotation: Some(DVec4::new(0.0, 1.0, 0.0, std::f64::consts::FRAC_PI_2)),
    ///     scale: None,
    /// };
    /// let state = TransformState::from_fields(&fields);
    /// assert_eq!(state.translation, DVec3::new(1.0, 2.0, 3.0));
    /// assert_eq!(state.scale, DVec3::ONE);
    /// ```
    pub fn from_fields(fields: &TransformFields) -> Self {
        Self {
            translation: fields.translation.unwrap_or(DVec3::ZERO),
            rotation: fields.rotation.map_or(DQuat::IDENTITY, axis_angle),
            scale: fields.scale.unwrap_or(DVec3::ONE),
        }
    }

    /// Returns the matrix `T * R * S`.
    pub fn to_matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Returns true if this is exactly the identity.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// Converts VRML axis-angle (`x y z angle`) to a quaternion.
///
/// A zero or non-finite axis, or a zero or non-finite angle, yields the
/// identity.
fn axis_angle(rotation: DVec4) -> DQuat {
    match rotation.truncate().try_normalize() {
        Some(axis) if rotation.w.is_finite() && !approx_zero(rotation.w) => {
            DQuat::from_axis_angle(axis, rotation.w)
        }
        _ => DQuat::IDENTITY,
    }
}
