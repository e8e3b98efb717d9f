//! # Materials
//!
//! Renderer-neutral material parameters synthesized from a VRML `Material`
//! node. Colors are clamped into `[0, 1]` and narrowed to `f32`; alpha is
//! `1 - transparency`.

use config::constants::{
    DEFAULT_ALPHA, DEFAULT_DIFFUSE_COLOR, DEFAULT_EMISSIVE_COLOR, FALLBACK_DIFFUSE_COLOR,
};
use glam::DVec3;
use serde::Serialize;
use vrml_nodes::MaterialFields;

/// Material parameters for one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Material {
    pub diffuse: [f32; 3],
    pub emissive: [f32; 3],
    pub alpha: f32,
}

impl Default for Material {
    /// VRML97 defaults for a `Material` node with no fields set.
    fn default() -> Self {
        Self {
            diffuse: DEFAULT_DIFFUSE_COLOR,
            emissive: DEFAULT_EMISSIVE_COLOR,
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl Material {
    /// Material for a Shape that has no usable material.
    pub fn fallback() -> Self {
        Self {
            diffuse: FALLBACK_DIFFUSE_COLOR,
            ..Self::default()
        }
    }

    /// Synthesizes a material from node fields.
    ///
    /// Missing or non-finite components take the default.
    ///
    /// # Example
    ///
    /// ```rust
    /// use glam::DVec3;
    /// use vrml_mesh::Material;
    /// use vrml_nodes::MaterialFields;
    ///
    /// let fields = MaterialFields {
    ///     diffuse_color: Some(DVec3::new(2.0, 0.5, -1.0)),
    ///     transparency: Some(0.25),
    ///     ..Default::default()
    /// };
    /// let material = Material::from_fields(&fields);
    /// assert_eq!(material.diffuse, [1.0, 0.5, 0.0]);
    /// assert_eq!(material.alpha, 0.75);
    /// ```
    pub fn from_fields(fields: &MaterialFields) -> Self {
        let alpha = fields
            .transparency
            .filter(|t| t.is_finite())
            .map_or(DEFAULT_ALPHA, |t| (1.0 - t.clamp(0.0, 1.0)) as f32);

        Self {
            diffuse: color(fields.diffuse_color, DEFAULT_DIFFUSE_COLOR),
            emissive: color(fields.emissive_color, DEFAULT_EMISSIVE_COLOR),
            alpha,
        }
    }

    /// Returns true when the material is not fully opaque.
    pub fn is_transparent(&self) -> bool {
        self.alpha < 1.0
    }
}

fn color(value: Option<DVec3>, default: [f32; 3]) -> [f32; 3] {
    let Some(value) = value else {
        return default;
    };
    let mut out = default;
    for (slot, component) in out.iter_mut().zip(value.to_array()) {
        if component.is_finite() {
            *slot = component.clamp(0.0, 1.0) as f32;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let material = Material::from_fields(&MaterialFields::default());
        assert_eq!(material, Material::default());
        assert!(!material.is_transparent());
    }

    #[test]
    fn test_fallback_is_grey() {
        assert_eq!(Material::fallback().diffuse, [0.6, 0.6, 0.6]);
        assert_eq!(Material::fallback().alpha, 1.0);
    }

    #[test]
    fn test_alpha_from_transparency() {
        let fields = MaterialFields {
            transparency: Some(0.3),
            ..Default::default()
        };
        let material = Material::from_fields(&fields);
        assert_relative_eq!(material.alpha, 0.7, epsilon = 1e-6);
        assert!(material.is_transparent());
    }

    #[test]
    fn test_out_of_range_transparency_is_clamped() {
        let fields = MaterialFields {
            transparency: Some(1.5),
            ..Default::default()
        };
        assert_eq!(Material::from_fields(&fields).alpha, 0.0);
        let fields = MaterialFields {
            transparency: Some(f64::NAN),
            ..Default::default()
        };
        assert_eq!(Material::from_fields(&fields).alpha, 1.0);
    }

    #[test]
    fn test_emissive_and_non_finite_components() {
        let fields = MaterialFields {
            diffuse_color: Some(DVec3::new(f64::NAN, 0.25, 0.0)),
            emissive_color: Some(DVec3::new(0.0, 0.0, 3.0)),
            ..Default::default()
        };
        let material = Material::from_fields(&fields);
        assert_eq!(material.diffuse, [0.8, 0.25, 0.0]);
        assert_eq!(material.emissive, [0.0, 0.0, 1.0]);
    }
}
