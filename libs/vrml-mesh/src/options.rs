//! # Conversion Options
//!
//! Knobs for one conversion. Deserializable from the host's JSON with
//! camelCase keys; every key is optional.
//!
//! ```json
//! { "ccw": true, "creaseAngle": 0.5, "weldEpsilon": 1e-6, "emitUv": true, "segments": 32 }
//! ```
//!
//! `creaseAngle` accepts a number of radians or `false` for flat shading.

use crate::normals::Shading;
use config::constants::{ConfigError, GlobalConfig, DEFAULT_SEGMENTS, DEFAULT_WELD_EPSILON};
use serde::{Deserialize, Deserializer};

/// Options for [`convert`](crate::convert).
///
/// # Example
///
/// ```rust
/// use vrml_mesh::ConvertOptions;
///
/// let options: ConvertOptions =
///     serde_json::from_str(r#"{"creaseAngle": false, "segments": 12}"#).unwrap();
/// assert_eq!(options.crease_angle, None);
/// assert_eq!(options.segments, 12);
/// assert!(options.ccw);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConvertOptions {
    /// Winding of face-set loops that do not say otherwise
    pub ccw: bool,
    /// Smoothing threshold in radians; `None` shades flat
    #[serde(deserialize_with = "crease_angle_or_false")]
    pub crease_angle: Option<f64>,
    /// Welding grid size
    pub weld_epsilon: f64,
    /// Whether meshes carry UVs
    pub emit_uv: bool,
    /// Facets around round primitives
    pub segments: u32,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            ccw: true,
            crease_angle: None,
            weld_epsilon: DEFAULT_WELD_EPSILON,
            emit_uv: true,
            segments: DEFAULT_SEGMENTS,
        }
    }
}

impl ConvertOptions {
    /// Checks the numeric options.
    pub fn validate(&self) -> Result<GlobalConfig, ConfigError> {
        GlobalConfig::new(self.weld_epsilon, self.segments)
    }

    /// Shading used by face sets without their own `creaseAngle`.
    pub fn shading(&self) -> Shading {
        Shading::from_crease_angle(self.crease_angle)
    }

    pub fn with_ccw(mut self, ccw: bool) -> Self {
        self.ccw = ccw;
        self
    }

    pub fn with_crease_angle(mut self, crease_angle: Option<f64>) -> Self {
        self.crease_angle = crease_angle;
        self
    }

    pub fn with_weld_epsilon(mut self, weld_epsilon: f64) -> Self {
        self.weld_epsilon = weld_epsilon;
        self
    }

    pub fn with_emit_uv(mut self, emit_uv: bool) -> Self {
        self.emit_uv = emit_uv;
        self
    }

    pub fn with_segments(mut self, segments: u32) -> Self {
        self.segments = segments;
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CreaseAngleSetting {
    Radians(f64),
    Toggle(bool),
}

fn crease_angle_or_false<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<CreaseAngleSetting>::deserialize(deserializer)? {
        Some(CreaseAngleSetting::Radians(angle)) => Some(angle),
        // `true` carries no angle to smooth with.
        Some(CreaseAngleSetting::Toggle(_)) | None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConvertOptions::default();
        assert!(options.ccw);
        assert!(options.emit_uv);
        assert_eq!(options.crease_angle, None);
        assert_eq!(options.shading(), Shading::Flat);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_empty_json_is_default() {
        let options: ConvertOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ConvertOptions::default());
    }

    #[test]
    fn test_crease_angle_number() {
        let options: ConvertOptions = serde_json::from_str(r#"{"creaseAngle": 1.2}"#).unwrap();
        assert_eq!(options.crease_angle, Some(1.2));
        assert_eq!(options.shading(), Shading::Smooth { crease_angle: 1.2 });
    }

    #[test]
    fn test_crease_angle_null_and_true() {
        let options: ConvertOptions = serde_json::from_str(r#"{"creaseAngle": null}"#).unwrap();
        assert_eq!(options.crease_angle, None);
        let options: ConvertOptions = serde_json::from_str(r#"{"creaseAngle": true}"#).unwrap();
        assert_eq!(options.crease_angle, None);
    }

    #[test]
    fn test_full_json() {
        let options: ConvertOptions = serde_json::from_str(
            r#"{"ccw": false, "weldEpsilon": 0.001, "emitUv": false, "segments": 8}"#,
        )
        .unwrap();
        assert_eq!(
            options,
            ConvertOptions::default()
                .with_ccw(false)
                .with_weld_epsilon(0.001)
                .with_emit_uv(false)
                .with_segments(8)
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert_eq!(
            ConvertOptions::default().with_weld_epsilon(0.0).validate(),
            Err(ConfigError::InvalidTolerance(0.0))
        );
        assert_eq!(
            ConvertOptions::default().with_segments(2).validate(),
            Err(ConfigError::InvalidSegments(2))
        );
    }
}
