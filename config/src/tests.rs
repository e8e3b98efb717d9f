//! # Tests for Config Constants
//!
//! Unit tests verifying the configuration constants and the validated
//! `GlobalConfig` builder.

use crate::constants::*;

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_epsilon_is_positive() {
    assert!(EPSILON > 0.0, "EPSILON must be positive");
}

#[test]
fn test_weld_epsilon_larger_than_epsilon() {
    assert!(
        DEFAULT_WELD_EPSILON >= EPSILON,
        "DEFAULT_WELD_EPSILON should be >= EPSILON"
    );
}

#[test]
fn test_weld_epsilon_is_small() {
    assert!(DEFAULT_WELD_EPSILON < 1e-3);
}

// =============================================================================
// TESSELLATION TESTS
// =============================================================================

#[test]
fn test_segment_bounds_ordered() {
    assert!(MIN_SEGMENTS >= 3);
    assert!(MIN_SEGMENTS <= DEFAULT_SEGMENTS);
    assert!(DEFAULT_SEGMENTS <= MAX_SEGMENTS);
}

// =============================================================================
// MATERIAL TESTS
// =============================================================================

#[test]
fn test_material_defaults_in_unit_range() {
    for c in DEFAULT_DIFFUSE_COLOR
        .iter()
        .chain(FALLBACK_DIFFUSE_COLOR.iter())
        .chain(DEFAULT_EMISSIVE_COLOR.iter())
    {
        assert!((0.0..=1.0).contains(c));
    }
    assert_eq!(DEFAULT_ALPHA, 1.0);
}

// =============================================================================
// GLOBAL CONFIG TESTS
// =============================================================================

#[test]
fn test_default_config_is_valid() {
    let cfg = GlobalConfig::default();
    assert_eq!(
        GlobalConfig::new(cfg.weld_epsilon, cfg.segments),
        Ok(cfg)
    );
}

#[test]
fn test_config_rejects_bad_tolerance() {
    assert_eq!(
        GlobalConfig::new(0.0, 24).unwrap_err(),
        ConfigError::InvalidTolerance(0.0)
    );
    assert!(GlobalConfig::new(f64::NAN, 24).is_err());
    assert!(GlobalConfig::new(f64::INFINITY, 24).is_err());
}

#[test]
fn test_config_rejects_bad_segments() {
    assert_eq!(
        GlobalConfig::new(1.0e-6, 2).unwrap_err(),
        ConfigError::InvalidSegments(2)
    );
    assert!(GlobalConfig::new(1.0e-6, MAX_SEGMENTS + 1).is_err());
}

#[test]
fn test_config_error_display() {
    let message = ConfigError::InvalidSegments(1).to_string();
    assert!(message.contains("segments"));
}

// =============================================================================
// APPROX TESTS
// =============================================================================

#[test]
fn test_approx_equal_same_values() {
    assert!(approx_equal(1.0, 1.0));
    assert!(approx_equal(0.5, 0.5 + EPSILON / 2.0));
}

#[test]
fn test_approx_zero() {
    assert!(approx_zero(0.0));
    assert!(!approx_zero(1e-3));
}
