//! # Configuration Constants
//!
//! Centralized constants for the VRML geometry pipeline. Tolerances,
//! tessellation parameters, material defaults and recursion limits are
//! defined here so the pipeline crates never scatter literals.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison and welding tolerances
//! - **Tessellation**: Segment counts for parametric primitives
//! - **Limits**: Stack and size bounds
//! - **Materials**: Default colors and alpha

use std::fmt;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Default grid size used by the vertex welder.
///
/// Positions, normals and texture coordinates are rounded to multiples of
/// this value before being compared, so two vertex instances closer than
/// this collapse into one compact vertex.
///
/// # Example
///
/// ```rust
/// use config::constants::{DEFAULT_WELD_EPSILON, EPSILON};
///
/// assert!(DEFAULT_WELD_EPSILON > EPSILON);
/// let key = (0.1234567_f64 / DEFAULT_WELD_EPSILON).round() as i64;
/// assert_eq!(key, 123457);
/// ```
pub const DEFAULT_WELD_EPSILON: f64 = 1e-6;

/// Squared length below which a face normal is treated as degenerate.
///
/// Faces whose cross product is shorter than this have (numerically) zero
/// area and receive the fallback normal instead of a computed one.
pub const DEGENERATE_NORMAL_EPSILON: f64 = 1e-24;

// =============================================================================
// TESSELLATION CONSTANTS
// =============================================================================

/// Default tessellation segment count for cylinders, cones and spheres.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_SEGMENTS;
/// assert!(DEFAULT_SEGMENTS >= 12);
/// ```
pub const DEFAULT_SEGMENTS: u32 = 32;

/// Minimum segment count accepted for round primitives.
///
/// Three segments is the smallest closed polygon.
pub const MIN_SEGMENTS: u32 = 3;

/// Maximum segment count accepted for round primitives.
///
/// Safety limit to prevent excessive tessellation.
///
/// # Example
///
/// ```rust
/// use config::constants::{MAX_SEGMENTS, MIN_SEGMENTS};
///
/// let requested = 100_000;
/// let segments = requested.clamp(MIN_SEGMENTS, MAX_SEGMENTS);
/// assert_eq!(segments, MAX_SEGMENTS);
/// ```
pub const MAX_SEGMENTS: u32 = 1000;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Bytes of stack space reserved when growing the stack for deep scene trees
/// using the `stacker` crate.
///
/// # Examples
/// ```
/// use config::constants::STACKER_STACK_SIZE_BYTES;
/// assert!(STACKER_STACK_SIZE_BYTES >= 1024);
/// ```
pub const STACKER_STACK_SIZE_BYTES: usize = 8 * 1024 * 1024;

/// Remaining stack below which the walker asks `stacker` for a new segment.
pub const STACKER_RED_ZONE_BYTES: usize = STACKER_STACK_SIZE_BYTES / 8;

/// Maximum number of vertex instances a single shape may produce.
///
/// Safety limit to prevent memory exhaustion from hostile documents.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_VERTICES;
///
/// let vertex_count = 1000;
/// assert!(vertex_count < MAX_VERTICES);
/// ```
pub const MAX_VERTICES: usize = 10_000_000;

// =============================================================================
// MATERIAL CONSTANTS
// =============================================================================

/// Diffuse color of a `Material` node that does not set `diffuseColor`.
pub const DEFAULT_DIFFUSE_COLOR: [f32; 3] = [0.8, 0.8, 0.8];

/// Diffuse color given to shapes that carry no appearance at all.
pub const FALLBACK_DIFFUSE_COLOR: [f32; 3] = [0.6, 0.6, 0.6];

/// Emissive color of a `Material` node that does not set `emissiveColor`.
pub const DEFAULT_EMISSIVE_COLOR: [f32; 3] = [0.0, 0.0, 0.0];

/// Alpha of a fully opaque material.
pub const DEFAULT_ALPHA: f32 = 1.0;

// =============================================================================
// GLOBAL CONFIG
// =============================================================================

/// Immutable snapshot of the numeric settings shared between crates.
///
/// # Examples
/// ```
/// use config::constants::GlobalConfig;
/// let config = GlobalConfig::default();
/// assert!(config.weld_epsilon > 0.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalConfig {
    /// Welding grid size.
    pub weld_epsilon: f64,
    /// Segment count for round primitives.
    pub segments: u32,
}

impl GlobalConfig {
    /// Builds a configuration, rejecting a non-positive or non-finite
    /// welding epsilon and segment counts outside
    /// `MIN_SEGMENTS..=MAX_SEGMENTS`.
    ///
    /// # Examples
    /// ```
    /// use config::constants::GlobalConfig;
    /// let cfg = GlobalConfig::new(1.0e-5, 24).expect("valid config");
    /// assert_eq!(cfg.segments, 24);
    /// ```
    pub fn new(weld_epsilon: f64, segments: u32) -> Result<Self, ConfigError> {
        if !weld_epsilon.is_finite() || weld_epsilon <= 0.0 {
            return Err(ConfigError::InvalidTolerance(weld_epsilon));
        }
        if !(MIN_SEGMENTS..=MAX_SEGMENTS).contains(&segments) {
            return Err(ConfigError::InvalidSegments(segments));
        }
        Ok(Self {
            weld_epsilon,
            segments,
        })
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            weld_epsilon: DEFAULT_WELD_EPSILON,
            segments: DEFAULT_SEGMENTS,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Raised when the welding tolerance is zero, negative or not finite.
    InvalidTolerance(f64),
    /// Raised when the segment count is outside the accepted range.
    InvalidSegments(u32),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidTolerance(value) => {
                write!(f, "weld epsilon must be positive and finite: {value}")
            }
            ConfigError::InvalidSegments(value) => {
                write!(
                    f,
                    "segments must be within {MIN_SEGMENTS}..={MAX_SEGMENTS}: {value}"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Checks if two f64 values are approximately equal within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_equal;
///
/// assert!(approx_equal(1.0, 1.0 + 1e-11));
/// assert!(!approx_equal(1.0, 1.1));
/// ```
#[inline]
pub fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Checks if a f64 value is approximately zero within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_zero;
///
/// assert!(approx_zero(1e-11));
/// assert!(!approx_zero(0.1));
/// ```
#[inline]
pub fn approx_zero(value: f64) -> bool {
    value.abs() < EPSILON
}
