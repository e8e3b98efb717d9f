//! # Config Crate
//!
//! Centralized configuration constants for the VRML geometry pipeline.
//! Every tolerance, tessellation default and material default lives here so
//! the node and mesh crates stay consistent.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{DEFAULT_SEGMENTS, DEFAULT_WELD_EPSILON, GlobalConfig};
//!
//! let cfg = GlobalConfig::default();
//! assert_eq!(cfg.segments, DEFAULT_SEGMENTS);
//! assert_eq!(cfg.weld_epsilon, DEFAULT_WELD_EPSILON);
//! ```

pub mod constants;

#[cfg(test)]
mod tests;
