//! Configuration for osdeps
//!
//! This crate holds the per-OS ignore lists (libraries considered part of the
//! base system image) and the layering that builds the effective
//! configuration from built-in defaults, osdeps.toml files, environment
//! overrides and command-line flags.

pub mod ignore;
pub mod merge;
pub mod toml;

// Re-export main types
pub use ignore::IgnoreList;
pub use merge::{ConfigLayering, ConfigLoader, ConfigSource};
pub use toml::OsdepsToml;

use osdeps_core::error::OsdepsError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, OsdepsError>;

/// Immutable configuration for one scan
///
/// Built once at startup and passed by reference into every component.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScanConfig {
    /// Libraries to drop from the final set, keyed by OS tag
    pub ignore_lists: IgnoreList,
}

impl ScanConfig {
    /// Configuration with the built-in ignore lists
    pub fn with_defaults() -> Self {
        Self {
            ignore_lists: IgnoreList::defaults(),
        }
    }
}
