//! # osdeps-core
//!
//! Core types and errors shared across all osdeps crates.
//!
//! This crate provides:
//! - `Artifact` descriptors produced by environment scanners
//! - `TargetOs` and `ArtifactKind` tags
//! - `OsdepsError` for unified error handling
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (Artifact, TargetOs, etc.)
//! - `error`: Error types and result aliases

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{OsdepsError, OsdepsResult};
pub use types::{Artifact, ArtifactKind, TargetOs};
