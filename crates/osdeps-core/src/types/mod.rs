//! Core data types for osdeps.
//!
//! This module provides the fundamental types used throughout the workspace:
//! - Target operating system tags
//! - Artifact descriptors for compiled binaries

pub mod artifact;
pub mod target;

// Re-export all public types
pub use artifact::{Artifact, ArtifactKind};
pub use target::TargetOs;
