//! Artifact descriptors.
//!
//! An artifact is a compiled binary discovered under an environment root. It
//! is created once by a scanner and never mutated afterwards.

use super::TargetOs;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Compiled binary found within an environment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Artifact {
    /// Absolute path to the artifact
    pub path: Utf8PathBuf,
    /// Kind of artifact
    pub kind: ArtifactKind,
    /// Target OS the artifact was scanned for
    pub os: TargetOs,
    /// Architecture tag (e.g. "x86_64")
    pub arch: String,
}

/// Kind of compiled artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    /// Native extension module inside a Python environment
    #[serde(rename = "python-ext-so")]
    PythonExtension,
}

impl Artifact {
    /// Create a new artifact descriptor
    pub fn new(path: Utf8PathBuf, kind: ArtifactKind, os: TargetOs, arch: String) -> Self {
        Self {
            path,
            kind,
            os,
            arch,
        }
    }

    /// Directory containing the artifact
    pub fn directory(&self) -> &Utf8Path {
        self.path.parent().unwrap_or(&self.path)
    }

    /// File name of the artifact
    pub fn file_name(&self) -> &str {
        self.path.file_name().unwrap_or(self.path.as_str())
    }
}

impl ArtifactKind {
    /// Tag used in structured output
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::PythonExtension => "python-ext-so",
        }
    }
}
