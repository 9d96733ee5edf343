//! Artifact discovery for osdeps
//!
//! Scanners walk an environment root and return descriptors for the compiled
//! binaries found inside it. A scanner failing to enumerate the environment
//! at all is fatal; unreadable individual entries are logged and skipped.

pub mod venv;

// Re-export main types
pub use venv::PythonVenvScanner;

use std::fmt;
use std::str::FromStr;

use camino::Utf8Path;
use osdeps_core::error::OsdepsError;
use osdeps_core::types::{Artifact, TargetOs};

/// Result type for scan operations
pub type ScanResult<T> = Result<T, OsdepsError>;

/// Capability to enumerate candidate artifacts under an environment root
pub trait Scanner {
    /// Discover artifacts under `root`
    fn scan(&self, root: &Utf8Path) -> ScanResult<Vec<Artifact>>;
}

/// Supported environment layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentKind {
    /// Python virtual environment (`lib/pythonX.Y/site-packages`)
    PythonVenv,
}

impl EnvironmentKind {
    /// Tag used on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentKind::PythonVenv => "python-venv",
        }
    }
}

impl fmt::Display for EnvironmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnvironmentKind {
    type Err = OsdepsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python-venv" | "venv" => Ok(EnvironmentKind::PythonVenv),
            _ => Err(OsdepsError::UnsupportedEnvironment {
                kind: s.to_string(),
            }),
        }
    }
}

/// Scanner variants, one per environment layout
#[derive(Debug, Clone)]
pub enum ScannerKind {
    PythonVenv(PythonVenvScanner),
}

/// Select the scanner for an environment layout and target OS
pub fn scanner_for(kind: EnvironmentKind, os: TargetOs) -> ScannerKind {
    match kind {
        EnvironmentKind::PythonVenv => ScannerKind::PythonVenv(PythonVenvScanner::new(os)),
    }
}

impl Scanner for ScannerKind {
    fn scan(&self, root: &Utf8Path) -> ScanResult<Vec<Artifact>> {
        match self {
            ScannerKind::PythonVenv(scanner) => scanner.scan(root),
        }
    }
}
