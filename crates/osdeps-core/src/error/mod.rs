//! Error types and result aliases for osdeps operations.
//!
//! Provides a unified error type that covers all error conditions across the
//! pipeline, from environment scanning to output formatting.

use thiserror::Error;

/// Unified error type for all osdeps operations
#[derive(Error, Debug)]
pub enum OsdepsError {
    // Scan errors
    #[error("Failed to scan environment '{root}': {reason}")]
    Scan { root: String, reason: String },

    #[error("Unsupported environment type '{kind}'")]
    UnsupportedEnvironment { kind: String },

    #[error("Unsupported target OS '{os}'")]
    UnsupportedOs { os: String },

    // Parse errors
    #[error("Failed to parse dependencies of {path}: {reason}")]
    Parse { path: String, reason: String },

    // Config errors
    #[error("Failed to parse osdeps.toml: {message} at line {line}, column {column}")]
    TomlParse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // Output errors
    #[error("Unsupported output format '{format}'")]
    UnsupportedFormat { format: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for osdeps operations
pub type OsdepsResult<T> = Result<T, OsdepsError>;

impl OsdepsError {
    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Create a parse error for an artifact path
    pub fn parse(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a fatal scan error for an environment root
    pub fn scan(root: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Scan {
            root: root.into(),
            reason: reason.to_string(),
        }
    }

    /// Check if this error is recoverable
    ///
    /// Recoverable errors are absorbed by the pipeline (the artifact is
    /// skipped); everything else terminates the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, OsdepsError::Parse { .. } | OsdepsError::Io { .. })
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            OsdepsError::Scan { .. } => {
                Some("Check that --env-path points at a virtual environment with site-packages")
            },
            OsdepsError::UnsupportedEnvironment { .. } => {
                Some("Supported environment types: python-venv")
            },
            OsdepsError::UnsupportedOs { .. } => Some("Supported target OS values: linux, darwin"),
            OsdepsError::UnsupportedFormat { .. } => Some("Supported output formats: list, json"),
            OsdepsError::TomlParse { .. } => {
                Some("Fix the syntax error in osdeps.toml and try again")
            },
            OsdepsError::ConfigValidation { .. } => {
                Some("Ignore lists use lowercase OS keys and must not contain empty entries")
            },
            _ => None,
        }
    }
}
