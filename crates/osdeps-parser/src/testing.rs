//! In-memory parser for tests
//!
//! `StaticParser` answers from a fixed table instead of reading files, so
//! resolver and pipeline tests can describe artifact graphs without
//! compiling real binaries.

use std::collections::HashMap;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use osdeps_core::error::OsdepsError;

use crate::{ArtifactParser, ParserResult};

/// Table-backed parser; unknown paths fail like a missing file
#[derive(Debug, Clone, Default)]
pub struct StaticParser {
    entries: Arc<HashMap<Utf8PathBuf, Result<Vec<String>, String>>>,
}

impl StaticParser {
    /// Create an empty parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the dependencies reported for `path`
    pub fn with_dependencies<I, S>(mut self, path: impl Into<Utf8PathBuf>, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let deps = deps.into_iter().map(Into::into).collect();
        Arc::make_mut(&mut self.entries).insert(path.into(), Ok(deps));
        self
    }

    /// Register a parse failure for `path`
    pub fn with_failure(mut self, path: impl Into<Utf8PathBuf>, reason: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.entries).insert(path.into(), Err(reason.into()));
        self
    }
}

impl ArtifactParser for StaticParser {
    fn parse_dependencies(&self, path: &Utf8Path) -> ParserResult<Vec<String>> {
        match self.entries.get(path) {
            Some(Ok(deps)) => Ok(deps.clone()),
            Some(Err(reason)) => Err(OsdepsError::parse(path.as_str(), reason)),
            None => Err(OsdepsError::parse(path.as_str(), "No such file or directory")),
        }
    }
}
