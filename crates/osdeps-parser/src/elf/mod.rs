//! ELF dependency extraction (DT_NEEDED entries)

use camino::Utf8Path;
use goblin::elf::Elf;
use osdeps_core::error::OsdepsError;
use tracing::debug;

use crate::{read_artifact, ArtifactParser, ParserResult};

/// Parser for ELF shared objects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElfParser;

impl ElfParser {
    /// Create a new ELF parser
    pub fn new() -> Self {
        Self
    }
}

impl ArtifactParser for ElfParser {
    fn parse_dependencies(&self, path: &Utf8Path) -> ParserResult<Vec<String>> {
        let bytes = read_artifact(path)?;
        let elf = Elf::parse(&bytes).map_err(|e| OsdepsError::parse(path.as_str(), e))?;

        // Statically linked objects have nothing to provision
        if elf.dynamic.is_none() {
            debug!("No dynamic section in {}", path);
            return Ok(Vec::new());
        }

        Ok(elf.libraries.iter().map(|lib| lib.to_string()).collect())
    }
}
