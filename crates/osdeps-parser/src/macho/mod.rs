//! Mach-O dependency extraction (LC_LOAD_DYLIB and friends)

use camino::Utf8Path;
use goblin::mach::{Mach, MachO};
use osdeps_core::error::OsdepsError;
use tracing::debug;

use crate::{read_artifact, ArtifactParser, ParserResult};

/// goblin lists the binary itself as the first library
const SELF_ENTRY: &str = "self";

/// Parser for Mach-O dylibs and bundles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MachOParser;

impl MachOParser {
    /// Create a new Mach-O parser
    pub fn new() -> Self {
        Self
    }
}

impl ArtifactParser for MachOParser {
    fn parse_dependencies(&self, path: &Utf8Path) -> ParserResult<Vec<String>> {
        let bytes = read_artifact(path)?;

        match Mach::parse(&bytes).map_err(|e| OsdepsError::parse(path.as_str(), e))? {
            Mach::Binary(macho) => Ok(dylib_names(&macho)),
            Mach::Fat(multi) => {
                // Every slice of a universal binary links the same dylibs;
                // the first one is representative.
                let arch = multi
                    .iter_arches()
                    .next()
                    .ok_or_else(|| {
                        OsdepsError::parse(path.as_str(), "universal binary has no slices")
                    })?
                    .map_err(|e| OsdepsError::parse(path.as_str(), e))?;
                debug!("Using first slice of universal binary {}", path);

                let macho = MachO::parse(&bytes, arch.offset as usize)
                    .map_err(|e| OsdepsError::parse(path.as_str(), e))?;
                Ok(dylib_names(&macho))
            },
        }
    }
}

fn dylib_names(macho: &MachO<'_>) -> Vec<String> {
    macho
        .libs
        .iter()
        .filter(|&&lib| lib != SELF_ENTRY)
        .map(|lib| lib.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_rejects_non_macho() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"\x7fELF but not really").unwrap();
        let path = Utf8Path::from_path(file.path()).unwrap();

        let result = MachOParser::new().parse_dependencies(path);
        assert!(matches!(result, Err(OsdepsError::Parse { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = MachOParser::new().parse_dependencies(Utf8Path::new("/nonexistent/lib.dylib"));
        assert!(result.is_err());
    }
}
