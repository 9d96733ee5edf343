//! Dependency extraction for compiled artifacts
//!
//! A parser turns an artifact path into the ordered list of shared-library
//! references recorded in its dynamic-linking metadata. Binaries without a
//! dynamic section report zero dependencies rather than an error.
//!
//! The concrete parser is picked once per target OS by [`parser_for`]; every
//! caller works against the [`ArtifactParser`] trait.

pub mod elf;
pub mod macho;
#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export main types
pub use elf::ElfParser;
pub use macho::MachOParser;

use camino::Utf8Path;
use osdeps_core::error::OsdepsError;
use osdeps_core::types::TargetOs;

/// Result type for parser operations
pub type ParserResult<T> = Result<T, OsdepsError>;

/// Capability to extract raw dependency references from an artifact
pub trait ArtifactParser {
    /// Ordered dependency references of the artifact at `path`
    ///
    /// Fails with [`OsdepsError::Parse`] when the file cannot be read or is
    /// not in the expected format.
    fn parse_dependencies(&self, path: &Utf8Path) -> ParserResult<Vec<String>>;
}

/// Parser variants, one per supported binary format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserKind {
    Elf(ElfParser),
    MachO(MachOParser),
}

/// Select the parser for a target OS
pub fn parser_for(os: TargetOs) -> ParserKind {
    match os {
        TargetOs::Linux => ParserKind::Elf(ElfParser::new()),
        TargetOs::Darwin => ParserKind::MachO(MachOParser::new()),
    }
}

impl ParserKind {
    /// Human readable format name
    pub fn format_name(&self) -> &'static str {
        match self {
            ParserKind::Elf(_) => "ELF",
            ParserKind::MachO(_) => "Mach-O",
        }
    }
}

impl ArtifactParser for ParserKind {
    fn parse_dependencies(&self, path: &Utf8Path) -> ParserResult<Vec<String>> {
        match self {
            ParserKind::Elf(parser) => parser.parse_dependencies(path),
            ParserKind::MachO(parser) => parser.parse_dependencies(path),
        }
    }
}

/// Read an artifact into memory, mapping IO failures to parse errors
pub(crate) fn read_artifact(path: &Utf8Path) -> ParserResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| OsdepsError::parse(path.as_str(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parser_for_target() {
        assert_eq!(parser_for(TargetOs::Linux).format_name(), "ELF");
        assert_eq!(parser_for(TargetOs::Darwin).format_name(), "Mach-O");
    }

    #[test]
    fn test_missing_file_is_parse_error() {
        let parser = parser_for(TargetOs::Linux);
        let result = parser.parse_dependencies(Utf8Path::new("/nonexistent/osdeps/libmissing.so"));

        match result {
            Err(OsdepsError::Parse { path, .. }) => {
                assert_eq!(path, "/nonexistent/osdeps/libmissing.so")
            },
            other => panic!("expected Parse error, got {:?}", other),
        }
    }
}
