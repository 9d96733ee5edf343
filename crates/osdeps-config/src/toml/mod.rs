//! osdeps.toml parsing and validation

use std::collections::BTreeMap;

use camino::Utf8Path;
use osdeps_core::error::OsdepsError;
use serde::{Deserialize, Serialize};

use crate::ConfigResult;

/// Contents of an osdeps.toml file
///
/// ```toml
/// replace-defaults = false
///
/// [ignore-lists]
/// linux = ["libz.so.1"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OsdepsToml {
    /// Replace the lists of lower layers instead of extending them
    #[serde(default, rename = "replace-defaults")]
    pub replace_defaults: bool,

    /// Additional libraries to ignore, keyed by OS tag
    #[serde(default, rename = "ignore-lists")]
    pub ignore_lists: BTreeMap<String, Vec<String>>,
}

/// Parse osdeps.toml content
pub fn parse_osdeps_toml(content: &str) -> ConfigResult<OsdepsToml> {
    // First pass with toml_edit for precise error locations
    content
        .parse::<toml_edit::DocumentMut>()
        .map_err(|e| {
            let (line, column) = e
                .span()
                .map(|span| line_column(content, span.start))
                .unwrap_or((0, 0));
            OsdepsError::TomlParse {
                message: e.message().to_string(),
                line,
                column,
            }
        })?;

    // Then parse with serde for type safety
    let config: OsdepsToml = toml::from_str(content).map_err(|e| {
        let (line, column) = e
            .span()
            .map(|span| line_column(content, span.start))
            .unwrap_or((0, 0));
        OsdepsError::TomlParse {
            message: e.message().to_string(),
            line,
            column,
        }
    })?;

    validate_config(&config)?;

    Ok(config)
}

/// Load and parse osdeps.toml from a file path
pub fn load_from_file(path: &Utf8Path) -> ConfigResult<OsdepsToml> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| OsdepsError::io(format!("Failed to read {}", path), e))?;

    parse_osdeps_toml(&content).map_err(|e| match e {
        OsdepsError::TomlParse {
            message,
            line,
            column,
        } => OsdepsError::TomlParse {
            message: format!("{} (in {})", message, path),
            line,
            column,
        },
        other => other,
    })
}

/// Validate configuration contents
pub fn validate_config(config: &OsdepsToml) -> ConfigResult<()> {
    for (os, entries) in &config.ignore_lists {
        if !is_valid_os_tag(os) {
            return Err(OsdepsError::ConfigValidation {
                field: format!("ignore-lists.{}", os),
                reason: "OS tags must be non-empty lowercase ASCII".to_string(),
            });
        }

        if let Some(position) = entries.iter().position(|entry| entry.trim().is_empty()) {
            return Err(OsdepsError::ConfigValidation {
                field: format!("ignore-lists.{}[{}]", os, position),
                reason: "library names must not be empty".to_string(),
            });
        }
    }

    Ok(())
}

fn is_valid_os_tag(tag: &str) -> bool {
    !tag.is_empty()
        && tag
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

/// 1-based line and column for a byte offset
fn line_column(content: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(content.len());
    let before = content.get(..offset).unwrap_or(content);
    let line = before.matches('\n').count() + 1;
    let column = before
        .rfind('\n')
        .map(|newline| before.len() - newline)
        .unwrap_or(before.len() + 1);
    (line, column)
}
