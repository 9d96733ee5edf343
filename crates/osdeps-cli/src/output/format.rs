//! Rendering of command results as plain lists or JSON.

use std::fmt;
use std::str::FromStr;

use osdeps_core::error::{OsdepsError, OsdepsResult};
use osdeps_core::types::Artifact;

/// Output formats accepted by `--output-format`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One entry per line
    List,
    /// Pretty-printed JSON array
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::List => "list",
            OutputFormat::Json => "json",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = OsdepsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "list" => Ok(OutputFormat::List),
            "json" => Ok(OutputFormat::Json),
            _ => Err(OsdepsError::UnsupportedFormat {
                format: s.to_string(),
            }),
        }
    }
}

/// Render a dependency list
///
/// An empty list renders as `""` in list mode and `[]` in JSON mode.
pub fn format_dependencies(dependencies: &[String], format: OutputFormat) -> OsdepsResult<String> {
    match format {
        OutputFormat::List => Ok(dependencies.join("\n")),
        OutputFormat::Json => to_json(dependencies),
    }
}

/// Render artifact descriptors; list mode shows only their paths
pub fn format_artifacts(artifacts: &[Artifact], format: OutputFormat) -> OsdepsResult<String> {
    match format {
        OutputFormat::List => Ok(artifacts
            .iter()
            .map(|artifact| artifact.path.as_str())
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => to_json(artifacts),
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> OsdepsResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| OsdepsError::Serialization {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use osdeps_core::types::{ArtifactKind, TargetOs};

    fn deps(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("list".parse::<OutputFormat>().unwrap(), OutputFormat::List);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!(matches!(
            "yaml".parse::<OutputFormat>(),
            Err(OsdepsError::UnsupportedFormat { format }) if format == "yaml"
        ));
    }

    #[test]
    fn test_list_format() {
        let rendered =
            format_dependencies(&deps(&["libfoo.so", "libz.so.1"]), OutputFormat::List).unwrap();
        assert_eq!(rendered, "libfoo.so\nlibz.so.1");
    }

    #[test]
    fn test_json_format() {
        let rendered = format_dependencies(&deps(&["libfoo.so"]), OutputFormat::Json).unwrap();
        assert_eq!(rendered, "[\n  \"libfoo.so\"\n]");
    }

    #[test]
    fn test_empty_results() {
        assert_eq!(format_dependencies(&[], OutputFormat::List).unwrap(), "");
        assert_eq!(format_dependencies(&[], OutputFormat::Json).unwrap(), "[]");
    }

    #[test]
    fn test_artifact_json_uses_kind_tag() {
        let artifacts = vec![Artifact::new(
            Utf8PathBuf::from("/env/lib/python3.11/site-packages/ext.so"),
            ArtifactKind::PythonExtension,
            TargetOs::Linux,
            "x86_64".to_string(),
        )];

        let listed = format_artifacts(&artifacts, OutputFormat::List).unwrap();
        assert_eq!(listed, "/env/lib/python3.11/site-packages/ext.so");

        let json = format_artifacts(&artifacts, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["kind"], "python-ext-so");
        assert_eq!(value[0]["os"], "linux");
    }
}
