//! `osdeps artifacts` command implementation.

use std::collections::BTreeMap;

use osdeps_core::error::OsdepsResult;
use osdeps_core::types::{Artifact, TargetOs};
use osdeps_scanner::{scanner_for, EnvironmentKind, Scanner};

use super::CommandContext;
use crate::output::format::format_artifacts;
use crate::output::OutputFormat;
use crate::ArtifactsArgs;

/// Execute the `osdeps artifacts` command
pub fn execute(args: ArtifactsArgs, ctx: &CommandContext) -> OsdepsResult<()> {
    let format: OutputFormat = args.output_format.parse()?;
    let artifacts = collect(&args, ctx)?;

    ctx.output.result(&format_artifacts(&artifacts, format)?);
    ctx.output.success(&summary(&artifacts));
    Ok(())
}

/// One-line count of the artifacts, broken down by kind
pub fn summary(artifacts: &[Artifact]) -> String {
    let mut by_kind: BTreeMap<&str, usize> = BTreeMap::new();
    for artifact in artifacts {
        *by_kind.entry(artifact.kind.as_str()).or_default() += 1;
    }

    if by_kind.is_empty() {
        return "0 artifacts found".to_string();
    }
    let kinds: Vec<String> = by_kind
        .iter()
        .map(|(kind, count)| format!("{}: {}", kind, count))
        .collect();
    format!("{} artifacts found ({})", artifacts.len(), kinds.join(", "))
}

/// Run the scanner for the requested environment
pub fn collect(args: &ArtifactsArgs, ctx: &CommandContext) -> OsdepsResult<Vec<Artifact>> {
    let os: TargetOs = args.os.parse()?;
    let env_kind: EnvironmentKind = args.env_type.parse()?;
    scanner_for(env_kind, os).scan(&ctx.resolve_path(&args.env_path))
}
