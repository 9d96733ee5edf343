//! `osdeps ignored` command implementation.
//!
//! Prints the ignore list a scan would use after every configuration layer
//! has been applied.

use osdeps_core::error::OsdepsResult;
use osdeps_core::types::TargetOs;

use super::CommandContext;
use crate::output::format::format_dependencies;
use crate::output::OutputFormat;
use crate::IgnoredArgs;

/// Execute the `osdeps ignored` command
pub fn execute(args: IgnoredArgs, ctx: &CommandContext) -> OsdepsResult<()> {
    let format: OutputFormat = args.output_format.parse()?;
    let entries = effective_list(&args, ctx)?;

    if entries.is_empty() && format == OutputFormat::List {
        ctx.output.info("(Nothing is ignored)");
    } else {
        ctx.output.result(&format_dependencies(&entries, format)?);
    }
    Ok(())
}

/// Sorted entries of the layered ignore list for the requested OS
pub fn effective_list(args: &IgnoredArgs, ctx: &CommandContext) -> OsdepsResult<Vec<String>> {
    let os: TargetOs = args.os.parse()?;
    let config = ctx.load_config(args.config.as_deref(), os, args.no_filter)?;

    Ok(config
        .ignore_lists
        .for_os(os.as_str())
        .map(|set| set.iter().cloned().collect())
        .unwrap_or_default())
}
