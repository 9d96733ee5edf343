//! `osdeps scan` command implementation.
//!
//! Scans the environment, resolves the dependencies of every artifact on the
//! worker pool and prints the filtered, sorted result.

use osdeps_core::error::OsdepsResult;
use osdeps_core::types::TargetOs;
use osdeps_parser::parser_for;
use osdeps_resolver::{analyze, AnalysisReport};
use osdeps_scanner::{scanner_for, EnvironmentKind, Scanner};
use tracing::{debug, warn};

use super::CommandContext;
use crate::output::format::format_dependencies;
use crate::output::OutputFormat;
use crate::ScanArgs;

/// Printed on stderr when a list-mode scan finds nothing
pub const NONE_IDENTIFIED: &str = "(None identified)";

/// Execute the `osdeps scan` command
pub fn execute(args: ScanArgs, ctx: &CommandContext) -> OsdepsResult<()> {
    let format: OutputFormat = args.output_format.parse()?;
    let report = run(&args, ctx)?;

    // Kept off stdout so the filtered result stays machine-readable
    if args.debug {
        ctx.output.heading("Dependencies before filtering:");
        ctx.output.info(&debug_listing(&report, format)?);
    }

    let rendered = format_dependencies(report.dependencies.as_slice(), format)?;
    if report.dependencies.is_empty() && format == OutputFormat::List {
        ctx.output.info(NONE_IDENTIFIED);
    } else {
        ctx.output.result(&rendered);
    }

    print_summary(&report, ctx);
    Ok(())
}

/// Scan and analyze without printing anything
///
/// Every argument is validated before the environment is touched.
pub fn run(args: &ScanArgs, ctx: &CommandContext) -> OsdepsResult<AnalysisReport> {
    let os: TargetOs = args.os.parse()?;
    let env_kind: EnvironmentKind = args.env_type.parse()?;
    let config = ctx.load_config(args.config.as_deref(), os, args.no_filter)?;

    let root = ctx.resolve_path(&args.env_path);
    let artifacts = scanner_for(env_kind, os).scan(&root)?;
    if artifacts.is_empty() {
        warn!("No {} artifacts found under {}", os, root);
    }

    let parser = parser_for(os);
    debug!("Using {} parser", parser.format_name());
    Ok(analyze(artifacts, &config, os, args.workers, move || parser))
}

/// Resolved dependencies before the ignore list, in the requested format
pub fn debug_listing(report: &AnalysisReport, format: OutputFormat) -> OsdepsResult<String> {
    format_dependencies(report.unfiltered.as_slice(), format)
}

fn print_summary(report: &AnalysisReport, ctx: &CommandContext) {
    ctx.output.success(&format!(
        "{} artifacts parsed, {} dependencies ({} ignored)",
        report.artifacts_parsed,
        report.dependencies.len(),
        report.ignored
    ));

    if report.artifacts_skipped > 0 {
        ctx.output.warn(&format!(
            "{} artifacts could not be parsed and were skipped (use --verbose for details)",
            report.artifacts_skipped
        ));
    }
    if report.unresolved > 0 {
        ctx.output.warn(&format!(
            "{} symbolic references could not be resolved and are listed as is",
            report.unresolved
        ));
    }
    if report.ambiguous > 0 {
        ctx.output.warn(&format!(
            "{} symbolic references matched more than one library; the first match was used",
            report.ambiguous
        ));
    }
    if !report.filter_applied {
        ctx.output.warn("No ignore list for this OS, output is unfiltered");
    }
}
