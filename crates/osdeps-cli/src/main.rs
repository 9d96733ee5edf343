//! # osdeps
//!
//! Lists the OS-level shared libraries required by the compiled extensions
//! of an environment, minus the libraries every base image already ships.
//!
//! This is the entry point of the CLI. It parses arguments, sets up logging
//! and the panic hook, and dispatches to the command handlers. Only command
//! results are written to stdout; logs, summaries and errors go to stderr.

use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::CommandContext;
use output::errors::ErrorFormatter;

/// Find the OS libraries an environment's native extensions link against
#[derive(Parser)]
#[command(name = "osdeps", version, about = "Identify OS-level shared library dependencies")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan an environment and print its OS-level dependencies
    Scan(ScanArgs),
    /// List the compiled artifacts found in an environment
    Artifacts(ArtifactsArgs),
    /// Show the effective ignore list for a target OS
    Ignored(IgnoredArgs),
    /// Show version information
    Version,
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Root directory of the environment
    #[arg(long, value_name = "PATH")]
    pub env_path: Utf8PathBuf,

    /// Environment layout
    #[arg(long, default_value = "python-venv")]
    pub env_type: String,

    /// Target OS the artifacts were built for (linux, darwin)
    #[arg(long, default_value = "linux")]
    pub os: String,

    /// Output format (list, json)
    #[arg(long, default_value = "list")]
    pub output_format: String,

    /// Worker threads; zero or negative uses every CPU
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub workers: i64,

    /// Also print the dependencies before ignore filtering
    #[arg(long)]
    pub debug: bool,

    /// Do not filter out base OS libraries
    #[arg(long)]
    pub no_filter: bool,

    /// Explicit osdeps.toml to use
    #[arg(long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ArtifactsArgs {
    /// Root directory of the environment
    #[arg(long, value_name = "PATH")]
    pub env_path: Utf8PathBuf,

    /// Environment layout
    #[arg(long, default_value = "python-venv")]
    pub env_type: String,

    /// Target OS the artifacts were built for (linux, darwin)
    #[arg(long, default_value = "linux")]
    pub os: String,

    /// Output format (list, json)
    #[arg(long, default_value = "list")]
    pub output_format: String,
}

#[derive(Args, Debug, Clone)]
pub struct IgnoredArgs {
    /// Target OS (linux, darwin)
    #[arg(long, default_value = "linux")]
    pub os: String,

    /// Explicit osdeps.toml to use
    #[arg(long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Show the list as it is with --no-filter
    #[arg(long)]
    pub no_filter: bool,

    /// Output format (list, json)
    #[arg(long, default_value = "list")]
    pub output_format: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let debug = matches!(&cli.command, Commands::Scan(args) if args.debug);
    setup_logging(cli.verbose || debug);
    setup_panic_handler();

    info!("Starting osdeps v{}", env!("CARGO_PKG_VERSION"));

    let result =
        CommandContext::new().and_then(|ctx| commands::dispatch_command(cli.command, &ctx));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprint!("{}", ErrorFormatter::new().format_error(&e));
            ExitCode::FAILURE
        },
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let directives = [
        "osdeps",
        "osdeps_core",
        "osdeps_config",
        "osdeps_parser",
        "osdeps_scanner",
        "osdeps_resolver",
    ]
    .iter()
    .map(|target| format!("{}={}", target, level))
    .collect::<Vec<_>>()
    .join(",");

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        error!("osdeps encountered an unexpected error: {}", panic_info);
        eprintln!("osdeps crashed! This is a bug.");
        eprintln!("Please report it together with the command line that triggered it.");
        eprintln!("Error: {}", panic_info);
    }));
}
