//! Command implementations and dispatch logic.
//!
//! Each command is a plain function taking its parsed arguments and the
//! shared `CommandContext`.

use camino::{Utf8Path, Utf8PathBuf};
use osdeps_config::{ConfigLoader, ScanConfig};
use osdeps_core::error::{OsdepsError, OsdepsResult};
use osdeps_core::types::TargetOs;
use tracing::info;

pub mod artifacts;
pub mod ignored;
pub mod scan;

#[cfg(test)]
mod tests;

use crate::{output::OutputHandler, Commands};

/// Shared context for all commands
pub struct CommandContext {
    pub cwd: Utf8PathBuf,
    pub output: OutputHandler,
}

impl CommandContext {
    /// Create a context rooted at the process working directory
    pub fn new() -> OsdepsResult<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| OsdepsError::io("Failed to get current directory".to_string(), e))?;
        let cwd = Utf8PathBuf::from_path_buf(cwd).map_err(|path| OsdepsError::ConfigValidation {
            field: "cwd".to_string(),
            reason: format!("Current directory {} is not valid UTF-8", path.display()),
        })?;

        Ok(Self {
            cwd,
            output: OutputHandler::new(),
        })
    }

    /// Resolve a user-supplied path against the working directory
    pub fn resolve_path(&self, path: &Utf8Path) -> Utf8PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }

    /// Build the layered configuration for a target OS
    pub fn load_config(
        &self,
        explicit: Option<&Utf8Path>,
        os: TargetOs,
        no_filter: bool,
    ) -> OsdepsResult<ScanConfig> {
        let explicit = explicit.map(|path| self.resolve_path(path));
        ConfigLoader::new(self.cwd.clone()).load(explicit.as_deref(), os.as_str(), no_filter)
    }
}

/// Dispatch a command to its handler
pub fn dispatch_command(command: Commands, ctx: &CommandContext) -> OsdepsResult<()> {
    match command {
        Commands::Scan(args) => {
            info!("Scanning environment: {}", args.env_path);
            scan::execute(args, ctx)
        },
        Commands::Artifacts(args) => {
            info!("Listing artifacts of: {}", args.env_path);
            artifacts::execute(args, ctx)
        },
        Commands::Ignored(args) => {
            info!("Showing ignore list for: {}", args.os);
            ignored::execute(args, ctx)
        },
        Commands::Version => show_version(ctx),
    }
}

fn show_version(ctx: &CommandContext) -> OsdepsResult<()> {
    let target = format!("{}-{}", std::env::consts::ARCH, std::env::consts::OS);

    ctx.output
        .result(&format!("osdeps v{}", env!("CARGO_PKG_VERSION")));
    ctx.output.result(&format!("Built: {}", env!("BUILD_DATE")));
    ctx.output.result(&format!("Target: {}", target));
    ctx.output.result(&format!("Rust: {}", env!("RUSTC_VERSION")));

    Ok(())
}
