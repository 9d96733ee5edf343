//! Terminal output for the CLI.
//!
//! Command results go to stdout untouched so they can be piped; every other
//! message goes to stderr.

pub mod colors;
pub mod errors;
pub mod format;

pub use format::OutputFormat;

/// Output handler for consistent terminal formatting
pub struct OutputHandler {
    colors: colors::ColorSupport,
}

impl OutputHandler {
    /// Create a new output handler
    pub fn new() -> Self {
        Self {
            colors: colors::ColorSupport::detect(),
        }
    }

    /// Print a command result on stdout
    pub fn result(&self, rendered: &str) {
        if !rendered.is_empty() {
            println!("{}", rendered);
        }
    }

    /// Print an informational message
    pub fn info(&self, message: &str) {
        eprintln!("{}", self.colors.dim(message));
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", self.colors.green("✓"), message);
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", self.colors.yellow("⚠"), message);
    }

    /// Print a section heading
    pub fn heading(&self, title: &str) {
        eprintln!("{}", self.colors.bold(title));
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
