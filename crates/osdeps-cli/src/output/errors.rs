//! Error rendering for the CLI.

use std::error::Error;

use osdeps_core::error::OsdepsError;

use super::colors::ColorSupport;

/// Renders errors with their suggestion and cause chain
pub struct ErrorFormatter {
    colors: ColorSupport,
}

impl ErrorFormatter {
    /// Create a formatter with detected color support
    pub fn new() -> Self {
        Self {
            colors: ColorSupport::detect(),
        }
    }

    /// Create a formatter with explicit color support
    #[cfg(test)]
    pub fn with_colors(colors: ColorSupport) -> Self {
        Self { colors }
    }

    /// Format an error with context and suggestions
    pub fn format_error(&self, error: &OsdepsError) -> String {
        let mut output = format!("{}: {}\n", self.colors.red("error"), error);

        if let Some(suggestion) = error.suggestion() {
            output.push_str(&format!("{}: {}\n", self.colors.dim("help"), suggestion));
        }

        let mut source = error.source();
        while let Some(err) = source {
            output.push_str(&format!("{}: {}\n", self.colors.dim("caused by"), err));
            source = err.source();
        }

        output
    }
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        Self::new()
    }
}
