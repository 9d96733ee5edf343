//! ANSI colors for stderr messages.
//!
//! Colors are off when `NO_COLOR` is set or stderr is not a terminal.

use std::env;
use std::io::{self, IsTerminal};

const RESET: &str = "\x1b[0m";

/// Color support detection and formatting
#[derive(Debug, Clone, Copy)]
pub struct ColorSupport {
    enabled: bool,
}

impl ColorSupport {
    /// Detect color support for stderr
    pub fn detect() -> Self {
        let enabled = env::var_os("NO_COLOR").is_none() && io::stderr().is_terminal();
        Self { enabled }
    }

    /// Never emit escape codes
    #[cfg(test)]
    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    pub fn green(&self, text: &str) -> String {
        self.paint("32", text)
    }

    pub fn yellow(&self, text: &str) -> String {
        self.paint("33", text)
    }

    pub fn red(&self, text: &str) -> String {
        self.paint("31", text)
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }

    pub fn bold(&self, text: &str) -> String {
        self.paint("1", text)
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{}m{}{}", code, text, RESET)
        } else {
            text.to_string()
        }
    }
}
