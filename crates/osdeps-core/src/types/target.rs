//! Target operating system tags.

use crate::error::OsdepsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operating system an environment is being provisioned for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetOs {
    /// ELF shared objects
    Linux,
    /// Mach-O dylibs and bundles
    Darwin,
}

impl TargetOs {
    /// All supported targets
    pub const ALL: [TargetOs; 2] = [TargetOs::Linux, TargetOs::Darwin];

    /// The tag used in configuration files and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetOs::Linux => "linux",
            TargetOs::Darwin => "darwin",
        }
    }
}

impl fmt::Display for TargetOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetOs {
    type Err = OsdepsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linux" => Ok(TargetOs::Linux),
            "darwin" | "macos" => Ok(TargetOs::Darwin),
            _ => Err(OsdepsError::UnsupportedOs { os: s.to_string() }),
        }
    }
}
