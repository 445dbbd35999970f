//! Installation modes
//!
//! A mode is resolved once per run (interactively via `select-mode` or from
//! the `execute` argument) and is immutable thereafter.

use std::fmt;
use std::str::FromStr;

use crate::error::FlotillaError;

/// The four installation lifecycle modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallationMode {
    /// Plain install onto a clean system; the orchestrator touches nothing
    Fresh,
    /// Destroy-and-rebuild with credentials and data carried across
    Upgrade,
    /// Destroy without preservation; last resort for broken installations
    Force,
    /// Diagnostics only; never proceeds to an install
    CheckOnly,
}

impl InstallationMode {
    /// Token used on the command line and printed by `select-mode`
    pub fn token(self) -> &'static str {
        match self {
            Self::Fresh => "fresh",
            Self::Upgrade => "upgrade",
            Self::Force => "force",
            Self::CheckOnly => "check",
        }
    }

    /// All modes in menu order
    pub fn all() -> [Self; 4] {
        [Self::Fresh, Self::Upgrade, Self::Force, Self::CheckOnly]
    }

    /// Human-readable menu label
    pub fn label(self) -> &'static str {
        match self {
            Self::Fresh => "Fresh install (clean system)",
            Self::Upgrade => "Upgrade (preserve credentials and data)",
            Self::Force => "Force reinstall (destroys existing data)",
            Self::CheckOnly => "Check for conflicts only",
        }
    }
}

impl FromStr for InstallationMode {
    type Err = FlotillaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fresh" => Ok(Self::Fresh),
            "upgrade" => Ok(Self::Upgrade),
            "force" => Ok(Self::Force),
            "check" | "check-only" => Ok(Self::CheckOnly),
            _ => Err(FlotillaError::UnknownMode {
                token: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for InstallationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
