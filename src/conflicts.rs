//! Conflict probe invocation for check-only runs
//!
//! The detection algorithm lives in an external tool; this wrapper only
//! consumes its boolean outcome and report text. Exit 0 means no
//! conflicts, exit 1 means conflicts were found, anything else is a
//! probe failure.

use std::process::Command;

use crate::context::InstallContext;
use crate::error::{FlotillaError, Result};

/// Outcome of the external conflict probe
#[derive(Debug, Clone)]
pub struct ConflictReport {
    pub conflicts_found: bool,
    pub report: String,
}

pub fn run_probe(ctx: &InstallContext) -> Result<ConflictReport> {
    let program = ctx.scan_program();
    let output = Command::new(&program)
        .arg(&ctx.root)
        .output()
        .map_err(|e| FlotillaError::ProbeFailed {
            reason: format!("failed to run {}: {e}", program.display()),
        })?;

    let report = String::from_utf8_lossy(&output.stdout).into_owned();
    match output.status.code() {
        Some(0) => Ok(ConflictReport {
            conflicts_found: false,
            report,
        }),
        Some(1) => Ok(ConflictReport {
            conflicts_found: true,
            report,
        }),
        _ => Err(FlotillaError::ProbeFailed {
            reason: format!(
                "{} exited with {}: {}",
                program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        }),
    }
}
