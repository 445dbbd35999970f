//! Backup coordination
//!
//! Thin pass-through to the installation's own backup routine
//! (`manage.sh backup`). The archive format and contents are opaque here;
//! the coordinator only hardens the edges: an unavailable tool is
//! distinguished from a failed one, and an empty reported path is a
//! failure even when the tool exits zero.

use std::path::PathBuf;
use std::process::Command;

use crate::context::{InstallContext, is_executable};
use crate::error::{FlotillaError, Result};

/// Reference to an immutable point-in-time snapshot
///
/// Never deleted by this subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    pub archive: PathBuf,
}

/// Run the external backup routine for the installation
pub fn backup(ctx: &InstallContext) -> Result<BackupRecord> {
    let script = ctx.manage_script();
    if !is_executable(&script) {
        return Err(FlotillaError::BackupUnavailable {
            reason: format!("{} is missing or not executable", script.display()),
        });
    }

    let output = Command::new(&script)
        .arg("backup")
        .current_dir(&ctx.root)
        .output()
        .map_err(|e| FlotillaError::BackupUnavailable {
            reason: format!("failed to run {}: {e}", script.display()),
        })?;

    if !output.status.success() {
        return Err(FlotillaError::BackupFailed {
            reason: format!(
                "{} backup exited with {}: {}",
                script.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    // The routine reports the archive location as its last output line.
    let stdout = String::from_utf8_lossy(&output.stdout);
    let reported = stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .next_back();

    let archive = match reported {
        Some(path) => PathBuf::from(path),
        None => {
            return Err(FlotillaError::BackupFailed {
                reason: "backup tool reported no archive path".to_string(),
            });
        }
    };

    if !archive.exists() {
        return Err(FlotillaError::BackupFailed {
            reason: format!("reported archive {} does not exist", archive.display()),
        });
    }

    Ok(BackupRecord { archive })
}
