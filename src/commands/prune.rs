//! Prune-preserved command implementation
//!
//! A crash between capture and handoff-write leaves a preservation bundle
//! no record references. This command is the explicit garbage-collection
//! path for those orphans: list by default, delete with --remove.

use std::fs;
use std::process::ExitCode;

use inquire::Confirm;

use crate::cli::PruneArgs;
use crate::context::InstallContext;
use crate::error::{FlotillaError, Result, io_error};
use crate::handoff::FsHandoffStore;
use crate::preserve;
use crate::ui::Reporter;

pub fn run(ctx: &InstallContext, ui: &Reporter, args: PruneArgs) -> Result<ExitCode> {
    let store = FsHandoffStore::new(ctx.handoff_path());
    let orphans = preserve::list_orphans(ctx, &store)?;

    if orphans.is_empty() {
        ui.info("No orphaned preservation bundles");
        return Ok(ExitCode::SUCCESS);
    }

    for orphan in &orphans {
        println!("{}", orphan.display());
    }

    if !args.remove {
        ui.recommend("Re-run with --remove to delete these bundles");
        return Ok(ExitCode::SUCCESS);
    }

    if !args.yes && !ui.is_automation() {
        let confirmed = Confirm::new(&format!(
            "Delete {} orphaned bundle(s)? Preserved data in them is lost.",
            orphans.len()
        ))
        .with_default(false)
        .prompt()
        .map_err(|e| io_error(format!("Failed to read confirmation: {e}")))?;
        if !confirmed {
            ui.recommend("Aborted; bundles were kept");
            return Ok(ExitCode::FAILURE);
        }
    }

    for orphan in &orphans {
        fs::remove_dir_all(orphan).map_err(|e| FlotillaError::IoError {
            message: format!("failed to remove {}: {e}", orphan.display()),
            source: Some(Box::new(e)),
        })?;
    }
    ui.success(&format!("Removed {} orphaned bundle(s)", orphans.len()));

    Ok(ExitCode::SUCCESS)
}
