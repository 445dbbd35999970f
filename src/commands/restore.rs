//! Restore-preserved command implementation
//!
//! Idempotent by design: fresh-install wrappers call this after every run
//! and a missing handoff record is simply a successful no-op.

use std::process::ExitCode;

use crate::context::InstallContext;
use crate::error::Result;
use crate::handoff::FsHandoffStore;
use crate::preserve::{self, RestoreOutcome};
use crate::ui::Reporter;

pub fn run(ctx: &InstallContext, ui: &Reporter) -> Result<ExitCode> {
    let store = FsHandoffStore::new(ctx.handoff_path());

    match preserve::restore(ctx, &store)? {
        RestoreOutcome::NoHandoff => {
            ui.info("No pending upgrade handoff; nothing to restore");
        }
        RestoreOutcome::Restored { files, warnings } => {
            for warning in &warnings {
                ui.warning(warning);
            }
            ui.success(&format!(
                "Restored {files} preserved file(s) into {}",
                ctx.root.display()
            ));
        }
    }

    Ok(ExitCode::SUCCESS)
}
