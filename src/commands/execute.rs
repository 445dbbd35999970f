//! Execute command implementation

use std::process::ExitCode;

use inquire::Confirm;

use crate::cli::ExecuteArgs;
use crate::context::InstallContext;
use crate::error::{FlotillaError, Result, io_error};
use crate::handoff::FsHandoffStore;
use crate::mode::InstallationMode;
use crate::orchestrator::{Orchestrator, Outcome};
use crate::runtime::DockerCli;
use crate::ui::Reporter;

pub fn run(ctx: &InstallContext, ui: &Reporter, args: ExecuteArgs) -> Result<ExitCode> {
    let mode: InstallationMode = args.mode.parse()?;

    // Destructive-intent confirmation is this layer's responsibility;
    // the orchestrator assumes it already happened.
    if mode == InstallationMode::Force && !args.yes {
        if ui.is_automation() {
            return Err(FlotillaError::InvalidState {
                message: "force mode requires --yes in automation".to_string(),
            });
        }
        let confirmed = Confirm::new(&format!(
            "Force reinstall destroys {} and all its data. Continue?",
            ctx.root.display()
        ))
        .with_default(false)
        .with_help_message("Credentials and data are NOT preserved in force mode")
        .prompt()
        .map_err(|e| io_error(format!("Failed to read confirmation: {e}")))?;
        if !confirmed {
            ui.recommend("Aborted; nothing was changed");
            return Ok(ExitCode::FAILURE);
        }
    }

    let store = FsHandoffStore::new(ctx.handoff_path());
    let docker = DockerCli::new();
    let orchestrator = Orchestrator::new(ctx, &store, &docker, ui, args.accept_data_loss);

    match orchestrator.execute(mode)? {
        Outcome::Proceed => {
            ui.recommend("Proceed with the install step");
            Ok(ExitCode::SUCCESS)
        }
        Outcome::DoNotProceed => Ok(ExitCode::FAILURE),
    }
}
