//! Interactive mode selection
//!
//! Prints the resolved mode token alone on stdout so wrapper scripts can
//! capture it; all decoration goes through the prompt itself.

use std::process::ExitCode;

use inquire::Select;

use crate::error::{Result, io_error};
use crate::mode::InstallationMode;
use crate::ui::Reporter;

pub fn run(ui: &Reporter) -> Result<ExitCode> {
    if ui.is_automation() {
        return Err(io_error(
            "select-mode is interactive; pass the mode to 'execute' in automation",
        ));
    }

    let labels: Vec<&'static str> = InstallationMode::all()
        .iter()
        .map(|m| m.label())
        .collect();

    let selection = Select::new("Select installation mode", labels)
        .with_starting_cursor(0)
        .without_filtering()
        .with_help_message("↑↓ to move, ENTER to select, ESC to cancel")
        .prompt_skippable()
        .map_err(|e| io_error(format!("Failed to read selection: {e}")))?;

    let Some(label) = selection else {
        // Cancelled: no token, callers treat it as "stop".
        return Ok(ExitCode::FAILURE);
    };

    let mode = InstallationMode::all()
        .into_iter()
        .find(|m| m.label() == label)
        .unwrap_or(InstallationMode::CheckOnly);
    println!("{}", mode.token());

    Ok(ExitCode::SUCCESS)
}
