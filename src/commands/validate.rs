//! Validate-environment command implementation

use std::process::ExitCode;

use crate::context::InstallContext;
use crate::environment;
use crate::error::Result;
use crate::runtime::DockerCli;
use crate::ui::Reporter;

pub fn run(ctx: &InstallContext, ui: &Reporter) -> Result<ExitCode> {
    let docker = DockerCli::new();
    let warnings = environment::validate(ctx, &docker)?;

    for warning in &warnings {
        ui.warning(warning);
    }
    ui.success("Environment checks passed");

    Ok(ExitCode::SUCCESS)
}
