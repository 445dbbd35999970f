//! Verify-health command implementation

use std::process::ExitCode;

use crate::context::InstallContext;
use crate::error::Result;
use crate::health::{self, Verdict};
use crate::runtime::DockerCli;
use crate::ui::Reporter;

pub fn run(ctx: &InstallContext, ui: &Reporter) -> Result<ExitCode> {
    let docker = DockerCli::new();
    let report = health::verify(ctx, &docker);
    ui.health(&report);

    match report.verdict {
        Verdict::Passed | Verdict::Partial => Ok(ExitCode::SUCCESS),
        Verdict::Failed => Ok(ExitCode::FAILURE),
    }
}
