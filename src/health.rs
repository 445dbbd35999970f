//! Post-install health scoring
//!
//! Five equally-weighted, independent checks over the installation. The
//! verdict drives the caller's pass/fail decision: Partial means proceed
//! with a warning, Failed means the install did not take.

use serde::Serialize;

use crate::context::{InstallContext, NETWORK_NAME, is_executable};
use crate::runtime::DockerCli;

/// Number of health checks; each is worth an equal share of the score
pub const TOTAL_CHECKS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Passed,
    Partial,
    Failed,
}

/// One named check outcome, kept for interactive display
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub label: &'static str,
    pub passed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub checks_passed: u32,
    pub total_checks: u32,
    pub percentage: u32,
    pub verdict: Verdict,
    #[serde(skip)]
    pub checks: Vec<CheckResult>,
}

/// Score the installation
pub fn verify(ctx: &InstallContext, docker: &DockerCli) -> HealthReport {
    let manifest = ctx.manifest_path();
    let checks = vec![
        CheckResult {
            label: "installation root exists",
            passed: ctx.root.is_dir(),
        },
        CheckResult {
            label: "manifest and environment file exist",
            passed: manifest.is_file() && ctx.env_file_path().is_file(),
        },
        CheckResult {
            label: "application network exists",
            passed: docker.network_exists(NETWORK_NAME),
        },
        CheckResult {
            label: "manifest passes config validation",
            passed: manifest.is_file() && docker.compose_config_ok(&manifest),
        },
        CheckResult {
            label: "management entry point is executable",
            passed: is_executable(&ctx.manage_script()),
        },
    ];

    report_from(checks)
}

fn report_from(checks: Vec<CheckResult>) -> HealthReport {
    let checks_passed = checks.iter().filter(|c| c.passed).count() as u32;
    HealthReport {
        checks_passed,
        total_checks: TOTAL_CHECKS,
        percentage: checks_passed * 100 / TOTAL_CHECKS,
        verdict: verdict_for(checks_passed),
        checks,
    }
}

fn verdict_for(checks_passed: u32) -> Verdict {
    match checks_passed {
        5 => Verdict::Passed,
        3 | 4 => Verdict::Partial,
        _ => Verdict::Failed,
    }
}
