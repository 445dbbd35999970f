//! Graceful shutdown of the running stack
//!
//! Never fails: a previous crashed run may have left containers, networks
//! and scheduled jobs in any partial state, so the controller runs an
//! explicit ordered list of overlapping, idempotent actions and folds
//! failures into a warning report instead of stopping. Forward progress
//! toward a clean install outranks diagnosing an already-broken
//! installation.

pub mod schedule;

use std::process::Command;

use crate::context::{CONTAINER_PREFIXES, InstallContext, NETWORK_NAME, is_executable};
use crate::runtime::DockerCli;

/// What the controller managed to do, and what it could not
#[derive(Debug, Default)]
pub struct ShutdownReport {
    /// Names of actions that completed
    pub completed: Vec<String>,
    /// One entry per failed sub-step; never escalated to an abort
    pub warnings: Vec<String>,
}

/// Stop and remove containers, the network and scheduled jobs
pub fn shutdown(ctx: &InstallContext, docker: &DockerCli) -> ShutdownReport {
    let mut report = ShutdownReport::default();

    // Each action is attempted regardless of prior outcome.
    let actions: Vec<(&str, Box<dyn Fn() -> Result<(), String> + '_>)> = vec![
        ("management stop", Box::new(|| management_stop(ctx))),
        ("management unschedule", Box::new(|| management_unschedule(ctx))),
        ("compose down", Box::new(|| compose_down(ctx, docker))),
        ("remove family containers", Box::new(|| remove_family_containers(docker))),
        ("remove network", Box::new(|| remove_network(docker))),
        ("remove scheduled jobs", Box::new(|| schedule::remove_family_entries(ctx))),
    ];

    for (name, action) in actions {
        match action() {
            Ok(()) => report.completed.push(name.to_string()),
            Err(reason) => report.warnings.push(format!("{name}: {reason}")),
        }
    }

    report
}

fn management_stop(ctx: &InstallContext) -> Result<(), String> {
    run_management(ctx, "stop")
}

fn management_unschedule(ctx: &InstallContext) -> Result<(), String> {
    run_management(ctx, "unschedule")
}

fn run_management(ctx: &InstallContext, subcommand: &str) -> Result<(), String> {
    let script = ctx.manage_script();
    if !is_executable(&script) {
        // No entry point is a normal state (broken or partial install).
        return Ok(());
    }

    let output = Command::new(&script)
        .arg(subcommand)
        .current_dir(&ctx.root)
        .output()
        .map_err(|e| format!("failed to run {}: {e}", script.display()))?;

    if output.status.success() {
        Ok(())
    } else {
        Err(format!(
            "{} {subcommand} exited with {}",
            script.display(),
            output.status
        ))
    }
}

/// Manifest-level teardown as an overlapping safety net, attempted even
/// when the management stop already ran
fn compose_down(ctx: &InstallContext, docker: &DockerCli) -> Result<(), String> {
    let manifest = ctx.manifest_path();
    if !manifest.is_file() {
        return Ok(());
    }
    docker.compose_down(&manifest)
}

fn remove_family_containers(docker: &DockerCli) -> Result<(), String> {
    let names = docker.list_family_containers(&CONTAINER_PREFIXES)?;
    let mut failures = Vec::new();
    for name in names {
        if let Err(reason) = docker.remove_container(&name) {
            failures.push(format!("{name}: {reason}"));
        }
    }
    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures.join("; "))
    }
}

fn remove_network(docker: &DockerCli) -> Result<(), String> {
    if !docker.network_exists(NETWORK_NAME) {
        return Ok(());
    }
    docker.remove_network(NETWORK_NAME)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // The full best-effort sequence runs against stub binaries in the
    // integration suite; here only the no-entry-point path is unit-tested.
    #[test]
    fn test_management_ops_skip_without_entry_point() {
        let temp = tempfile::TempDir::new().unwrap();
        let ctx = InstallContext::new(temp.path().to_path_buf(), true);
        assert!(management_stop(&ctx).is_ok());
        assert!(management_unschedule(&ctx).is_ok());
    }

    #[test]
    fn test_compose_down_skips_without_manifest() {
        let temp = tempfile::TempDir::new().unwrap();
        let ctx = InstallContext::new(temp.path().to_path_buf(), true);
        assert!(compose_down(&ctx, &DockerCli::new()).is_ok());
    }
}
