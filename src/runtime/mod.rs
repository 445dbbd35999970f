//! Thin wrapper around the `docker` CLI
//!
//! All container-runtime interaction goes through child processes; this
//! module shells out and interprets exit status and text. Callers decide
//! whether a failure is fatal, so most operations return a plain reason
//! string on error.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Handle on the orchestration CLI
#[derive(Debug, Clone)]
pub struct DockerCli {
    program: PathBuf,
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new()
    }
}

impl DockerCli {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("docker"),
        }
    }

    /// Lightweight daemon probe
    pub fn daemon_reachable(&self) -> Result<(), String> {
        let output = Command::new(&self.program)
            .args(["info", "--format", "{{.ServerVersion}}"])
            .output()
            .map_err(|e| format!("failed to run docker: {e}"))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(String::from_utf8_lossy(&output.stderr).trim().to_string())
        }
    }

    /// `docker compose -f <manifest> down` with orphan and volume removal
    pub fn compose_down(&self, manifest: &Path) -> Result<(), String> {
        self.run_checked(&[
            "compose",
            "-f",
            &manifest.display().to_string(),
            "down",
            "--remove-orphans",
            "--volumes",
        ])
    }

    /// Dry config validation of the manifest
    pub fn compose_config_ok(&self, manifest: &Path) -> bool {
        self.run_checked(&[
            "compose",
            "-f",
            &manifest.display().to_string(),
            "config",
            "--quiet",
        ])
        .is_ok()
    }

    /// Names of all containers (running or not) belonging to the
    /// application family
    pub fn list_family_containers(&self, prefixes: &[&str]) -> Result<Vec<String>, String> {
        let output = Command::new(&self.program)
            .args(["ps", "-a", "--format", "{{.Names}}"])
            .output()
            .map_err(|e| format!("failed to run docker ps: {e}"))?;

        if !output.status.success() {
            return Err(String::from_utf8_lossy(&output.stderr).trim().to_string());
        }

        Ok(filter_family_names(
            &String::from_utf8_lossy(&output.stdout),
            prefixes,
        ))
    }

    /// Force-stop and remove one container
    pub fn remove_container(&self, name: &str) -> Result<(), String> {
        self.run_checked(&["rm", "-f", name])
    }

    pub fn network_exists(&self, name: &str) -> bool {
        self.run_checked(&["network", "inspect", name]).is_ok()
    }

    pub fn remove_network(&self, name: &str) -> Result<(), String> {
        self.run_checked(&["network", "rm", name])
    }

    fn run_checked(&self, args: &[&str]) -> Result<(), String> {
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| format!("failed to run docker {}: {e}", args.join(" ")))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(format!(
                "docker {} exited with {}: {}",
                args.join(" "),
                output.status,
                stderr.trim()
            ))
        }
    }
}

/// Select the names matching any of the family prefixes
fn filter_family_names(ps_output: &str, prefixes: &[&str]) -> Vec<String> {
    ps_output
        .lines()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .filter(|name| prefixes.iter().any(|p| name.starts_with(p)))
        .map(str::to_string)
        .collect()
}
