//! Environment validation before any lifecycle operation
//!
//! Read-only checks, in order: required tools on PATH, container daemon
//! reachability, free disk space. The first two are hard failures; low disk
//! space only produces a warning.

use std::path::{Path, PathBuf};

use crate::context::InstallContext;
use crate::error::{FlotillaError, Result};
use crate::runtime::DockerCli;

/// External tools the lifecycle depends on
const REQUIRED_TOOLS: [&str; 3] = ["docker", "tar", "crontab"];

/// Minimum free space at the target volume before a warning is raised
const MIN_FREE_BYTES: u64 = 1024 * 1024 * 1024;

/// Validate the environment; returns non-fatal warnings on success
pub fn validate(ctx: &InstallContext, docker: &DockerCli) -> Result<Vec<String>> {
    // Every missing tool is reported at once, not just the first.
    let missing: Vec<String> = REQUIRED_TOOLS
        .iter()
        .filter(|tool| which::which(tool).is_err())
        .map(|tool| (*tool).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(FlotillaError::MissingTools { tools: missing });
    }

    docker
        .daemon_reachable()
        .map_err(|reason| FlotillaError::DaemonUnreachable { reason })?;

    let mut warnings = Vec::new();
    match free_space_at(&ctx.root) {
        Some(free) if free < MIN_FREE_BYTES => {
            warnings.push(format!(
                "Less than 1 GiB free at {} ({} MiB available)",
                ctx.root.display(),
                free / (1024 * 1024)
            ));
        }
        Some(_) => {}
        None => warnings.push(format!(
            "Could not determine free space at {}",
            ctx.root.display()
        )),
    }

    Ok(warnings)
}

/// Free bytes on the volume holding `path`, probing the nearest existing
/// ancestor when the path itself does not exist yet
fn free_space_at(path: &Path) -> Option<u64> {
    let mut probe: PathBuf = path.to_path_buf();
    loop {
        if probe.exists() {
            return fs2::available_space(&probe).ok();
        }
        if !probe.pop() {
            return None;
        }
    }
}
