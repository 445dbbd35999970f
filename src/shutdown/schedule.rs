//! Scheduled-job removal
//!
//! The stack registers cron entries that reference its install root or
//! family name. Shutdown rewrites the user crontab without those lines
//! (`crontab -l` → filter → `crontab -`).

use std::io::Write;
use std::process::{Command, Stdio};

use crate::context::InstallContext;

/// Remove crontab entries whose command line references the application
pub fn remove_family_entries(ctx: &InstallContext) -> Result<(), String> {
    let output = Command::new("crontab")
        .arg("-l")
        .output()
        .map_err(|e| format!("failed to run crontab: {e}"))?;

    if !output.status.success() {
        // "no crontab for user" exits non-zero; nothing to remove then.
        return Ok(());
    }

    let current = String::from_utf8_lossy(&output.stdout);
    let root = ctx.root.display().to_string();
    let (filtered, removed) = filter_entries(&current, &[&root, "flotilla"]);
    if removed == 0 {
        return Ok(());
    }

    write_crontab(&filtered)
}

/// Drop crontab lines referencing any needle; comments and unrelated
/// entries pass through untouched
fn filter_entries(content: &str, needles: &[&str]) -> (String, usize) {
    let mut kept = Vec::new();
    let mut removed = 0;

    for line in content.lines() {
        let is_entry = !line.trim_start().starts_with('#');
        if is_entry && needles.iter().any(|n| line.contains(n)) {
            removed += 1;
        } else {
            kept.push(line);
        }
    }

    let mut result = kept.join("\n");
    if !result.is_empty() {
        result.push('\n');
    }
    (result, removed)
}

fn write_crontab(content: &str) -> Result<(), String> {
    let mut child = Command::new("crontab")
        .arg("-")
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| format!("failed to spawn crontab -: {e}"))?;

    if let Some(stdin) = child.stdin.as_mut() {
        stdin
            .write_all(content.as_bytes())
            .map_err(|e| format!("failed to write new crontab: {e}"))?;
    }

    let status = child
        .wait()
        .map_err(|e| format!("failed to wait for crontab: {e}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!("crontab - exited with {status}"))
    }
}
