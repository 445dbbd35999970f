//! Data preservation across the destroy-and-rebuild cycle
//!
//! Capture copies `credentials/` wholesale and whitelisted `data/` files
//! into a bundle under the state directory before the installation is
//! removed. Restore runs in a later process invocation, after the fresh
//! install, and replaces whatever defaults the fresh install produced.
//!
//! Each bundle carries a manifest of blake3 hashes so restore can flag
//! files that changed while sitting in the bundle.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;
use walkdir::WalkDir;
use wax::{CandidatePath, Glob, Pattern};

use crate::common::fs::{copy_dir_filtered, copy_dir_recursive};
use crate::context::{CREDENTIALS_DIR, DATA_DIR, InstallContext};
use crate::error::{FlotillaError, Result};
use crate::handoff::HandoffStore;

/// Filename patterns preserved out of `data/`
const DATA_WHITELIST: [&str; 3] = ["*.json", "*.db", "*.sqlite*"];

/// Bundle-local manifest filename
const MANIFEST_FILE: &str = "manifest";

/// A temporary directory holding data extracted before destruction
///
/// Exists only within the upgrade window between shutdown and restore.
#[derive(Debug)]
pub struct PreservationBundle {
    pub dir: PathBuf,
    pub files_copied: usize,
    pub credentials_copied: usize,
    pub warnings: Vec<String>,
    credentials_expected: bool,
}

impl PreservationBundle {
    /// True when `credentials/` existed but nothing of it was captured;
    /// proceeding past this point accepts credential loss
    pub fn credentials_at_risk(&self) -> bool {
        self.credentials_expected && self.credentials_copied == 0
    }
}

/// Outcome of a restore attempt
#[derive(Debug, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// No handoff record: nothing to do, success
    NoHandoff,
    Restored {
        files: usize,
        warnings: Vec<String>,
    },
}

/// Capture credentials and whitelisted data into a fresh bundle
pub fn preserve(ctx: &InstallContext) -> Result<PreservationBundle> {
    let dir = ctx.preserve_root().join(Uuid::new_v4().to_string());
    fs::create_dir_all(&dir).map_err(|e| FlotillaError::PreservationFailed {
        reason: format!("cannot create bundle at {}: {e}", dir.display()),
    })?;

    let mut warnings = Vec::new();
    let mut files_copied = 0;
    let mut credentials_copied = 0;

    let credentials_src = ctx.credentials_dir();
    let credentials_expected = credentials_src.is_dir();
    if credentials_expected {
        match copy_dir_recursive(&credentials_src, &dir.join(CREDENTIALS_DIR)) {
            Ok(count) => {
                credentials_copied = count;
                files_copied += count;
                if count == 0 {
                    warnings.push(format!(
                        "{} exists but contained no files",
                        credentials_src.display()
                    ));
                }
            }
            // Capture must not silently produce an empty bundle.
            Err(e) => warnings.push(format!(
                "failed to copy {}: {e}",
                credentials_src.display()
            )),
        }
    }

    let data_src = ctx.data_dir();
    if data_src.is_dir() {
        let whitelist = data_whitelist()?;
        let matches =
            |rel: &Path| -> bool { matches_whitelist(&whitelist, rel) };
        match copy_dir_filtered(&data_src, &dir.join(DATA_DIR), &matches) {
            Ok(count) => files_copied += count,
            Err(e) => warnings.push(format!("failed to copy {}: {e}", data_src.display())),
        }
    }

    if let Err(e) = write_manifest(&dir) {
        warnings.push(format!("failed to write bundle manifest: {e}"));
    }

    Ok(PreservationBundle {
        dir,
        files_copied,
        credentials_copied,
        warnings,
        credentials_expected,
    })
}

/// Restore preserved data into the (new) installation
///
/// Safe to call unconditionally after every fresh install: without a
/// handoff record this is a no-op success. Restored directories replace
/// their targets wholesale; nothing is merged.
pub fn restore(ctx: &InstallContext, store: &dyn HandoffStore) -> Result<RestoreOutcome> {
    let Some(record) = store.load()? else {
        return Ok(RestoreOutcome::NoHandoff);
    };

    let bundle_dir = &record.preserve_dir;
    if !bundle_dir.is_dir() {
        return Err(FlotillaError::BundleMissing {
            path: bundle_dir.display().to_string(),
        });
    }

    let mut warnings = verify_manifest(bundle_dir);
    let mut files = 0;

    for sub in [CREDENTIALS_DIR, DATA_DIR] {
        let src = bundle_dir.join(sub);
        if !src.is_dir() {
            continue;
        }
        let target = ctx.root.join(sub);
        if target.exists() {
            fs::remove_dir_all(&target).map_err(|e| FlotillaError::IoError {
                message: format!("failed to clear {}: {e}", target.display()),
                source: Some(Box::new(e)),
            })?;
        }
        files += copy_dir_recursive(&src, &target).map_err(|e| FlotillaError::IoError {
            message: format!("failed to restore {}: {e}", target.display()),
            source: Some(Box::new(e)),
        })?;
    }

    // The bundle and the record go together; a leftover record pointing at
    // a deleted bundle would block the next upgrade's restore.
    if let Err(e) = fs::remove_dir_all(bundle_dir) {
        warnings.push(format!(
            "restored, but could not remove bundle {}: {e}",
            bundle_dir.display()
        ));
    }
    store.clear()?;

    Ok(RestoreOutcome::Restored { files, warnings })
}

/// Bundles on disk that no handoff record references
///
/// A crash between capture and handoff-write leaves such orphans behind;
/// `prune-preserved` reports and removes them.
pub fn list_orphans(ctx: &InstallContext, store: &dyn HandoffStore) -> Result<Vec<PathBuf>> {
    let preserve_root = ctx.preserve_root();
    if !preserve_root.is_dir() {
        return Ok(Vec::new());
    }

    let referenced = store.load()?.map(|r| r.preserve_dir);
    let mut orphans = Vec::new();
    let entries = fs::read_dir(&preserve_root).map_err(|e| FlotillaError::FileReadFailed {
        path: preserve_root.display().to_string(),
        reason: e.to_string(),
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| FlotillaError::FileReadFailed {
            path: preserve_root.display().to_string(),
            reason: e.to_string(),
        })?;
        let path = entry.path();
        if path.is_dir() && referenced.as_deref() != Some(path.as_path()) {
            orphans.push(path);
        }
    }
    orphans.sort();
    Ok(orphans)
}

fn data_whitelist() -> Result<Vec<Glob<'static>>> {
    DATA_WHITELIST
        .iter()
        .map(|pattern| {
            Glob::new(pattern).map_err(|e| FlotillaError::PreservationFailed {
                reason: format!("invalid whitelist pattern '{pattern}': {e}"),
            })
        })
        .collect()
}

/// Whitelist applies to the file name, wherever it sits under `data/`
fn matches_whitelist(whitelist: &[Glob<'_>], rel: &Path) -> bool {
    let Some(name) = rel.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let candidate = CandidatePath::from(name);
    whitelist
        .iter()
        .any(|glob| glob.matched(&candidate).is_some())
}

/// Hash every captured file into `manifest` at the bundle root
fn write_manifest(bundle_dir: &Path) -> std::io::Result<()> {
    let mut lines = Vec::new();
    for entry in WalkDir::new(bundle_dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::other)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(bundle_dir)
            .map_err(std::io::Error::other)?;
        let hash = blake3::hash(&fs::read(entry.path())?);
        lines.push(format!("{}  {}", hash.to_hex(), rel.display()));
    }
    fs::write(bundle_dir.join(MANIFEST_FILE), lines.join("\n") + "\n")
}

/// Re-hash bundle files against the manifest; returns a warning per
/// mismatch or unreadable entry, and nothing when no manifest exists
fn verify_manifest(bundle_dir: &Path) -> Vec<String> {
    let manifest_path = bundle_dir.join(MANIFEST_FILE);
    let Ok(content) = fs::read_to_string(&manifest_path) else {
        return Vec::new();
    };

    let mut warnings = Vec::new();
    for line in content.lines() {
        let Some((expected, rel)) = line.split_once("  ") else {
            continue;
        };
        let path = bundle_dir.join(rel);
        match fs::read(&path) {
            Ok(bytes) if blake3::hash(&bytes).to_hex().as_str() == expected => {}
            Ok(_) => warnings.push(format!("bundle file {rel} changed since capture")),
            Err(e) => warnings.push(format!("bundle file {rel} unreadable: {e}")),
        }
    }
    warnings
}

#[cfg(test)]
mod tests;
