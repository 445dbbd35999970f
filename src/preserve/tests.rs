//! Unit tests for capture and restore

#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use super::*;
use crate::handoff::{HandoffRecord, HandoffStore, MemoryHandoffStore};

struct Fixture {
    _temp: TempDir,
    ctx: InstallContext,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("install");
        fs::create_dir_all(&root).unwrap();
        let mut ctx = InstallContext::new(root, true);
        ctx.state_dir = temp.path().join("state");
        Self { _temp: temp, ctx }
    }

    fn write(&self, rel: &str, content: &str) {
        let path = self.ctx.root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

#[test]
fn test_preserve_copies_credentials_wholesale() {
    let fx = Fixture::new();
    fx.write("credentials/admin.key", "secret");
    fx.write("credentials/nested/api.token", "token");

    let bundle = preserve(&fx.ctx).unwrap();
    assert_eq!(bundle.credentials_copied, 2);
    assert!(!bundle.credentials_at_risk());
    assert_eq!(
        fs::read_to_string(bundle.dir.join("credentials/nested/api.token")).unwrap(),
        "token"
    );
}

#[test]
fn test_preserve_filters_data_by_whitelist() {
    let fx = Fixture::new();
    fx.write("data/state.json", "{}");
    fx.write("data/app.db", "db");
    fx.write("data/store.sqlite3", "sq");
    fx.write("data/cache.tmp", "junk");
    fx.write("data/logs/output.log", "log");

    let bundle = preserve(&fx.ctx).unwrap();
    assert_eq!(bundle.files_copied, 3);
    assert!(bundle.dir.join("data/state.json").exists());
    assert!(bundle.dir.join("data/app.db").exists());
    assert!(bundle.dir.join("data/store.sqlite3").exists());
    assert!(!bundle.dir.join("data/cache.tmp").exists());
    assert!(!bundle.dir.join("data/logs/output.log").exists());
}

#[test]
fn test_preserve_keeps_relative_paths() {
    let fx = Fixture::new();
    fx.write("data/service/a/settings.json", "{}");

    let bundle = preserve(&fx.ctx).unwrap();
    assert!(bundle.dir.join("data/service/a/settings.json").exists());
}

#[test]
fn test_preserve_missing_sources_are_skipped() {
    let fx = Fixture::new();
    let bundle = preserve(&fx.ctx).unwrap();
    assert_eq!(bundle.files_copied, 0);
    assert!(bundle.warnings.is_empty());
    assert!(!bundle.credentials_at_risk());
}

#[test]
fn test_preserve_warns_on_empty_credentials() {
    let fx = Fixture::new();
    fs::create_dir_all(fx.ctx.credentials_dir()).unwrap();

    let bundle = preserve(&fx.ctx).unwrap();
    assert!(bundle.credentials_at_risk());
    assert!(!bundle.warnings.is_empty());
}

#[test]
fn test_restore_without_handoff_is_noop() {
    let fx = Fixture::new();
    let store = MemoryHandoffStore::empty();
    assert_eq!(restore(&fx.ctx, &store).unwrap(), RestoreOutcome::NoHandoff);
}

#[test]
fn test_upgrade_round_trip_credentials_identical() {
    let fx = Fixture::new();
    fx.write("credentials/admin.key", "secret");
    fx.write("data/state.json", "{\"v\":1}");
    fx.write("data/cache.tmp", "junk");

    let bundle = preserve(&fx.ctx).unwrap();
    let store = MemoryHandoffStore::empty();
    store
        .save(&HandoffRecord {
            preserve_dir: bundle.dir.clone(),
            backup_file: fx.ctx.root.join("backup.tar.gz"),
        })
        .unwrap();

    // Destroy and rebuild the installation, with fresh-install defaults.
    fs::remove_dir_all(&fx.ctx.root).unwrap();
    fs::create_dir_all(&fx.ctx.root).unwrap();
    fx.write("credentials/admin.key", "factory-default");
    fx.write("data/seed.json", "{}");

    let outcome = restore(&fx.ctx, &store).unwrap();
    match outcome {
        RestoreOutcome::Restored { files, warnings } => {
            assert_eq!(files, 2);
            assert!(warnings.is_empty());
        }
        RestoreOutcome::NoHandoff => panic!("expected a restore"),
    }

    // Byte-for-byte identical credentials, defaults overwritten not merged.
    assert_eq!(
        fs::read_to_string(fx.ctx.root.join("credentials/admin.key")).unwrap(),
        "secret"
    );
    assert_eq!(
        fs::read_to_string(fx.ctx.root.join("data/state.json")).unwrap(),
        "{\"v\":1}"
    );
    assert!(!fx.ctx.root.join("data/cache.tmp").exists());
    assert!(!fx.ctx.root.join("data/seed.json").exists());

    // Bundle and record are both gone afterwards.
    assert!(!bundle.dir.exists());
    assert!(store.load().unwrap().is_none());
}

#[test]
fn test_restore_with_missing_bundle_fails() {
    let fx = Fixture::new();
    let store = MemoryHandoffStore::empty();
    store
        .save(&HandoffRecord {
            preserve_dir: fx.ctx.preserve_root().join("gone"),
            backup_file: fx.ctx.root.join("backup.tar.gz"),
        })
        .unwrap();

    assert!(matches!(
        restore(&fx.ctx, &store).unwrap_err(),
        crate::error::FlotillaError::BundleMissing { .. }
    ));
}

#[test]
fn test_restore_flags_tampered_bundle_file() {
    let fx = Fixture::new();
    fx.write("credentials/admin.key", "secret");
    let bundle = preserve(&fx.ctx).unwrap();

    fs::write(bundle.dir.join("credentials/admin.key"), "tampered").unwrap();

    let store = MemoryHandoffStore::empty();
    store
        .save(&HandoffRecord {
            preserve_dir: bundle.dir.clone(),
            backup_file: fx.ctx.root.join("backup.tar.gz"),
        })
        .unwrap();

    match restore(&fx.ctx, &store).unwrap() {
        RestoreOutcome::Restored { warnings, .. } => {
            assert!(warnings.iter().any(|w| w.contains("admin.key")));
        }
        RestoreOutcome::NoHandoff => panic!("expected a restore"),
    }
}

#[test]
fn test_list_orphans_excludes_referenced_bundle() {
    let fx = Fixture::new();
    fx.write("credentials/admin.key", "secret");
    let live = preserve(&fx.ctx).unwrap();
    let orphan_dir = fx.ctx.preserve_root().join("11111111-dead-beef");
    fs::create_dir_all(&orphan_dir).unwrap();

    let store = MemoryHandoffStore::empty();
    store
        .save(&HandoffRecord {
            preserve_dir: live.dir.clone(),
            backup_file: fx.ctx.root.join("backup.tar.gz"),
        })
        .unwrap();

    let orphans = list_orphans(&fx.ctx, &store).unwrap();
    assert_eq!(orphans, vec![orphan_dir]);
}

#[test]
fn test_whitelist_matches() {
    let whitelist = data_whitelist().unwrap();
    for name in ["a.json", "b.db", "c.sqlite", "c.sqlite3", "c.sqlite-wal"] {
        assert!(matches_whitelist(&whitelist, Path::new(name)), "{name}");
    }
    for name in ["a.tmp", "b.log", "json", "db.bak"] {
        assert!(!matches_whitelist(&whitelist, Path::new(name)), "{name}");
    }
}
