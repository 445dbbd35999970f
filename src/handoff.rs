//! Cross-process upgrade handoff
//!
//! The destructive phase of an upgrade and the later restore run in
//! different process invocations; a persisted two-field record connects
//! them. A record exists iff the destructive phase completed and restore
//! has not yet run. Storage sits behind a small port so unit tests can run
//! without touching the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FlotillaError, Result};

/// Where preserved data and the backup archive ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffRecord {
    /// Preservation bundle directory
    pub preserve_dir: PathBuf,
    /// Backup archive written before destruction
    pub backup_file: PathBuf,
}

impl HandoffRecord {
    /// Flat key=value serialization (`PRESERVE_DIR=`, `BACKUP_FILE=`)
    pub fn to_key_values(&self) -> String {
        format!(
            "PRESERVE_DIR={}\nBACKUP_FILE={}\n",
            self.preserve_dir.display(),
            self.backup_file.display()
        )
    }

    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let mut preserve_dir = None;
        let mut backup_file = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.split_once('=') {
                Some(("PRESERVE_DIR", value)) => preserve_dir = Some(PathBuf::from(value)),
                Some(("BACKUP_FILE", value)) => backup_file = Some(PathBuf::from(value)),
                Some(_) => {} // unknown keys are tolerated for forward compatibility
                None => {
                    return Err(FlotillaError::HandoffCorrupt {
                        path: path.display().to_string(),
                        reason: format!("line without key=value: '{line}'"),
                    });
                }
            }
        }

        match (preserve_dir, backup_file) {
            (Some(preserve_dir), Some(backup_file)) => Ok(Self {
                preserve_dir,
                backup_file,
            }),
            (None, _) => Err(FlotillaError::HandoffCorrupt {
                path: path.display().to_string(),
                reason: "missing PRESERVE_DIR".to_string(),
            }),
            (_, None) => Err(FlotillaError::HandoffCorrupt {
                path: path.display().to_string(),
                reason: "missing BACKUP_FILE".to_string(),
            }),
        }
    }
}

/// Storage port for the handoff record
pub trait HandoffStore {
    /// Load the record, `None` when no upgrade is pending
    fn load(&self) -> Result<Option<HandoffRecord>>;
    fn save(&self, record: &HandoffRecord) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Filesystem-backed store at the well-known state path
#[derive(Debug)]
pub struct FsHandoffStore {
    path: PathBuf,
}

impl FsHandoffStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl HandoffStore for FsHandoffStore {
    fn load(&self) -> Result<Option<HandoffRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(|e| FlotillaError::FileReadFailed {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        HandoffRecord::parse(&content, &self.path).map(Some)
    }

    /// Atomic write (temp file + rename) so a crash mid-write never leaves
    /// a partial record for the next invocation to read
    fn save(&self, record: &HandoffRecord) -> Result<()> {
        let dir = self.path.parent().ok_or_else(|| FlotillaError::IoError {
            message: format!("handoff path {} has no parent", self.path.display()),
            source: None,
        })?;
        fs::create_dir_all(dir).map_err(|e| FlotillaError::FileWriteFailed {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;

        let tmp_path = self.path.with_extension("handoff.tmp");
        fs::write(&tmp_path, record.to_key_values()).map_err(|e| {
            FlotillaError::FileWriteFailed {
                path: tmp_path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|e| FlotillaError::FileWriteFailed {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FlotillaError::IoError {
                message: format!("failed to remove {}: {e}", self.path.display()),
                source: Some(Box::new(e)),
            }),
        }
    }
}

/// In-memory store for unit tests
#[cfg(test)]
pub struct MemoryHandoffStore(pub std::cell::RefCell<Option<HandoffRecord>>);

#[cfg(test)]
impl MemoryHandoffStore {
    pub fn empty() -> Self {
        Self(std::cell::RefCell::new(None))
    }
}

#[cfg(test)]
impl HandoffStore for MemoryHandoffStore {
    fn load(&self) -> Result<Option<HandoffRecord>> {
        Ok(self.0.borrow().clone())
    }

    fn save(&self, record: &HandoffRecord) -> Result<()> {
        *self.0.borrow_mut() = Some(record.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.0.borrow_mut() = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record() -> HandoffRecord {
        HandoffRecord {
            preserve_dir: PathBuf::from("/var/lib/flotilla/preserve/abc"),
            backup_file: PathBuf::from("/var/backups/flotilla-20260807.tar.gz"),
        }
    }

    #[test]
    fn test_key_value_round_trip() {
        let original = record();
        let parsed =
            HandoffRecord::parse(&original.to_key_values(), Path::new("/tmp/x")).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_parse_rejects_missing_keys() {
        let err = HandoffRecord::parse("PRESERVE_DIR=/a\n", Path::new("/tmp/x")).unwrap_err();
        assert!(matches!(err, FlotillaError::HandoffCorrupt { .. }));
        assert!(err.to_string().contains("BACKUP_FILE"));
    }

    #[test]
    fn test_parse_rejects_garbage_line() {
        let err = HandoffRecord::parse("not a record", Path::new("/tmp/x")).unwrap_err();
        assert!(matches!(err, FlotillaError::HandoffCorrupt { .. }));
    }

    #[test]
    fn test_parse_tolerates_unknown_keys() {
        let content = "PRESERVE_DIR=/a\nBACKUP_FILE=/b\nEXTRA=later\n";
        let parsed = HandoffRecord::parse(content, Path::new("/tmp/x")).unwrap();
        assert_eq!(parsed.preserve_dir, PathBuf::from("/a"));
    }

    #[test]
    fn test_fs_store_save_load_clear() {
        let temp = TempDir::new().unwrap();
        let store = FsHandoffStore::new(temp.path().join("state/upgrade.handoff"));

        assert!(store.load().unwrap().is_none());
        store.save(&record()).unwrap();
        assert_eq!(store.load().unwrap(), Some(record()));
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // Clearing an absent record stays a no-op.
        store.clear().unwrap();
    }

    #[test]
    fn test_fs_store_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let store = FsHandoffStore::new(temp.path().join("upgrade.handoff"));
        store.save(&record()).unwrap();
        let names: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("upgrade.handoff")]);
    }
}
