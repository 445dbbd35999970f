//! Explicit per-run context threaded through every lifecycle call
//!
//! Replaces ambient globals (install root, well-known temp paths) with one
//! value constructed in `main` and passed down. All fixed names of the
//! Flotilla stack live here.

use std::env;
use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Default installation root on a production host
pub const DEFAULT_ROOT: &str = "/opt/flotilla";

/// Compose manifest filename (mandatory top-level file)
pub const COMPOSE_FILE: &str = "docker-compose.yml";

/// Environment file (mandatory top-level file)
pub const ENV_FILE: &str = ".env";

/// Management entry point shipped inside the installation
pub const MANAGE_SCRIPT: &str = "manage.sh";

/// Credentials directory, preserved wholesale across upgrades
pub const CREDENTIALS_DIR: &str = "credentials";

/// Mutable data directory, preserved by whitelist across upgrades
pub const DATA_DIR: &str = "data";

/// Dedicated application network
pub const NETWORK_NAME: &str = "flotilla-net";

/// Container name prefixes that identify the application family
pub const CONTAINER_PREFIXES: [&str; 2] = ["flotilla-", "flotilla_"];

/// Filename of the cross-process upgrade handoff record
pub const HANDOFF_FILE: &str = "upgrade.handoff";

/// Default conflict probe program, resolved on PATH
pub const SCAN_PROGRAM: &str = "flotilla-scan";

/// Context for one lifecycle operation
#[derive(Debug, Clone)]
pub struct InstallContext {
    /// Root directory of the installation
    pub root: PathBuf,
    /// Directory for persisted cross-process state (handoff, bundles)
    pub state_dir: PathBuf,
    /// Headless mode: structured JSON output, no prompts
    pub automation: bool,
    /// Identifier correlating all structured output of this run
    pub operation_id: String,
}

impl InstallContext {
    /// Build a context for the given install root
    ///
    /// The root is normalized through `dunce` when it already exists so that
    /// later path comparisons (e.g. crontab filtering) see one spelling.
    pub fn new(root: PathBuf, automation: bool) -> Self {
        let root = dunce::canonicalize(&root).unwrap_or(root);
        Self {
            root,
            state_dir: resolve_state_dir(),
            automation,
            operation_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(COMPOSE_FILE)
    }

    pub fn env_file_path(&self) -> PathBuf {
        self.root.join(ENV_FILE)
    }

    pub fn manage_script(&self) -> PathBuf {
        self.root.join(MANAGE_SCRIPT)
    }

    pub fn credentials_dir(&self) -> PathBuf {
        self.root.join(CREDENTIALS_DIR)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }

    pub fn handoff_path(&self) -> PathBuf {
        self.state_dir.join(HANDOFF_FILE)
    }

    /// Parent directory of all preservation bundles
    pub fn preserve_root(&self) -> PathBuf {
        self.state_dir.join("preserve")
    }

    /// Conflict probe program (`FLOTILLA_SCAN_BIN` overrides for tests)
    pub fn scan_program(&self) -> PathBuf {
        env::var_os("FLOTILLA_SCAN_BIN")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(SCAN_PROGRAM))
    }
}

/// Resolve the persisted-state directory
///
/// `FLOTILLA_STATE_DIR` overrides everything so tests can isolate
/// process-wide state. Falls back through the platform state and data
/// dirs to an absolute temp dir, never a relative path.
fn resolve_state_dir() -> PathBuf {
    if let Some(dir) = env::var_os("FLOTILLA_STATE_DIR") {
        return PathBuf::from(dir);
    }

    let base = dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(absolute_temp_dir);
    base.join("flotilla")
}

/// Absolute temp dir, so state is never created under the current working
/// directory (e.g. when TMPDIR=tmp or TMPDIR=./tmp).
fn absolute_temp_dir() -> PathBuf {
    let t = env::temp_dir();
    if t.is_absolute() {
        t
    } else {
        PathBuf::from("/tmp")
    }
}

/// True if the path exists and carries an executable bit (always true for
/// existing files on non-unix hosts)
pub fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        path.metadata()
            .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        path.is_file()
    }
}
