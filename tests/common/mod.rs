//! Common test utilities for Flotilla integration tests
//!
//! Each test gets its own install root, state directory and stub-binary
//! directory; the real `flotilla` binary runs against those through
//! environment variables, so tests never touch a real docker daemon or
//! crontab.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// A sandboxed installation for integration tests
pub struct TestInstall {
    pub temp: TempDir,
    /// Installation root (`--root`)
    pub root: PathBuf,
    /// Persisted-state directory (`FLOTILLA_STATE_DIR`)
    pub state: PathBuf,
    /// Stub executables, prepended to PATH
    pub bin: PathBuf,
}

impl TestInstall {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().join("install");
        let state = temp.path().join("state");
        let bin = temp.path().join("bin");
        for dir in [&root, &state, &bin] {
            fs::create_dir_all(dir).expect("Failed to create test directory");
        }
        Self {
            temp,
            root,
            state,
            bin,
        }
    }

    /// Write a file under the install root
    pub fn write_file(&self, rel: &str, content: &str) {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&path, content).expect("Failed to write file");
    }

    pub fn read_file(&self, rel: &str) -> String {
        fs::read_to_string(self.root.join(rel)).expect("Failed to read file")
    }

    pub fn file_exists(&self, rel: &str) -> bool {
        self.root.join(rel).exists()
    }

    /// Drop a stub executable into the PATH directory
    pub fn write_stub(&self, name: &str, body: &str) -> PathBuf {
        let path = self.bin.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write stub");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
                .expect("Failed to chmod stub");
        }
        path
    }

    /// A docker stub that accepts everything and reports two family
    /// containers plus one unrelated container; every invocation is
    /// appended to `docker.log`
    pub fn stub_docker_ok(&self) {
        let log = self.temp.path().join("docker.log");
        self.write_stub(
            "docker",
            &format!(
                r#"echo "$@" >> {log}
case "$1" in
  ps) printf 'flotilla-web\nflotilla_db\nunrelated\n' ;;
esac
exit 0"#,
                log = log.display()
            ),
        );
    }

    /// A docker stub for hosts with no stack: network inspect and compose
    /// config fail, everything else succeeds
    pub fn stub_docker_empty(&self) {
        let log = self.temp.path().join("docker.log");
        self.write_stub(
            "docker",
            &format!(
                r#"echo "$@" >> {log}
case "$1" in
  network) [ "$2" = inspect ] && exit 1 ;;
  compose) for a in "$@"; do [ "$a" = config ] && exit 1; done ;;
  ps) : ;;
esac
exit 0"#,
                log = log.display()
            ),
        );
    }

    pub fn stub_crontab_empty(&self) {
        self.write_stub("crontab", "exit 1");
    }

    pub fn docker_log(&self) -> String {
        fs::read_to_string(self.temp.path().join("docker.log")).unwrap_or_default()
    }

    /// Management entry point whose `backup` writes and reports an archive
    pub fn install_working_manage_script(&self) -> PathBuf {
        let archive = self.temp.path().join("flotilla-backup.tar.gz");
        self.write_file(
            "manage.sh",
            &format!(
                "#!/bin/sh\ncase \"$1\" in\n  backup) echo data > {a}; echo {a} ;;\nesac\nexit 0\n",
                a = archive.display()
            ),
        );
        self.make_executable("manage.sh");
        archive
    }

    pub fn make_executable(&self, rel: &str) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let path = self.root.join(rel);
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
                .expect("Failed to chmod");
        }
    }

    /// A complete installation: manifest, env file, entry point,
    /// credentials and mixed data files
    pub fn populate(&self) -> PathBuf {
        self.write_file("docker-compose.yml", "services:\n  web:\n    image: flotilla/web\n");
        self.write_file(".env", "FLOTILLA_DOMAIN=example.org\n");
        self.write_file("credentials/admin.key", "admin-secret");
        self.write_file("credentials/ssl/server.pem", "pem-data");
        self.write_file("data/state.json", "{\"version\":3}");
        self.write_file("data/cache.tmp", "scratch");
        self.install_working_manage_script()
    }

    /// Command against this sandbox; stubs shadow the real PATH
    pub fn cmd(&self) -> Command {
        let path = format!(
            "{}:{}",
            self.bin.display(),
            std::env::var("PATH").unwrap_or_default()
        );
        self.cmd_with_path(&path)
    }

    /// Command whose PATH contains ONLY the stub directory
    pub fn cmd_restricted_path(&self) -> Command {
        self.cmd_with_path(&self.bin.display().to_string())
    }

    fn cmd_with_path(&self, path: &str) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("flotilla").expect("binary builds");
        cmd.arg("--root")
            .arg(&self.root)
            .env("FLOTILLA_STATE_DIR", &self.state)
            .env("PATH", path)
            .env_remove("FLOTILLA_ROOT")
            .env_remove("FLOTILLA_AUTOMATION")
            .env_remove("FLOTILLA_SCAN_BIN");
        cmd
    }

    pub fn handoff_path(&self) -> PathBuf {
        self.state.join("upgrade.handoff")
    }
}
