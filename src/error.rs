//! Error types and handling for Flotilla
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//! The `help` text of each diagnostic doubles as the `suggested_action` field
//! of the automation-mode error channel.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Flotilla lifecycle operations
#[derive(Error, Diagnostic, Debug)]
pub enum FlotillaError {
    // Environment validation errors
    #[error("Required tools missing from PATH: {}", tools.join(", "))]
    #[diagnostic(
        code(flotilla::env::missing_tools),
        help("Install the listed tools, then re-run 'flotilla validate-environment'")
    )]
    MissingTools { tools: Vec<String> },

    #[error("Container daemon is not reachable: {reason}")]
    #[diagnostic(
        code(flotilla::env::daemon_unreachable),
        help("Start the Docker daemon (e.g. 'systemctl start docker') and retry")
    )]
    DaemonUnreachable { reason: String },

    // Backup errors
    #[error("Backup tool is unavailable: {reason}")]
    #[diagnostic(
        code(flotilla::backup::unavailable),
        help("The installation has no usable management entry point; check manage.sh")
    )]
    BackupUnavailable { reason: String },

    #[error("Backup failed: {reason}")]
    #[diagnostic(
        code(flotilla::backup::failed),
        help("Resolve the backup failure before upgrading; no changes were made")
    )]
    BackupFailed { reason: String },

    // Preservation errors
    #[error("Failed to create preservation bundle: {reason}")]
    #[diagnostic(
        code(flotilla::preserve::bundle_failed),
        help("Check free space and permissions on the state directory")
    )]
    PreservationFailed { reason: String },

    #[error("Preservation bundle is missing at {path}")]
    #[diagnostic(
        code(flotilla::preserve::bundle_missing),
        help("The handoff record points at a bundle that no longer exists; restore cannot proceed")
    )]
    BundleMissing { path: String },

    // Handoff record errors
    #[error("Handoff record at {path} is malformed: {reason}")]
    #[diagnostic(
        code(flotilla::handoff::corrupt),
        help("Remove the file and re-run the upgrade, or restore preserved data manually")
    )]
    HandoffCorrupt { path: String, reason: String },

    // Conflict probe errors
    #[error("Conflict probe failed to run: {reason}")]
    #[diagnostic(
        code(flotilla::check::probe_failed),
        help("Ensure the scan tool is installed and on PATH")
    )]
    ProbeFailed { reason: String },

    // Orchestrator errors
    #[error("Unknown installation mode: '{token}'")]
    #[diagnostic(
        code(flotilla::mode::unknown),
        help("Valid modes: fresh, upgrade, force, check")
    )]
    UnknownMode { token: String },

    #[error("Invalid state: {message}")]
    #[diagnostic(code(flotilla::orchestrator::invalid_state))]
    InvalidState { message: String },

    #[error("Upgrade aborted: {reason}")]
    #[diagnostic(
        code(flotilla::orchestrator::upgrade_aborted),
        help("No destructive step has run; the installation is unchanged")
    )]
    UpgradeAborted { reason: String },

    #[error("Failed to remove installation at {path}: {reason}")]
    #[diagnostic(
        code(flotilla::orchestrator::remove_failed),
        help("The installation may be partially removed; inspect it before retrying")
    )]
    RemoveFailed { path: String, reason: String },

    // File system errors
    #[error("Failed to read {path}: {reason}")]
    #[diagnostic(code(flotilla::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write {path}: {reason}")]
    #[diagnostic(code(flotilla::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("{message}")]
    #[diagnostic(code(flotilla::io::error))]
    IoError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl FlotillaError {
    /// Stable identifier for the automation-mode `error_type` field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingTools { .. } => "missing_tools",
            Self::DaemonUnreachable { .. } => "daemon_unreachable",
            Self::BackupUnavailable { .. } => "backup_unavailable",
            Self::BackupFailed { .. } => "backup_failed",
            Self::PreservationFailed { .. } => "preservation_failed",
            Self::BundleMissing { .. } => "bundle_missing",
            Self::HandoffCorrupt { .. } => "handoff_corrupt",
            Self::ProbeFailed { .. } => "probe_failed",
            Self::UnknownMode { .. } => "unknown_mode",
            Self::InvalidState { .. } => "invalid_state",
            Self::UpgradeAborted { .. } => "upgrade_aborted",
            Self::RemoveFailed { .. } => "remove_failed",
            Self::FileReadFailed { .. } => "file_read_failed",
            Self::FileWriteFailed { .. } => "file_write_failed",
            Self::IoError { .. } => "io_error",
        }
    }

    /// Help text of the diagnostic, used as `suggested_action` in automation mode
    pub fn suggested_action(&self) -> Option<String> {
        Diagnostic::help(self).map(|h| h.to_string())
    }
}

/// Creates an IO error from a prompt or other terminal failure
pub fn io_error(message: impl Into<String>) -> FlotillaError {
    FlotillaError::IoError {
        message: message.into(),
        source: None,
    }
}

pub type Result<T> = std::result::Result<T, FlotillaError>;
