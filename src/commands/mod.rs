//! Command implementations
//!
//! Thin runners: each builds what its operation needs from the shared
//! context, runs it and maps the result to an exit code. Exit 0 means
//! success/proceed, exit 1 means stop, covering both real failures and
//! the deliberate check-only "do not install" outcome.

pub mod completions;
pub mod execute;
pub mod prune;
pub mod restore;
pub mod select_mode;
pub mod validate;
pub mod verify;
pub mod version;
