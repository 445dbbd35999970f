//! CLI definitions using clap derive API

pub mod execute;

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

pub use execute::ExecuteArgs;

/// Flotilla - installation lifecycle manager
///
/// Safely installs, upgrades and removes the Flotilla container stack,
/// preserving credentials and essential data across upgrades.
#[derive(Parser, Debug)]
#[command(
    name = "flotilla",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Installation lifecycle manager for the Flotilla container stack",
    long_about = "Flotilla transitions an existing or absent installation to a new one: \
                  upgrades preserve credentials and data across a destroy-and-rebuild \
                  cycle, force reinstalls clear broken installations, and check-only \
                  runs report conflicts without touching anything.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  flotilla select-mode\n    \
                  flotilla execute upgrade\n    \
                  flotilla execute force --yes\n    \
                  flotilla restore-preserved\n    \
                  flotilla verify-health --automation\n\n\
                  \x1b[1m\x1b[32mDocumentation:\x1b[0m\n    \
                  https://github.com/flotilla-stack/flotilla"
)]
pub struct Cli {
    /// Installation root directory
    #[arg(
        long,
        short = 'r',
        global = true,
        env = "FLOTILLA_ROOT",
        default_value = crate::context::DEFAULT_ROOT,
        value_name = "DIR"
    )]
    pub root: PathBuf,

    /// Headless mode: no prompts, structured JSON output
    #[arg(long, short = 'A', global = true, env = "FLOTILLA_AUTOMATION")]
    pub automation: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Choose an installation mode interactively
    #[command(name = "select-mode")]
    SelectMode,

    /// Run the lifecycle procedure for a mode
    Execute(ExecuteArgs),

    /// Restore preserved credentials and data after a fresh install
    #[command(name = "restore-preserved")]
    RestorePreserved,

    /// Check tools, daemon and disk space without changing anything
    #[command(name = "validate-environment")]
    ValidateEnvironment,

    /// Score the installation's health
    #[command(name = "verify-health")]
    VerifyHealth,

    /// List or remove preservation bundles no handoff references
    #[command(name = "prune-preserved")]
    PrunePreserved(PruneArgs),

    /// Print version and build info
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the prune-preserved command
#[derive(Args, Debug)]
pub struct PruneArgs {
    /// Delete orphaned bundles instead of only listing them
    #[arg(long)]
    pub remove: bool,

    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

/// Arguments for the completions command
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: String,
}
