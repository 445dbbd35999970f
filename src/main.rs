//! Flotilla - installation lifecycle manager
//!
//! Transitions on-disk state and running containers of the Flotilla stack
//! between installations: upgrades preserve credentials and data across a
//! destroy-and-rebuild cycle, force reinstalls clear broken installations,
//! and check-only runs report conflicts without touching anything.

use std::process::ExitCode;

use clap::Parser;

mod backup;
mod cli;
mod commands;
mod common;
mod conflicts;
mod context;
mod environment;
mod error;
mod handoff;
mod health;
mod mode;
mod orchestrator;
mod preserve;
mod progress;
mod runtime;
mod shutdown;
mod ui;

use cli::{Cli, Commands};
use context::InstallContext;
use ui::Reporter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let ctx = InstallContext::new(cli.root, cli.automation);
    let reporter = Reporter::new(ctx.automation, ctx.operation_id.clone());

    let result = match cli.command {
        Commands::SelectMode => commands::select_mode::run(&reporter),
        Commands::Execute(args) => commands::execute::run(&ctx, &reporter, args),
        Commands::RestorePreserved => commands::restore::run(&ctx, &reporter),
        Commands::ValidateEnvironment => commands::validate::run(&ctx, &reporter),
        Commands::VerifyHealth => commands::verify::run(&ctx, &reporter),
        Commands::PrunePreserved(args) => commands::prune::run(&ctx, &reporter, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            reporter.error(&e);
            ExitCode::FAILURE
        }
    }
}
