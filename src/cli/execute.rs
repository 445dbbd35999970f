use clap::Args;

/// Arguments for the execute command
#[derive(Args, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Upgrade, preserving credentials and data:\n    flotilla execute upgrade\n\n\
                  Force reinstall without prompting:\n    flotilla execute force --yes\n\n\
                  Diagnostics only (never proceeds):\n    flotilla execute check\n\n\
                  Headless upgrade accepting an empty capture:\n    \
                  flotilla execute upgrade --automation --accept-data-loss")]
pub struct ExecuteArgs {
    /// Installation mode: fresh, upgrade, force or check
    pub mode: String,

    /// Skip the destructive-intent confirmation (force mode)
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Proceed even if nothing could be preserved (headless upgrades)
    #[arg(long = "accept-data-loss")]
    pub accept_data_loss: bool,
}
