//! Shell completions command

use std::process::ExitCode;

use clap::CommandFactory;

use crate::cli::CompletionsArgs;
use crate::error::Result;

/// Generate shell completions
pub fn run(args: CompletionsArgs) -> Result<ExitCode> {
    let Some(shell) = shell_from_name(&args.shell) else {
        eprintln!("Unknown shell: {}", args.shell);
        eprintln!("Supported shells: bash, elvish, fish, powershell, zsh");
        return Ok(ExitCode::FAILURE);
    };

    let mut cmd = <crate::cli::Cli as CommandFactory>::command();
    clap_complete::generate(shell, &mut cmd, "flotilla", &mut std::io::stdout().lock());

    Ok(ExitCode::SUCCESS)
}

fn shell_from_name(name: &str) -> Option<clap_complete::Shell> {
    match name.to_lowercase().as_str() {
        "bash" => Some(clap_complete::Shell::Bash),
        "elvish" => Some(clap_complete::Shell::Elvish),
        "fish" => Some(clap_complete::Shell::Fish),
        "powershell" | "pwsh" => Some(clap_complete::Shell::PowerShell),
        "zsh" => Some(clap_complete::Shell::Zsh),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_shells_resolve() {
        for shell in ["bash", "elvish", "fish", "powershell", "pwsh", "zsh", "ZSH"] {
            assert!(shell_from_name(shell).is_some(), "{shell}");
        }
    }

    #[test]
    fn test_unknown_shell_is_rejected() {
        assert!(shell_from_name("tcsh").is_none());
        assert!(run(CompletionsArgs {
            shell: "tcsh".to_string(),
        })
        .is_ok());
    }
}
