//! Shell completion generation command.

use crate::cli::Cli;
use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use std::io;

const BIN_NAME: &str = "lotkeeper";

/// Generate shell completion scripts
#[derive(Parser)]
pub struct CompletionsCommand {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    /// Execute the completions command.
    pub fn execute(&self, _global: &GlobalOptions) -> Result<(), CliError> {
        let mut cmd = Cli::command();

        eprintln!("# Generating {} completion script", self.shell);
        match self.shell {
            Shell::Bash => {
                eprintln!("#   lotkeeper completions bash > ~/.local/share/bash-completion/completions/lotkeeper");
            }
            Shell::Zsh => {
                eprintln!("#   lotkeeper completions zsh > ~/.zsh/completions/_lotkeeper");
            }
            Shell::Fish => {
                eprintln!("#   lotkeeper completions fish > ~/.config/fish/completions/lotkeeper.fish");
            }
            Shell::PowerShell => {
                eprintln!("#   lotkeeper completions powershell | Out-String | Invoke-Expression");
            }
            _ => {}
        }
        eprintln!();

        generate(self.shell, &mut cmd, BIN_NAME, &mut io::stdout());

        Ok(())
    }
}
