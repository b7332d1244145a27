//! Main entry point for the lotkeeper CLI.
//!
//! Gate terminals and operators drive the parking engine through these
//! commands:
//! - `enter` / `exit`: register arrivals and departures
//! - `override` / `force-end`: operator corrections
//! - `alerts` / `estimate`: overstay monitoring and quotes
//! - `slot`: inventory and maintenance

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    let _level = lotkeeper::init_logger(cli.verbose, cli.quiet);

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
        disable_autoinit: cli.disable_autoinit,
    };

    let result = match cli.command {
        cli::Command::Init(cmd) => cmd.execute(&global),
        cli::Command::Slot(cmd) => cmd.execute(&global),
        cli::Command::Enter(cmd) => cmd.execute(&global),
        cli::Command::Exit(cmd) => cmd.execute(&global),
        cli::Command::Override(cmd) => cmd.execute(&global),
        cli::Command::ForceEnd(cmd) => cmd.execute(&global),
        cli::Command::Sessions(cmd) => cmd.execute(&global),
        cli::Command::Estimate(cmd) => cmd.execute(&global),
        cli::Command::Alerts(cmd) => cmd.execute(&global),
        cli::Command::Status(cmd) => cmd.execute(&global),
        cli::Command::Verify(cmd) => cmd.execute(&global),
        cli::Command::Validate(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
