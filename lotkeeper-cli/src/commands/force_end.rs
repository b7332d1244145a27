//! Force-end command implementation.

use crate::commands::exit::report;
use crate::error::CliError;
use crate::utils::{load_configuration, load_settings, open_database, GlobalOptions, OutputFormat};
use clap::Args;
use lotkeeper::{LifecycleManager, SessionId};

/// Close an active session by id, billing it as of now.
///
/// For vehicles that left without passing the exit gate.
#[derive(Args)]
pub struct ForceEndCommand {
    /// Session id
    #[arg(value_name = "SESSION_ID")]
    pub session: i64,

    /// Output format
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,
}

impl ForceEndCommand {
    /// Execute the force-end command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let settings = load_settings(&config)?;
        let mut db = open_database(global, &config)?;

        let receipt =
            LifecycleManager::new(&mut db, &settings).force_end(SessionId::new(self.session))?;
        report(receipt, self.format, &config, global)
    }
}
