//! Verify command implementation.
//!
//! Runs the SQLite integrity check and the slot/session invariant report.
//! Exits 1 when any violation is found.

use crate::error::CliError;
use crate::utils::{load_configuration, load_settings, open_database, GlobalOptions};
use clap::Args;
use lotkeeper::LifecycleManager;

/// Check slot and session invariants.
#[derive(Args)]
pub struct VerifyCommand {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl VerifyCommand {
    /// Execute the verify command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let settings = load_settings(&config)?;
        let mut db = open_database(global, &config)?;
        let report = LifecycleManager::new(&mut db, &settings).verify()?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            for mismatch in &report.slot_mismatches {
                println!(
                    "slot {} is {} but has {} active session(s)",
                    mismatch.slot_number, mismatch.status, mismatch.active_sessions
                );
            }
            for duplicate in &report.duplicate_active {
                println!(
                    "vehicle {} has {} active sessions",
                    duplicate.plate, duplicate.active_sessions
                );
            }
        }

        if report.is_clean() {
            if !global.quiet && !self.json {
                println!("All invariants hold");
            }
            Ok(())
        } else {
            Err(CliError::SemanticFailure(format!(
                "{} invariant violation(s) found",
                report.slot_mismatches.len() + report.duplicate_active.len()
            )))
        }
    }
}
