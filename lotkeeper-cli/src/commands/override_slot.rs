//! Override command implementation.

use crate::error::CliError;
use crate::utils::{
    format_timestamp, load_configuration, load_settings, open_database, parse_slot_number,
    print_rows, resolve_format, GlobalOptions, OutputFormat, Tabular,
};
use clap::Args;
use lotkeeper::{LifecycleManager, OverrideReceipt, SessionId, SlotNumber};

/// Move an active session to another slot. Billing still runs from the
/// original entry time.
#[derive(Args)]
pub struct OverrideCommand {
    /// Session id
    #[arg(value_name = "SESSION_ID")]
    pub session: i64,

    /// Slot to move the vehicle to
    #[arg(value_parser = parse_slot_number)]
    pub slot: SlotNumber,

    /// Output format
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,
}

impl Tabular for OverrideReceipt {
    const HEADERS: &'static [&'static str] =
        &["session", "old_slot", "new_slot", "entry_time", "billing_mode"];

    fn display_row(&self) -> Vec<String> {
        vec![
            self.session_id.to_string(),
            self.old_slot.to_string(),
            self.new_slot.to_string(),
            format_timestamp(self.entry_time),
            self.billing_mode.to_string(),
        ]
    }

    fn record(&self) -> Vec<String> {
        let mut row = self.display_row();
        row[3] = self.entry_time.to_rfc3339();
        row
    }
}

impl OverrideCommand {
    /// Execute the override command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let settings = load_settings(&config)?;
        let mut db = open_database(global, &config)?;

        let receipt = LifecycleManager::new(&mut db, &settings)
            .override_slot(SessionId::new(self.session), &self.slot)?;

        match self.format {
            None if !global.quiet => println!(
                "Session {} moved from {} to {}",
                receipt.session_id, receipt.old_slot, receipt.new_slot
            ),
            None => {}
            Some(_) => print_rows(&[receipt], resolve_format(self.format, &config))?,
        }

        Ok(())
    }
}
