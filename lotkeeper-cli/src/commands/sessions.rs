//! Sessions command implementation.
//!
//! Without `--plate` lists every Active session in entry order; with it,
//! shows that vehicle's sessions newest first.

use crate::error::CliError;
use crate::utils::{
    format_timestamp, load_configuration, load_settings, open_database, parse_plate, print_rows,
    resolve_format, GlobalOptions, OutputFormat, Tabular,
};
use clap::Args;
use lotkeeper::{LicensePlate, LifecycleManager, ParkingSession};

/// List active sessions or one vehicle's history.
#[derive(Args)]
pub struct SessionsCommand {
    /// Show this vehicle's history instead of the active sessions
    #[arg(long, value_parser = parse_plate)]
    pub plate: Option<LicensePlate>,

    /// Maximum number of history entries
    #[arg(long, value_name = "N", requires = "plate")]
    pub limit: Option<u32>,

    /// Output format
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,
}

impl Tabular for ParkingSession {
    const HEADERS: &'static [&'static str] = &[
        "session",
        "plate",
        "category",
        "slot",
        "billing_mode",
        "status",
        "entry_time",
        "exit_time",
        "amount",
    ];

    fn display_row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.plate.to_string(),
            self.vehicle_category.to_string(),
            self.slot_number.to_string(),
            self.billing_mode.to_string(),
            self.status.to_string(),
            format_timestamp(self.entry_time),
            self.exit_time.map_or_else(|| "-".to_string(), format_timestamp),
            self.billing_amount
                .map_or_else(|| "-".to_string(), |a| a.to_string()),
        ]
    }

    fn record(&self) -> Vec<String> {
        let mut row = self.display_row();
        row[6] = self.entry_time.to_rfc3339();
        row[7] = self.exit_time.map(|t| t.to_rfc3339()).unwrap_or_default();
        row[8] = self
            .billing_amount
            .map(|a| a.to_string())
            .unwrap_or_default();
        row
    }
}

impl SessionsCommand {
    /// Execute the sessions command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let settings = load_settings(&config)?;
        let mut db = open_database(global, &config)?;
        let manager = LifecycleManager::new(&mut db, &settings);

        let sessions = match self.plate {
            Some(ref plate) => manager.history(plate, self.limit)?,
            None => manager.active_sessions()?,
        };

        print_rows(&sessions, resolve_format(self.format, &config))
    }
}
