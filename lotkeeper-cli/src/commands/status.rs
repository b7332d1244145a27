//! Status command implementation.

use crate::error::CliError;
use crate::utils::{
    load_configuration, load_settings, open_database, print_rows, resolve_format, GlobalOptions,
    OutputFormat, Tabular,
};
use clap::Args;
use lotkeeper::database::CategoryOccupancy;
use lotkeeper::LifecycleManager;
use std::io::Write;

/// Show slot occupancy for the whole facility and per slot category.
#[derive(Args)]
pub struct StatusCommand {
    /// Output format
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,
}

impl Tabular for CategoryOccupancy {
    const HEADERS: &'static [&'static str] = &["category", "available", "total"];

    fn display_row(&self) -> Vec<String> {
        vec![
            self.category.to_string(),
            self.available.to_string(),
            self.total.to_string(),
        ]
    }
}

impl StatusCommand {
    /// Execute the status command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let settings = load_settings(&config)?;
        let mut db = open_database(global, &config)?;
        let snapshot = LifecycleManager::new(&mut db, &settings).occupancy()?;

        match resolve_format(self.format, &config) {
            OutputFormat::Json => {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                serde_json::to_writer_pretty(&mut handle, &snapshot)?;
                writeln!(handle)?;
            }
            OutputFormat::Table => {
                println!(
                    "{} slots: {} available, {} occupied, {} under maintenance",
                    snapshot.total,
                    snapshot.available,
                    snapshot.occupied,
                    snapshot.under_maintenance
                );
                println!();
                print_rows(&snapshot.by_category, OutputFormat::Table)?;
            }
            delimited => print_rows(&snapshot.by_category, delimited)?,
        }

        Ok(())
    }
}
