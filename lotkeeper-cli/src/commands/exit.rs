//! Exit command implementation.

use crate::error::CliError;
use crate::utils::{
    format_timestamp, load_configuration, load_settings, open_database, parse_plate, print_rows,
    resolve_format, GlobalOptions, OutputFormat, Tabular,
};
use clap::Args;
use lotkeeper::{ExitReceipt, LicensePlate, LifecycleManager};

/// Register a vehicle leaving the facility.
#[derive(Args)]
pub struct ExitCommand {
    /// License plate
    #[arg(value_parser = parse_plate)]
    pub plate: LicensePlate,

    /// Output format
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,
}

impl Tabular for ExitReceipt {
    const HEADERS: &'static [&'static str] = &[
        "session",
        "plate",
        "slot",
        "entry_time",
        "exit_time",
        "duration",
        "billing_mode",
        "amount",
    ];

    fn display_row(&self) -> Vec<String> {
        vec![
            self.session_id.to_string(),
            self.plate.to_string(),
            self.slot_number.to_string(),
            format_timestamp(self.entry_time),
            format_timestamp(self.exit_time),
            self.duration.clone(),
            self.billing_mode.to_string(),
            self.billing_amount.to_string(),
        ]
    }

    fn record(&self) -> Vec<String> {
        let mut row = self.display_row();
        row[3] = self.entry_time.to_rfc3339();
        row[4] = self.exit_time.to_rfc3339();
        row
    }
}

/// Prints a completed session the way `exit` and `force-end` both report it.
pub(crate) fn report(
    receipt: ExitReceipt,
    format: Option<OutputFormat>,
    config: &lotkeeper::Config,
    global: &GlobalOptions,
) -> Result<(), CliError> {
    match format {
        None if !global.quiet => {
            println!(
                "{} left slot {} after {} (session {})",
                receipt.plate, receipt.slot_number, receipt.duration, receipt.session_id
            );
            println!(
                "Amount due: {} ({}, {} billable hours)",
                receipt.billing_amount, receipt.billing_mode, receipt.duration_hours
            );
        }
        None => println!("{}", receipt.billing_amount),
        Some(_) => print_rows(&[receipt], resolve_format(format, config))?,
    }
    Ok(())
}

impl ExitCommand {
    /// Execute the exit command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let settings = load_settings(&config)?;
        let mut db = open_database(global, &config)?;

        let receipt = LifecycleManager::new(&mut db, &settings).exit(&self.plate)?;
        report(receipt, self.format, &config, global)
    }
}
