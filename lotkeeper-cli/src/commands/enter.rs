//! Enter command implementation.

use crate::error::CliError;
use crate::utils::{
    format_timestamp, load_configuration, load_settings, open_database, parse_plate,
    parse_slot_number, parse_text, print_rows, resolve_format, GlobalOptions, OutputFormat,
    Tabular,
};
use clap::Args;
use lotkeeper::{
    BillingMode, EntryOptions, EntryReceipt, LicensePlate, LifecycleManager, SlotNumber,
    VehicleCategory,
};

/// Register a vehicle entering the facility.
#[derive(Args)]
pub struct EnterCommand {
    /// License plate; spaces and hyphens are ignored
    #[arg(value_parser = parse_plate)]
    pub plate: LicensePlate,

    /// Vehicle category (car, bike, electric_vehicle, accessible_need)
    #[arg(long, default_value = "car", value_parser = parse_text::<VehicleCategory>)]
    pub category: VehicleCategory,

    /// Billing mode (hourly, day_pass)
    #[arg(long, default_value = "hourly", value_parser = parse_text::<BillingMode>)]
    pub billing: BillingMode,

    /// Park in this slot instead of auto-assigning
    #[arg(long, value_parser = parse_slot_number)]
    pub slot: Option<SlotNumber>,

    /// Output format
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,
}

impl Tabular for EntryReceipt {
    const HEADERS: &'static [&'static str] = &["session", "slot", "entry_time"];

    fn display_row(&self) -> Vec<String> {
        vec![
            self.session_id.to_string(),
            self.slot_number.to_string(),
            format_timestamp(self.entry_time),
        ]
    }

    fn record(&self) -> Vec<String> {
        vec![
            self.session_id.to_string(),
            self.slot_number.to_string(),
            self.entry_time.to_rfc3339(),
        ]
    }
}

impl EnterCommand {
    /// Execute the enter command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let settings = load_settings(&config)?;
        let mut db = open_database(global, &config)?;

        let options = EntryOptions::new(self.plate, self.category)
            .with_billing_mode(self.billing)
            .with_slot(self.slot);
        let receipt = LifecycleManager::new(&mut db, &settings).enter(&options)?;

        match self.format {
            None if !global.quiet => println!(
                "{} parked in slot {} (session {})",
                options.plate, receipt.slot_number, receipt.session_id
            ),
            None => println!("{}", receipt.slot_number),
            Some(_) => print_rows(&[receipt], resolve_format(self.format, &config))?,
        }

        Ok(())
    }
}
