//! Estimate command implementation.

use crate::error::CliError;
use crate::utils::{
    load_configuration, load_settings, open_database, parse_plate, parse_text, print_rows,
    resolve_format, GlobalOptions, OutputFormat, Tabular,
};
use chrono::{DateTime, Utc};
use clap::Args;
use lotkeeper::{
    compute_amount, format_duration, BillingMode, CostEstimate, LicensePlate, LifecycleManager,
};

/// Estimate what a stay would cost if it ended now.
///
/// Either quote a parked vehicle by plate, or give an entry time and billing
/// mode for a hypothetical stay.
#[derive(Args)]
pub struct EstimateCommand {
    /// A parked vehicle to quote
    #[arg(long, value_parser = parse_plate, conflicts_with = "entry_time")]
    pub plate: Option<LicensePlate>,

    /// Entry time (RFC 3339, e.g. 2024-03-01T09:30:00Z)
    #[arg(long, value_name = "TIME", required_unless_present = "plate")]
    pub entry_time: Option<DateTime<Utc>>,

    /// Billing mode for --entry-time
    #[arg(long, default_value = "hourly", value_parser = parse_text::<BillingMode>)]
    pub billing: BillingMode,

    /// Output format
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,
}

impl Tabular for CostEstimate {
    const HEADERS: &'static [&'static str] = &["duration", "billable_hours", "estimated_amount"];

    fn display_row(&self) -> Vec<String> {
        vec![
            self.current_duration.clone(),
            self.duration_hours.to_string(),
            self.estimated_amount.to_string(),
        ]
    }
}

impl EstimateCommand {
    /// Execute the estimate command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let settings = load_settings(&config)?;

        let estimate = match (self.plate, self.entry_time) {
            (Some(plate), _) => {
                let mut db = open_database(global, &config)?;
                LifecycleManager::new(&mut db, &settings).estimate_for_plate(&plate)?
            }
            (None, Some(entry_time)) => {
                let now = Utc::now();
                if entry_time > now {
                    return Err(CliError::InvalidArguments(format!(
                        "entry time {} is in the future",
                        entry_time.to_rfc3339()
                    )));
                }
                let bill = compute_amount(entry_time, now, self.billing, &settings.rates);
                CostEstimate {
                    as_of: now,
                    current_duration: format_duration(entry_time, now),
                    duration_hours: bill.duration_hours,
                    estimated_amount: bill.amount,
                }
            }
            (None, None) => {
                return Err(CliError::InvalidArguments(
                    "either --plate or --entry-time is required".to_string(),
                ))
            }
        };

        match self.format {
            None => println!(
                "{} so far ({} billable hours): {}",
                estimate.current_duration, estimate.duration_hours, estimate.estimated_amount
            ),
            Some(_) => print_rows(&[estimate], resolve_format(self.format, &config))?,
        }

        Ok(())
    }
}
