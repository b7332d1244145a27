//! Alerts command implementation.

use crate::error::CliError;
use crate::utils::{
    format_timestamp, load_configuration, load_settings, open_database, parse_text, print_rows,
    resolve_format, GlobalOptions, OutputFormat, Tabular,
};
use clap::Args;
use lotkeeper::{LifecycleManager, OverstayAlert, Severity};

/// List active sessions past their overstay thresholds, most urgent first.
#[derive(Args)]
pub struct AlertsCommand {
    /// Only alerts at or above this severity (warning, alert, critical)
    #[arg(long, value_parser = parse_text::<Severity>)]
    pub min_severity: Option<Severity>,

    /// Output format
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,
}

impl Tabular for OverstayAlert {
    const HEADERS: &'static [&'static str] = &[
        "session",
        "plate",
        "category",
        "slot",
        "severity",
        "entry_time",
        "overstay_hours",
        "estimated_cost",
    ];

    fn display_row(&self) -> Vec<String> {
        vec![
            self.session_id.to_string(),
            self.plate.to_string(),
            self.vehicle_category.to_string(),
            self.slot_number.to_string(),
            self.severity.to_string(),
            format_timestamp(self.entry_time),
            format!("{:.1}", self.overstay_hours),
            self.estimated_cost.to_string(),
        ]
    }

    fn record(&self) -> Vec<String> {
        let mut row = self.display_row();
        row[5] = self.entry_time.to_rfc3339();
        row[6] = format!("{:.3}", self.overstay_hours);
        row
    }
}

impl AlertsCommand {
    /// Execute the alerts command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let settings = load_settings(&config)?;
        let mut db = open_database(global, &config)?;

        let mut alerts = LifecycleManager::new(&mut db, &settings).overstay_alerts()?;
        if let Some(min) = self.min_severity {
            alerts.retain(|a| a.severity >= min);
        }

        print_rows(&alerts, resolve_format(self.format, &config))
    }
}
