//! Utility functions shared by the CLI commands.
//!
//! Covers locating the data directory, loading configuration, opening the
//! database, parsing operator input, and writing tabular output.

use crate::error::CliError;
use chrono::{DateTime, Local, Utc};
use clap::ValueEnum;
use lotkeeper::config::OutputFormat as ConfigOutputFormat;
use lotkeeper::database::{default_data_dir, DATABASE_FILE};
use lotkeeper::{Config, ConfigBuilder, Database, DatabaseConfig, LicensePlate, Settings, SlotNumber};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds).
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization.
    pub disable_autoinit: bool,
}

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-aligned table (human-readable)
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// TSV format (tab-separated values)
    Tsv,
}

impl From<ConfigOutputFormat> for OutputFormat {
    fn from(format: ConfigOutputFormat) -> Self {
        match format {
            ConfigOutputFormat::Table => Self::Table,
            ConfigOutputFormat::Json => Self::Json,
            ConfigOutputFormat::Csv => Self::Csv,
            ConfigOutputFormat::Tsv => Self::Tsv,
        }
    }
}

/// Picks the `--format` flag, then the configured format, then a table.
pub fn resolve_format(flag: Option<OutputFormat>, config: &Config) -> OutputFormat {
    flag.or_else(|| config.output_format.map(OutputFormat::from))
        .unwrap_or(OutputFormat::Table)
}

/// Resolve the data directory: `--data-dir` (or `LOTKEEPER_DATA_DIR`), else
/// `~/.lotkeeper`.
pub fn resolve_data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match global.data_dir {
        Some(ref dir) => Ok(dir.clone()),
        None => default_data_dir().map_err(|e| CliError::Config(e.to_string())),
    }
}

/// Load layered configuration.
///
/// Sources, lowest to highest precedence:
/// 1. `<data-dir>/config.yaml`
/// 2. `lotkeeper.yaml` found walking up from the working directory
/// 3. `lotkeeper.local.yaml` beside it
/// 4. `LOTKEEPER_*` environment variables
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let data_dir = resolve_data_dir(global)?;

    ConfigBuilder::new()
        .with_data_dir(&data_dir)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Build engine settings from a validated configuration.
pub fn load_settings(config: &Config) -> Result<Settings, CliError> {
    Settings::from_config(config).map_err(|e| CliError::Config(e.to_string()))
}

/// Open the database, creating it unless auto-init is disabled.
///
/// # Errors
///
/// Returns `NoDataDirectory` if the database doesn't exist and auto-init is
/// disabled by flag or configuration.
pub fn open_database(global: &GlobalOptions, config: &Config) -> Result<Database, CliError> {
    let db_path = resolve_data_dir(global)?.join(DATABASE_FILE);
    let disable_autoinit = global.disable_autoinit || config.disable_autoinit.unwrap_or(false);

    if !db_path.exists() && disable_autoinit {
        return Err(CliError::NoDataDirectory);
    }

    let mut db_config = DatabaseConfig::new(db_path);

    if let Some(timeout_seconds) = global.busy_timeout {
        db_config = db_config.with_busy_timeout(Duration::from_secs(timeout_seconds.into()));
    } else if let Some(timeout_seconds) = config.maximum_lock_wait_seconds {
        db_config = db_config.with_busy_timeout(Duration::from_secs(timeout_seconds));
    }

    Database::open(db_config).map_err(CliError::from)
}

/// Clap parser for license plates.
pub fn parse_plate(raw: &str) -> Result<LicensePlate, String> {
    LicensePlate::parse(raw).map_err(|e| e.to_string())
}

/// Clap parser for slot numbers.
pub fn parse_slot_number(raw: &str) -> Result<SlotNumber, String> {
    SlotNumber::parse(raw).map_err(|e| e.to_string())
}

/// Clap parser for the lowercase domain enums (categories, statuses, modes).
pub fn parse_text<T: FromStr<Err = lotkeeper::Error>>(raw: &str) -> Result<T, String> {
    raw.parse().map_err(|e: lotkeeper::Error| e.to_string())
}

/// Format a timestamp in the operator's local time.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// A value that can be printed as one row of a listing.
pub trait Tabular: Serialize {
    /// Column names, lowercase.
    const HEADERS: &'static [&'static str];

    /// Cell values for the table view.
    fn display_row(&self) -> Vec<String>;

    /// Cell values for CSV/TSV; machine-friendly by default.
    fn record(&self) -> Vec<String> {
        self.display_row()
    }
}

/// Write `rows` to stdout in `format`.
pub fn print_rows<T: Tabular>(rows: &[T], format: OutputFormat) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write_rows(&mut handle, rows, format)
}

/// Write `rows` to `out` in `format`.
pub fn write_rows<T: Tabular, W: Write>(
    out: &mut W,
    rows: &[T],
    format: OutputFormat,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Table => write_table(out, rows),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, rows)?;
            writeln!(out)?;
            Ok(())
        }
        OutputFormat::Csv => write_delimited(out, rows, b','),
        OutputFormat::Tsv => write_delimited(out, rows, b'\t'),
    }
}

fn write_table<T: Tabular, W: Write>(out: &mut W, rows: &[T]) -> Result<(), CliError> {
    let cells: Vec<Vec<String>> = rows.iter().map(Tabular::display_row).collect();
    let mut widths: Vec<usize> = T::HEADERS.iter().map(|h| h.len()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = T::HEADERS.iter().map(|h| h.to_uppercase()).collect();
    write_aligned(out, &header, &widths)?;
    for row in &cells {
        write_aligned(out, row, &widths)?;
    }
    Ok(())
}

fn write_aligned<W: Write>(out: &mut W, cells: &[String], widths: &[usize]) -> Result<(), CliError> {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    writeln!(out, "{}", line.trim_end())?;
    Ok(())
}

fn write_delimited<T: Tabular, W: Write>(
    out: &mut W,
    rows: &[T],
    delimiter: u8,
) -> Result<(), CliError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(out);

    writer.write_record(T::HEADERS)?;
    for row in rows {
        writer.write_record(row.record())?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        slot: &'static str,
        status: &'static str,
    }

    impl Tabular for Row {
        const HEADERS: &'static [&'static str] = &["slot", "status"];

        fn display_row(&self) -> Vec<String> {
            vec![self.slot.to_string(), self.status.to_string()]
        }
    }

    fn render(format: OutputFormat) -> String {
        let rows = [
            Row {
                slot: "R-01",
                status: "available",
            },
            Row {
                slot: "EV-10",
                status: "occupied",
            },
        ];
        let mut out = Vec::new();
        write_rows(&mut out, &rows, format).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_table_is_aligned() {
        let text = render(OutputFormat::Table);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "SLOT   STATUS");
        assert_eq!(lines[1], "R-01   available");
        assert_eq!(lines[2], "EV-10  occupied");
    }

    #[test]
    fn test_csv_and_tsv() {
        assert_eq!(
            render(OutputFormat::Csv),
            "slot,status\nR-01,available\nEV-10,occupied\n"
        );
        assert!(render(OutputFormat::Tsv).starts_with("slot\tstatus\n"));
    }

    #[test]
    fn test_json_is_an_array() {
        let value: serde_json::Value = serde_json::from_str(&render(OutputFormat::Json)).unwrap();
        assert_eq!(value[1]["slot"], "EV-10");
    }

    #[test]
    fn test_format_flag_beats_config() {
        let config = Config {
            output_format: Some(ConfigOutputFormat::Csv),
            ..Config::default()
        };
        assert_eq!(resolve_format(None, &config), OutputFormat::Csv);
        assert_eq!(
            resolve_format(Some(OutputFormat::Json), &config),
            OutputFormat::Json
        );
        assert_eq!(resolve_format(None, &Config::default()), OutputFormat::Table);
    }

    #[test]
    fn test_parse_plate_reports_reason() {
        assert_eq!(parse_plate("ka 01").unwrap().as_str(), "KA01");
        assert!(parse_plate("").is_err());
    }
}
