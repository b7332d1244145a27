//! Environment variable handling for configuration overrides.
//!
//! `LOTKEEPER_*` variables override values from every configuration file.

use std::env;
use std::str::FromStr;

use crate::config::schema::{Config, OutputFormat};
use crate::error::{Error, Result};

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use lotkeeper::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Applies every recognised `LOTKEEPER_*` variable to `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the variable when a value cannot
    /// be parsed.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Some(rate) = Self::parse_var::<i64>("LOTKEEPER_DAY_PASS_RATE")? {
            config.rates.get_or_insert_with(Default::default).day_pass = Some(rate);
        }

        if let Some(seconds) = Self::parse_var::<u64>("LOTKEEPER_TRANSACTION_TIMEOUT_SECONDS")? {
            config
                .engine
                .get_or_insert_with(Default::default)
                .transaction_timeout_seconds = Some(seconds);
        }

        if let Some(attempts) = Self::parse_var::<u32>("LOTKEEPER_MAX_ALLOCATION_ATTEMPTS")? {
            config
                .engine
                .get_or_insert_with(Default::default)
                .max_allocation_attempts = Some(attempts);
        }

        if let Some(seconds) = Self::parse_var::<u64>("LOTKEEPER_MAXIMUM_LOCK_WAIT_SECONDS")? {
            config.maximum_lock_wait_seconds = Some(seconds);
        }

        if let Ok(val) = env::var("LOTKEEPER_DISABLE_AUTOINIT") {
            config.disable_autoinit = Some(Self::parse_bool("LOTKEEPER_DISABLE_AUTOINIT", &val)?);
        }

        if let Ok(val) = env::var("LOTKEEPER_OUTPUT_FORMAT") {
            let format = OutputFormat::from_str(&val).map_err(|message| Error::Validation {
                field: "LOTKEEPER_OUTPUT_FORMAT".into(),
                message,
            })?;
            config.output_format = Some(format);
        }

        Ok(())
    }

    fn parse_var<T: FromStr>(name: &str) -> Result<Option<T>> {
        match env::var(name) {
            Ok(raw) => raw.trim().parse().map(Some).map_err(|_| Error::Validation {
                field: name.into(),
                message: format!("'{raw}' is not a valid number"),
            }),
            Err(_) => Ok(None),
        }
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }
}
