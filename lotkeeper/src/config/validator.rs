//! Configuration validation.
//!
//! Checks run on the merged configuration before any settings are built, so
//! a malformed file fails at startup rather than at the first exit.

use crate::billing::{Amount, RateSlab, RateTable};
use crate::category::VehicleCategory;
use crate::config::schema::{Config, EngineConfig, RatesConfig, ThresholdsByCategory};
use crate::error::{Error, Result};
use crate::overstay::Thresholds;

/// Upper bound on auto-assignment attempts.
pub const MAX_ALLOCATION_ATTEMPTS_LIMIT: u32 = 16;

/// Validates configuration.
///
/// # Examples
///
/// ```
/// use lotkeeper::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::default()).unwrap();
///
/// let bad: Config = serde_yaml::from_str("rates: {day_pass: -1}").unwrap();
/// assert!(ConfigValidator::validate(&bad).is_err());
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for malformed rate or
    /// threshold tables and [`Error::Validation`] for out-of-range limits.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref rates) = config.rates {
            Self::validate_rates(rates)?;
        }

        if let Some(ref overstay) = config.overstay {
            if let Some(ref hourly) = overstay.hourly {
                Self::validate_thresholds("overstay.hourly", hourly)?;
            }
            if let Some(ref day_pass) = overstay.day_pass {
                Self::validate_thresholds("overstay.day_pass", day_pass)?;
            }
        }

        if let Some(ref engine) = config.engine {
            Self::validate_engine(engine)?;
        }

        if let Some(timeout) = config.maximum_lock_wait_seconds {
            if timeout == 0 {
                return Err(Error::Validation {
                    field: "maximum_lock_wait_seconds".into(),
                    message: "Timeout must be greater than 0".into(),
                });
            }
        }

        Ok(())
    }

    fn validate_rates(rates: &RatesConfig) -> Result<()> {
        if let Some(day_pass) = rates.day_pass {
            if day_pass < 0 {
                return Err(Error::InvalidConfiguration {
                    field: "rates.day_pass".into(),
                    message: format!("day pass rate cannot be negative, found {day_pass}"),
                });
            }
        }

        if let Some(ref hourly) = rates.hourly {
            let slabs = hourly
                .iter()
                .map(|s| RateSlab::new(s.min_hours, s.max_hours, s.rate))
                .collect();
            RateTable::new(slabs, Amount::new(rates.day_pass.unwrap_or(0)))?;
        }

        Ok(())
    }

    fn validate_thresholds(prefix: &str, by_category: &ThresholdsByCategory) -> Result<()> {
        for category in VehicleCategory::ALL {
            if let Some(t) = by_category.get(*category) {
                Thresholds::new(t.warning, t.alert, t.critical)
                    .validate(&format!("{prefix}.{category}"))?;
            }
        }
        Ok(())
    }

    fn validate_engine(engine: &EngineConfig) -> Result<()> {
        if engine.transaction_timeout_seconds == Some(0) {
            return Err(Error::Validation {
                field: "engine.transaction_timeout_seconds".into(),
                message: "Timeout must be greater than 0".into(),
            });
        }

        if let Some(attempts) = engine.max_allocation_attempts {
            if attempts == 0 || attempts > MAX_ALLOCATION_ATTEMPTS_LIMIT {
                return Err(Error::Validation {
                    field: "engine.max_allocation_attempts".into(),
                    message: format!(
                        "must be between 1 and {MAX_ALLOCATION_ATTEMPTS_LIMIT}, found {attempts}"
                    ),
                });
            }
        }

        Ok(())
    }
}
