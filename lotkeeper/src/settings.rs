//! Immutable engine settings.
//!
//! [`Settings`] is built once, from a validated [`Config`], and passed by
//! reference into the lifecycle manager. Nothing in the engine reads pricing
//! or thresholds from anywhere else.

use std::time::Duration;

use crate::billing::{Amount, RateSlab, RateTable};
use crate::category::{BillingMode, VehicleCategory};
use crate::config::Config;
use crate::error::Result;
use crate::overstay::{ThresholdTable, Thresholds};

/// Default wall-clock budget for one lifecycle transaction.
pub const DEFAULT_TRANSACTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of slots auto-assignment may try before giving up.
pub const DEFAULT_MAX_ALLOCATION_ATTEMPTS: u32 = 2;

/// Pricing, thresholds and engine limits.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Hourly slabs and the day-pass rate.
    pub rates: RateTable,
    /// Overstay thresholds per billing mode and vehicle category.
    pub thresholds: ThresholdTable,
    /// Budget after which a lifecycle transaction is rolled back.
    pub transaction_timeout: Duration,
    /// Slots auto-assignment tries when it loses races.
    pub max_allocation_attempts: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rates: RateTable::default(),
            thresholds: ThresholdTable::default(),
            transaction_timeout: DEFAULT_TRANSACTION_TIMEOUT,
            max_allocation_attempts: DEFAULT_MAX_ALLOCATION_ATTEMPTS,
        }
    }
}

impl Settings {
    /// Builds settings from a configuration, filling unset fields with
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidConfiguration`] when the rate table or
    /// any threshold triple is malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// use lotkeeper::{config::Config, Amount, Settings};
    ///
    /// let config: Config = serde_yaml::from_str("rates:\n  day_pass: 300\n").unwrap();
    /// let settings = Settings::from_config(&config).unwrap();
    /// assert_eq!(settings.rates.day_pass(), Amount::new(300));
    /// ```
    pub fn from_config(config: &Config) -> Result<Self> {
        let defaults = Self::default();

        let rates = match &config.rates {
            Some(rates) => {
                let slabs = match &rates.hourly {
                    Some(slabs) => slabs
                        .iter()
                        .map(|s| RateSlab::new(s.min_hours, s.max_hours, s.rate))
                        .collect(),
                    None => defaults.rates.slabs().to_vec(),
                };
                let day_pass = rates
                    .day_pass
                    .map_or(defaults.rates.day_pass(), Amount::new);
                RateTable::new(slabs, day_pass)?
            }
            None => defaults.rates,
        };

        let mut thresholds = defaults.thresholds;
        if let Some(overstay) = &config.overstay {
            for (mode, by_category) in [
                (BillingMode::Hourly, &overstay.hourly),
                (BillingMode::DayPass, &overstay.day_pass),
            ] {
                let Some(by_category) = by_category else {
                    continue;
                };
                for category in VehicleCategory::ALL {
                    if let Some(t) = by_category.get(*category) {
                        thresholds.set(
                            mode,
                            *category,
                            Thresholds::new(t.warning, t.alert, t.critical),
                        )?;
                    }
                }
            }
        }

        let engine = config.engine.as_ref();
        let transaction_timeout = engine
            .and_then(|e| e.transaction_timeout_seconds)
            .map_or(defaults.transaction_timeout, Duration::from_secs);
        let max_allocation_attempts = engine
            .and_then(|e| e.max_allocation_attempts)
            .unwrap_or(defaults.max_allocation_attempts);

        Ok(Self {
            rates,
            thresholds,
            transaction_timeout,
            max_allocation_attempts,
        })
    }
}
