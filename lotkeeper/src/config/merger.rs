//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::{Config, EngineConfig, OverstayConfig, RatesConfig};

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use lotkeeper::config::{Config, ConfigMerger};
///
/// let low = Config { maximum_lock_wait_seconds: Some(5), ..Default::default() };
/// let high = Config { maximum_lock_wait_seconds: Some(9), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.maximum_lock_wait_seconds, Some(9));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merges sources given lowest precedence first.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merges `source` into `target`; set fields in `source` win.
    ///
    /// # Merging Rules
    ///
    /// - Scalar fields: source overwrites if Some
    /// - Hourly slabs: replaced as a whole, never spliced
    /// - Thresholds: per billing mode, per vehicle category
    /// - Engine limits: field by field
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.disable_autoinit.is_some() {
            target.disable_autoinit = source.disable_autoinit;
        }

        if source.maximum_lock_wait_seconds.is_some() {
            target.maximum_lock_wait_seconds = source.maximum_lock_wait_seconds;
        }

        if source.output_format.is_some() {
            target.output_format = source.output_format;
        }

        if let Some(ref source_rates) = source.rates {
            let rates = target.rates.get_or_insert_with(RatesConfig::default);
            Self::merge_rates(rates, source_rates);
        }

        if let Some(ref source_overstay) = source.overstay {
            let overstay = target.overstay.get_or_insert_with(OverstayConfig::default);
            Self::merge_overstay(overstay, source_overstay);
        }

        if let Some(ref source_engine) = source.engine {
            let engine = target.engine.get_or_insert_with(EngineConfig::default);
            Self::merge_engine(engine, source_engine);
        }
    }

    fn merge_rates(target: &mut RatesConfig, source: &RatesConfig) {
        if source.hourly.is_some() {
            target.hourly.clone_from(&source.hourly);
        }
        if source.day_pass.is_some() {
            target.day_pass = source.day_pass;
        }
    }

    fn merge_overstay(target: &mut OverstayConfig, source: &OverstayConfig) {
        if let Some(ref hourly) = source.hourly {
            target.hourly.get_or_insert_with(Default::default).overlay(hourly);
        }
        if let Some(ref day_pass) = source.day_pass {
            target.day_pass.get_or_insert_with(Default::default).overlay(day_pass);
        }
    }

    fn merge_engine(target: &mut EngineConfig, source: &EngineConfig) {
        target.transaction_timeout_seconds = source
            .transaction_timeout_seconds
            .or(target.transaction_timeout_seconds);
        target.max_allocation_attempts = source
            .max_allocation_attempts
            .or(target.max_allocation_attempts);
    }
}
