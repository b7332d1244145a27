//! Property-based tests for configuration merging and validation.

use super::merger::ConfigMerger;
use super::schema::{Config, EngineConfig, RatesConfig, SlabConfig};
use super::validator::ConfigValidator;
use proptest::prelude::*;

// Contiguous slabs starting at zero with non-negative rates.
fn slabs_strategy() -> impl Strategy<Value = Vec<SlabConfig>> {
    prop::collection::vec((1u32..=12, 0i64..=500), 1..=6).prop_map(|widths| {
        let mut start = 0;
        widths
            .into_iter()
            .map(|(width, rate)| {
                let slab = SlabConfig {
                    min_hours: start,
                    max_hours: start + width,
                    rate,
                };
                start += width;
                slab
            })
            .collect()
    })
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(slabs_strategy()),
        prop::option::of(0i64..=1000),
        prop::option::of(1u64..=60),
        prop::option::of(1u32..=16),
        prop::option::of(1u64..=30),
    )
        .prop_map(|(hourly, day_pass, timeout, attempts, lock_wait)| Config {
            rates: Some(RatesConfig { hourly, day_pass }),
            engine: Some(EngineConfig {
                transaction_timeout_seconds: timeout,
                max_allocation_attempts: attempts,
            }),
            maximum_lock_wait_seconds: lock_wait,
            ..Default::default()
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 1000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn generated_configs_validate(config in config_strategy()) {
        prop_assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn merge_higher_precedence_wins(low in config_strategy(), high in config_strategy()) {
        let mut result = low.clone();
        ConfigMerger::merge_into(&mut result, &high);

        let low_rates = low.rates.unwrap_or_default();
        let high_rates = high.rates.unwrap_or_default();
        let rates = result.rates.clone().unwrap_or_default();
        prop_assert_eq!(rates.hourly, high_rates.hourly.or(low_rates.hourly));
        prop_assert_eq!(rates.day_pass, high_rates.day_pass.or(low_rates.day_pass));
        prop_assert_eq!(
            result.maximum_lock_wait_seconds,
            high.maximum_lock_wait_seconds.or(low.maximum_lock_wait_seconds)
        );
    }

    #[test]
    fn merge_of_valid_configs_stays_valid(low in config_strategy(), high in config_strategy()) {
        let mut result = low;
        ConfigMerger::merge_into(&mut result, &high);
        prop_assert!(ConfigValidator::validate(&result).is_ok());
    }

    #[test]
    fn merge_with_default_is_identity(config in config_strategy()) {
        let mut result = config.clone();
        ConfigMerger::merge_into(&mut result, &Config::default());
        prop_assert_eq!(result, config);
    }
}
