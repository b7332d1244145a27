//! Rate tables.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::Amount;

/// One pricing slab: durations in `(min_hours, max_hours]` pay `rate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSlab {
    /// Exclusive lower bound, in whole hours.
    pub min_hours: u32,
    /// Inclusive upper bound, in whole hours.
    pub max_hours: u32,
    /// Flat charge for any duration in the slab.
    pub rate: Amount,
}

impl RateSlab {
    /// Creates a slab.
    #[must_use]
    pub const fn new(min_hours: u32, max_hours: u32, rate: i64) -> Self {
        Self {
            min_hours,
            max_hours,
            rate: Amount::new(rate),
        }
    }

    /// Whether `hours` falls inside `(min_hours, max_hours]`.
    #[must_use]
    pub const fn contains(&self, hours: u32) -> bool {
        hours > self.min_hours && hours <= self.max_hours
    }
}

/// Validated hourly slabs plus the flat day-pass rate.
///
/// Slabs start at zero, are contiguous, strictly increasing, and carry
/// non-negative rates. The last slab's rate applies to every longer
/// duration.
///
/// # Examples
///
/// ```
/// use lotkeeper::{Amount, RateSlab, RateTable};
///
/// let table = RateTable::new(
///     vec![RateSlab::new(0, 2, 40), RateSlab::new(2, 8, 90)],
///     Amount::new(120),
/// ).unwrap();
/// assert_eq!(table.slab_for(3).map(|s| s.rate), Some(Amount::new(90)));
///
/// // A gap between slabs is rejected.
/// assert!(RateTable::new(
///     vec![RateSlab::new(0, 2, 40), RateSlab::new(3, 8, 90)],
///     Amount::new(120),
/// ).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateTable {
    slabs: Vec<RateSlab>,
    day_pass: Amount,
}

impl RateTable {
    /// Builds a rate table, rejecting malformed slabs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] when the slab list is empty,
    /// does not start at zero, has a gap or overlap, has an empty slab, or
    /// any rate (including the day pass) is negative.
    pub fn new(slabs: Vec<RateSlab>, day_pass: Amount) -> Result<Self> {
        let Some(first) = slabs.first() else {
            return Err(invalid("rates.hourly", "at least one slab is required"));
        };
        if first.min_hours != 0 {
            return Err(invalid(
                "rates.hourly",
                format!("first slab must start at 0 hours, found {}", first.min_hours),
            ));
        }

        for (index, slab) in slabs.iter().enumerate() {
            if slab.max_hours <= slab.min_hours {
                return Err(invalid(
                    "rates.hourly",
                    format!(
                        "slab {index} has max_hours {} not above min_hours {}",
                        slab.max_hours, slab.min_hours
                    ),
                ));
            }
            if slab.rate.units() < 0 {
                return Err(invalid(
                    "rates.hourly",
                    format!("slab {index} has negative rate {}", slab.rate),
                ));
            }
        }

        for (index, pair) in slabs.windows(2).enumerate() {
            if pair[1].min_hours != pair[0].max_hours {
                return Err(invalid(
                    "rates.hourly",
                    format!(
                        "slab {} starts at {} but slab {index} ends at {}; ranges must be contiguous",
                        index + 1,
                        pair[1].min_hours,
                        pair[0].max_hours
                    ),
                ));
            }
        }

        if day_pass.units() < 0 {
            return Err(invalid(
                "rates.day_pass",
                format!("day pass rate cannot be negative, found {day_pass}"),
            ));
        }

        Ok(Self { slabs, day_pass })
    }

    /// The hourly slabs in ascending order.
    #[must_use]
    pub fn slabs(&self) -> &[RateSlab] {
        &self.slabs
    }

    /// The flat day-pass rate.
    #[must_use]
    pub const fn day_pass(&self) -> Amount {
        self.day_pass
    }

    /// The slab whose range contains `hours`, if any.
    #[must_use]
    pub fn slab_for(&self, hours: u32) -> Option<&RateSlab> {
        self.slabs.iter().find(|slab| slab.contains(hours))
    }

    /// The last slab, whose rate caps longer durations.
    #[must_use]
    pub fn cap(&self) -> &RateSlab {
        // Construction guarantees at least one slab.
        &self.slabs[self.slabs.len() - 1]
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self {
            slabs: vec![
                RateSlab::new(0, 1, 50),
                RateSlab::new(1, 3, 100),
                RateSlab::new(3, 6, 150),
                RateSlab::new(6, 24, 200),
            ],
            day_pass: Amount::new(150),
        }
    }
}

fn invalid(field: &str, message: impl Into<String>) -> Error {
    Error::InvalidConfiguration {
        field: field.into(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        let default = RateTable::default();
        let rebuilt = RateTable::new(default.slabs().to_vec(), default.day_pass()).unwrap();
        assert_eq!(rebuilt, default);
        assert_eq!(default.cap().rate, Amount::new(200));
    }

    #[test]
    fn test_slab_boundaries() {
        let table = RateTable::default();
        assert_eq!(table.slab_for(0), None);
        assert_eq!(table.slab_for(1).unwrap().rate, Amount::new(50));
        assert_eq!(table.slab_for(2).unwrap().rate, Amount::new(100));
        assert_eq!(table.slab_for(3).unwrap().rate, Amount::new(100));
        assert_eq!(table.slab_for(4).unwrap().rate, Amount::new(150));
        assert_eq!(table.slab_for(24).unwrap().rate, Amount::new(200));
        assert_eq!(table.slab_for(25), None);
    }

    #[test]
    fn test_rejects_empty() {
        let err = RateTable::new(vec![], Amount::new(100)).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_rejects_nonzero_start() {
        let err = RateTable::new(vec![RateSlab::new(1, 3, 10)], Amount::new(100)).unwrap_err();
        assert!(err.to_string().contains("start at 0"));
    }

    #[test]
    fn test_rejects_overlap() {
        let err = RateTable::new(
            vec![RateSlab::new(0, 3, 10), RateSlab::new(2, 5, 20)],
            Amount::new(100),
        )
        .unwrap_err();
        assert!(err.to_string().contains("contiguous"));
    }

    #[test]
    fn test_rejects_empty_slab() {
        let err = RateTable::new(vec![RateSlab::new(0, 0, 10)], Amount::new(100)).unwrap_err();
        assert!(err.to_string().contains("not above"));
    }

    #[test]
    fn test_rejects_negative_rates() {
        assert!(RateTable::new(vec![RateSlab::new(0, 1, -5)], Amount::new(100)).is_err());
        let err = RateTable::new(vec![RateSlab::new(0, 1, 5)], Amount::new(-1)).unwrap_err();
        assert!(err.to_string().contains("rates.day_pass"));
    }
}
