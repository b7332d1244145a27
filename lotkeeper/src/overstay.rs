//! Overstay classification.
//!
//! Every `(billing mode, vehicle category)` pair has a triple of increasing
//! hour thresholds. A session whose elapsed time has crossed one of them is
//! reported at the highest severity crossed, together with how far past that
//! threshold it is and what it would cost to leave now.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::billing::{compute_amount, Amount, RateTable};
use crate::category::{BillingMode, Severity, VehicleCategory};
use crate::error::{Error, Result};

/// Warning, alert and critical limits in hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Hours after which a session is reported as a warning.
    pub warning: f64,
    /// Hours after which a session is reported as an alert.
    pub alert: f64,
    /// Hours after which a session is reported as critical.
    pub critical: f64,
}

impl Thresholds {
    /// Creates a threshold triple without validating it.
    #[must_use]
    pub const fn new(warning: f64, alert: f64, critical: f64) -> Self {
        Self {
            warning,
            alert,
            critical,
        }
    }

    /// Checks that every limit is positive, finite and strictly increasing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming `field` otherwise.
    pub fn validate(&self, field: &str) -> Result<()> {
        for (name, value) in [
            ("warning", self.warning),
            ("alert", self.alert),
            ("critical", self.critical),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfiguration {
                    field: format!("{field}.{name}"),
                    message: format!("threshold must be a positive number of hours, found {value}"),
                });
            }
        }
        if !(self.warning < self.alert && self.alert < self.critical) {
            return Err(Error::InvalidConfiguration {
                field: field.into(),
                message: format!(
                    "thresholds must increase strictly (warning {} < alert {} < critical {})",
                    self.warning, self.alert, self.critical
                ),
            });
        }
        Ok(())
    }

    /// The highest severity crossed after `elapsed_hours`, with its limit.
    #[must_use]
    pub fn crossed(&self, elapsed_hours: f64) -> Option<(Severity, f64)> {
        if elapsed_hours >= self.critical {
            Some((Severity::Critical, self.critical))
        } else if elapsed_hours >= self.alert {
            Some((Severity::Alert, self.alert))
        } else if elapsed_hours >= self.warning {
            Some((Severity::Warning, self.warning))
        } else {
            None
        }
    }
}

/// Thresholds for every billing mode and vehicle category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdTable {
    entries: BTreeMap<(BillingMode, VehicleCategory), Thresholds>,
}

impl ThresholdTable {
    /// The thresholds for one pair.
    #[must_use]
    pub fn get(&self, mode: BillingMode, category: VehicleCategory) -> Thresholds {
        self.entries
            .get(&(mode, category))
            .copied()
            .unwrap_or_else(|| default_thresholds(mode, category))
    }

    /// Replaces the thresholds for one pair after validating them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the triple is malformed.
    pub fn set(
        &mut self,
        mode: BillingMode,
        category: VehicleCategory,
        thresholds: Thresholds,
    ) -> Result<()> {
        thresholds.validate(&format!("overstay.{mode}.{category}"))?;
        self.entries.insert((mode, category), thresholds);
        Ok(())
    }

    /// Iterates every pair in mode then category order.
    pub fn iter(&self) -> impl Iterator<Item = (BillingMode, VehicleCategory, Thresholds)> + '_ {
        self.entries.iter().map(|((m, c), t)| (*m, *c, *t))
    }
}

impl Default for ThresholdTable {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        for mode in BillingMode::ALL {
            for category in VehicleCategory::ALL {
                entries.insert((*mode, *category), default_thresholds(*mode, *category));
            }
        }
        Self { entries }
    }
}

fn default_thresholds(mode: BillingMode, category: VehicleCategory) -> Thresholds {
    match (mode, category) {
        (BillingMode::Hourly, VehicleCategory::Car | VehicleCategory::Bike) => {
            Thresholds::new(6.0, 8.0, 12.0)
        }
        (BillingMode::Hourly, VehicleCategory::ElectricVehicle) => Thresholds::new(4.0, 6.0, 8.0),
        (BillingMode::Hourly, VehicleCategory::AccessibleNeed) => Thresholds::new(8.0, 10.0, 14.0),
        (BillingMode::DayPass, _) => Thresholds::new(24.0, 30.0, 36.0),
    }
}

/// A session that has crossed at least one threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverstayAssessment {
    /// Highest severity crossed.
    pub severity: Severity,
    /// Real-valued hours since entry.
    pub elapsed_hours: f64,
    /// Hours past the crossed threshold.
    pub overstay_hours: f64,
    /// What the session would be charged if it ended now.
    pub estimated_cost: Amount,
}

/// Classifies one session.
///
/// Returns `None` while the session is inside its warning threshold. Pure;
/// reads nothing but its arguments.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, TimeZone, Utc};
/// use lotkeeper::{classify, BillingMode, RateTable, Severity, ThresholdTable, VehicleCategory};
///
/// let entry = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
/// let now = entry + Duration::hours(9);
/// let found = classify(
///     entry,
///     now,
///     BillingMode::Hourly,
///     VehicleCategory::Car,
///     &ThresholdTable::default(),
///     &RateTable::default(),
/// )
/// .unwrap();
/// assert_eq!(found.severity, Severity::Alert);
/// assert!((found.overstay_hours - 1.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn classify(
    entry: DateTime<Utc>,
    now: DateTime<Utc>,
    mode: BillingMode,
    category: VehicleCategory,
    thresholds: &ThresholdTable,
    rates: &RateTable,
) -> Option<OverstayAssessment> {
    let elapsed_hours = elapsed_hours(entry, now);
    let (severity, limit) = thresholds.get(mode, category).crossed(elapsed_hours)?;
    Some(OverstayAssessment {
        severity,
        elapsed_hours,
        overstay_hours: elapsed_hours - limit,
        estimated_cost: compute_amount(entry, now, mode, rates).amount,
    })
}

#[allow(clippy::cast_precision_loss)]
fn elapsed_hours(entry: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (now - entry).num_milliseconds().max(0);
    millis as f64 / 3_600_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn entry() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap()
    }

    fn run(hours_minutes: (i64, i64), mode: BillingMode, category: VehicleCategory) -> Option<OverstayAssessment> {
        let now = entry() + Duration::hours(hours_minutes.0) + Duration::minutes(hours_minutes.1);
        classify(
            entry(),
            now,
            mode,
            category,
            &ThresholdTable::default(),
            &RateTable::default(),
        )
    }

    #[test]
    fn test_under_warning_is_none() {
        assert!(run((5, 59), BillingMode::Hourly, VehicleCategory::Car).is_none());
    }

    #[test]
    fn test_exact_threshold_counts() {
        let found = run((6, 0), BillingMode::Hourly, VehicleCategory::Car).unwrap();
        assert_eq!(found.severity, Severity::Warning);
        assert!(found.overstay_hours.abs() < 1e-9);
    }

    #[test]
    fn test_nine_hours_car_is_alert() {
        let found = run((9, 0), BillingMode::Hourly, VehicleCategory::Car).unwrap();
        assert_eq!(found.severity, Severity::Alert);
        assert!((found.overstay_hours - 1.0).abs() < 1e-9);
        assert_eq!(found.estimated_cost, Amount::new(200));
    }

    #[test]
    fn test_critical_wins() {
        let found = run((13, 30), BillingMode::Hourly, VehicleCategory::Bike).unwrap();
        assert_eq!(found.severity, Severity::Critical);
        assert!((found.overstay_hours - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_ev_thresholds_are_tighter() {
        let found = run((5, 0), BillingMode::Hourly, VehicleCategory::ElectricVehicle).unwrap();
        assert_eq!(found.severity, Severity::Warning);
    }

    #[test]
    fn test_day_pass_thresholds() {
        assert!(run((23, 0), BillingMode::DayPass, VehicleCategory::Car).is_none());
        let found = run((31, 0), BillingMode::DayPass, VehicleCategory::Car).unwrap();
        assert_eq!(found.severity, Severity::Alert);
        assert_eq!(found.estimated_cost, Amount::new(150));
    }

    #[test]
    fn test_set_validates() {
        let mut table = ThresholdTable::default();
        let err = table
            .set(
                BillingMode::Hourly,
                VehicleCategory::Car,
                Thresholds::new(6.0, 6.0, 12.0),
            )
            .unwrap_err();
        assert!(err.to_string().contains("overstay.hourly.car"));

        table
            .set(
                BillingMode::Hourly,
                VehicleCategory::Car,
                Thresholds::new(1.0, 2.0, 3.0),
            )
            .unwrap();
        assert_eq!(
            table.get(BillingMode::Hourly, VehicleCategory::Car),
            Thresholds::new(1.0, 2.0, 3.0)
        );
    }

    #[test]
    fn test_validate_rejects_non_positive() {
        let err = Thresholds::new(0.0, 1.0, 2.0).validate("x").unwrap_err();
        assert!(err.to_string().contains("x.warning"));
        assert!(Thresholds::new(f64::NAN, 1.0, 2.0).validate("x").is_err());
    }

    #[test]
    fn test_default_table_covers_every_pair() {
        assert_eq!(ThresholdTable::default().iter().count(), 8);
    }
}
