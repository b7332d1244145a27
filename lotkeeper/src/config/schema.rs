//! Configuration schema definitions.
//!
//! Every field is optional so that partial files can be layered on top of
//! each other; unset fields fall back to the built-in defaults when
//! [`crate::Settings`] is built.

use serde::{Deserialize, Serialize};

use crate::category::VehicleCategory;

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use lotkeeper::config::Config;
///
/// let yaml = r"
/// rates:
///   hourly:
///     - { min_hours: 0, max_hours: 2, rate: 40 }
///     - { min_hours: 2, max_hours: 24, rate: 120 }
///   day_pass: 200
/// engine:
///   transaction_timeout_seconds: 5
/// ";
/// let config: Config = serde_yaml::from_str(yaml).unwrap();
/// assert_eq!(config.rates.unwrap().day_pass, Some(200));
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Hourly slabs and day-pass rate.
    pub rates: Option<RatesConfig>,

    /// Overstay thresholds.
    pub overstay: Option<OverstayConfig>,

    /// Lifecycle engine limits.
    pub engine: Option<EngineConfig>,

    /// Disable automatic database initialization.
    pub disable_autoinit: Option<bool>,

    /// Maximum time to wait for database lock acquisition (seconds).
    pub maximum_lock_wait_seconds: Option<u64>,

    /// Output format for list commands.
    pub output_format: Option<OutputFormat>,
}

/// Pricing configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RatesConfig {
    /// Hourly slabs, replacing the default table as a whole.
    pub hourly: Option<Vec<SlabConfig>>,
    /// Flat day-pass rate.
    pub day_pass: Option<i64>,
}

/// One hourly slab: `(min_hours, max_hours] -> rate`.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SlabConfig {
    /// Exclusive lower bound in hours.
    pub min_hours: u32,
    /// Inclusive upper bound in hours.
    pub max_hours: u32,
    /// Charge in currency units.
    pub rate: i64,
}

/// Overstay thresholds per billing mode.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OverstayConfig {
    /// Thresholds for hourly sessions.
    pub hourly: Option<ThresholdsByCategory>,
    /// Thresholds for day-pass sessions.
    pub day_pass: Option<ThresholdsByCategory>,
}

/// Thresholds per vehicle category; unset categories keep their defaults.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ThresholdsByCategory {
    /// Cars.
    pub car: Option<ThresholdConfig>,
    /// Bikes.
    pub bike: Option<ThresholdConfig>,
    /// Electric vehicles.
    pub electric_vehicle: Option<ThresholdConfig>,
    /// Vehicles needing accessible bays.
    pub accessible_need: Option<ThresholdConfig>,
}

impl ThresholdsByCategory {
    /// The thresholds configured for `category`, if any.
    #[must_use]
    pub const fn get(&self, category: VehicleCategory) -> Option<&ThresholdConfig> {
        match category {
            VehicleCategory::Car => self.car.as_ref(),
            VehicleCategory::Bike => self.bike.as_ref(),
            VehicleCategory::ElectricVehicle => self.electric_vehicle.as_ref(),
            VehicleCategory::AccessibleNeed => self.accessible_need.as_ref(),
        }
    }

    /// Overlays `other` onto `self`, category by category.
    pub fn overlay(&mut self, other: &Self) {
        if other.car.is_some() {
            self.car = other.car;
        }
        if other.bike.is_some() {
            self.bike = other.bike;
        }
        if other.electric_vehicle.is_some() {
            self.electric_vehicle = other.electric_vehicle;
        }
        if other.accessible_need.is_some() {
            self.accessible_need = other.accessible_need;
        }
    }
}

/// A `(warning, alert, critical)` triple in hours.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ThresholdConfig {
    /// Warning limit.
    pub warning: f64,
    /// Alert limit.
    pub alert: f64,
    /// Critical limit.
    pub critical: f64,
}

/// Lifecycle engine limits.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Wall-clock budget for entry, exit and override transactions.
    pub transaction_timeout_seconds: Option<u64>,
    /// Slots auto-assignment tries before reporting a lost race.
    pub max_allocation_attempts: Option<u32>,
}

/// Output format for list commands.
///
/// # Examples
///
/// ```
/// use lotkeeper::config::OutputFormat;
///
/// let format = OutputFormat::Json;
/// assert_eq!(format.to_string(), "json");
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output format.
    Json,
    /// CSV output format.
    Csv,
    /// TSV output format.
    Tsv,
    /// Human-readable table format.
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Tsv => write!(f, "tsv"),
            Self::Table => write!(f, "table"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "table" => Ok(Self::Table),
            _ => Err(format!(
                "invalid output format '{s}' (expected json, csv, tsv or table)"
            )),
        }
    }
}
