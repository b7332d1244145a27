#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # lotkeeper
//!
//! Slot allocation and session lifecycle engine for a parking facility.
//!
//! The crate keeps a finite inventory of parking slots in SQLite, admits and
//! releases vehicles through atomic, time-bounded transactions, bills
//! completed sessions from a tiered rate table, and flags sessions that
//! overstay their thresholds.
//!
//! ## Core Types
//!
//! - [`LicensePlate`], [`SlotNumber`]: validated identifiers
//! - [`VehicleCategory`], [`SlotCategory`] and [`compatible_slot_categories`]
//! - [`RateTable`], [`compute_amount`]: tiered billing
//! - [`ThresholdTable`], [`classify`]: overstay detection
//! - [`Settings`]: the immutable pricing and engine configuration
//! - [`LifecycleManager`]: entry, exit, override and force-end
//! - [`Error`] and [`Result`]: error handling types
//!
//! ## Examples
//!
//! ```
//! use lotkeeper::{compatible_slot_categories, LicensePlate, SlotCategory, VehicleCategory};
//!
//! let plate = LicensePlate::parse(" ka-01 ab 1234 ").unwrap();
//! assert_eq!(plate.as_str(), "KA01AB1234");
//!
//! assert_eq!(
//!     compatible_slot_categories(VehicleCategory::ElectricVehicle)[0],
//!     SlotCategory::ElectricCharging
//! );
//! ```

pub mod billing;
pub mod category;
pub mod clock;
pub mod compatibility;
pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod operations;
pub mod overstay;
pub mod session;
pub mod settings;
pub mod slot;
pub mod vehicle;

// Re-export key types at crate root for convenience
pub use billing::{
    billable_hours, compute_amount, format_duration, Amount, BillingBreakdown, RateSlab, RateTable,
};
pub use category::{BillingMode, SessionStatus, Severity, SlotCategory, SlotStatus, VehicleCategory};
pub use clock::{Clock, FixedClock, SystemClock};
pub use compatibility::{compatible_slot_categories, is_compatible, preference_rank};
pub use config::{Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig};
pub use error::{Error, Result};
pub use logging::{init_logger, LogLevel, Logger};
pub use operations::{
    CostEstimate, EntryOptions, EntryReceipt, ExitReceipt, InvariantReport, LifecycleManager,
    OverrideReceipt, OverstayAlert,
};
pub use overstay::{classify, OverstayAssessment, ThresholdTable, Thresholds};
pub use session::{ParkingSession, SessionId};
pub use settings::Settings;
pub use slot::{ParkingSlot, SlotId, SlotNumber};
pub use vehicle::{LicensePlate, Vehicle};
