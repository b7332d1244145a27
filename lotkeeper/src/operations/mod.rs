//! Session lifecycle operations.
//!
//! [`LifecycleManager`] is the only component that changes slot occupancy or
//! session status. Each of its mutating operations (entry, exit, override,
//! force-end, and the slot administration actions) is one time-bounded
//! transaction that either commits completely or leaves no trace.
//!
//! # Examples
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use lotkeeper::database::Database;
//! use lotkeeper::operations::{EntryOptions, LifecycleManager};
//! use lotkeeper::{Amount, FixedClock, LicensePlate, Settings, SlotCategory, SlotNumber, VehicleCategory};
//!
//! let mut db = Database::open_in_memory().unwrap();
//! db.add_slot(&SlotNumber::parse("R-01").unwrap(), SlotCategory::Regular).unwrap();
//! let settings = Settings::default();
//! let plate = LicensePlate::parse("KA01AB1234").unwrap();
//!
//! let entered = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
//! LifecycleManager::with_clock(&mut db, &settings, FixedClock::new(entered))
//!     .enter(&EntryOptions::new(plate.clone(), VehicleCategory::Car))
//!     .unwrap();
//!
//! let left = entered + Duration::minutes(45);
//! let bill = LifecycleManager::with_clock(&mut db, &settings, FixedClock::new(left))
//!     .exit(&plate)
//!     .unwrap();
//! assert_eq!(bill.billing_amount, Amount::new(50));
//! ```

pub mod admin;
pub mod alerts;
pub mod entry;
pub mod exit;
pub mod lifecycle;
pub mod override_slot;
pub mod verify;

#[cfg(test)]
mod proptests;

pub use alerts::{CostEstimate, OverstayAlert};
pub use entry::{EntryOptions, EntryReceipt};
pub use exit::ExitReceipt;
pub use lifecycle::LifecycleManager;
pub use override_slot::OverrideReceipt;
pub use verify::{verify_invariants, DuplicateActive, InvariantReport, SlotMismatch};
