//! SQLite persistence for slots, vehicles and sessions.
//!
//! All lifecycle writes go through [`Database::with_transaction`], and the
//! per-table helpers take a plain `&Connection` so they can be composed
//! inside one transaction. Timestamps are stored as epoch milliseconds.
//!
//! # Examples
//!
//! ```
//! use lotkeeper::database::Database;
//! use lotkeeper::{SlotCategory, SlotNumber};
//!
//! let mut db = Database::open_in_memory().unwrap();
//! let number = SlotNumber::parse("B1-04").unwrap();
//! let slot = db.add_slot(&number, SlotCategory::Compact).unwrap();
//! assert!(slot.is_available());
//!
//! let occupancy = Database::occupancy(db.connection()).unwrap();
//! assert_eq!(occupancy.total, 1);
//! ```

mod config;
mod connection;
pub mod migrations;
mod schema;
mod sessions;
mod slots;
mod transaction;
mod vehicles;

#[cfg(test)]
pub(crate) mod test_util;

use chrono::{DateTime, Utc};

pub use config::{
    default_data_dir, resolve_data_dir, resolve_database_path, DatabaseConfig, DATABASE_FILE,
};
pub use connection::Database;
pub use slots::{CategoryOccupancy, OccupancySnapshot};

pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};

pub(crate) fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

pub(crate) fn from_millis(millis: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or(rusqlite::Error::IntegralValueOutOfRange(0, millis))
}
