//! Shared helpers for database unit tests.

use tempfile::tempdir;

use crate::category::SlotCategory;
use crate::database::{Database, DatabaseConfig};
use crate::slot::{ParkingSlot, SlotNumber};

/// Opens a file-backed database in a temporary directory.
///
/// # Panics
///
/// Panics if the directory or database cannot be created.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let db = Database::open(DatabaseConfig::new(dir.path().join("test.db"))).unwrap();

    // Keep the directory alive for the life of the test process.
    std::mem::forget(dir);

    db
}

/// Adds a slot to the inventory.
///
/// # Panics
///
/// Panics if the number is invalid or already taken.
pub fn add_slot(db: &mut Database, number: &str, category: SlotCategory) -> ParkingSlot {
    let number = SlotNumber::parse(number).unwrap();
    db.add_slot(&number, category).unwrap()
}
