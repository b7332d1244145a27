//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use lotkeeper::database::{Database, DatabaseConfig};
use lotkeeper::{LicensePlate, SlotCategory, SlotNumber};

/// A database file in a temporary directory that lives as long as the value.
pub struct TestLot {
    _dir: TempDir,
    pub path: PathBuf,
}

impl TestLot {
    /// Creates the database and adds `slots` to it.
    pub fn with_slots(slots: &[(&str, SlotCategory)]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lotkeeper.db");
        let mut db = open(&path);
        for (number, category) in slots {
            db.add_slot(&SlotNumber::parse(number).unwrap(), *category)
                .unwrap();
        }
        Self { _dir: dir, path }
    }

    /// Opens a fresh connection to the lot's database.
    pub fn connect(&self) -> Database {
        open(&self.path)
    }
}

/// Opens a database at `path`, creating it if needed.
pub fn open(path: &Path) -> Database {
    Database::open(DatabaseConfig::new(path)).unwrap()
}

/// 2024-03-01 at `hour:minute` UTC.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, hour, minute, 0).unwrap()
}

/// Parses a plate, panicking on invalid input.
pub fn plate(raw: &str) -> LicensePlate {
    LicensePlate::parse(raw).unwrap()
}

/// Parses a slot number, panicking on invalid input.
pub fn slot(raw: &str) -> SlotNumber {
    SlotNumber::parse(raw).unwrap()
}
