//! The session lifecycle manager.

use crate::clock::{Clock, SystemClock};
use crate::database::Database;
use crate::error::Result;
use crate::settings::Settings;

/// Orchestrates entry, exit, override and force-end against one database
/// connection.
///
/// Each mutating operation is a single time-bounded transaction: every gating
/// read is made inside it, and every state change is a conditional write
/// whose row count is checked before commit. Several managers on separate
/// connections may work against the same file concurrently.
///
/// # Examples
///
/// ```
/// use lotkeeper::database::Database;
/// use lotkeeper::operations::{EntryOptions, LifecycleManager};
/// use lotkeeper::{LicensePlate, Settings, SlotCategory, SlotNumber, VehicleCategory};
///
/// let mut db = Database::open_in_memory().unwrap();
/// db.add_slot(&SlotNumber::parse("R-01").unwrap(), SlotCategory::Regular).unwrap();
/// let settings = Settings::default();
///
/// let mut manager = LifecycleManager::new(&mut db, &settings);
/// let plate = LicensePlate::parse("KA01AB1234").unwrap();
/// let receipt = manager.enter(&EntryOptions::new(plate.clone(), VehicleCategory::Car)).unwrap();
/// assert_eq!(receipt.slot_number.as_str(), "R-01");
///
/// let bill = manager.exit(&plate).unwrap();
/// assert_eq!(bill.session_id, receipt.session_id);
/// ```
#[derive(Debug)]
pub struct LifecycleManager<'a, C: Clock = SystemClock> {
    pub(super) db: &'a mut Database,
    pub(super) settings: &'a Settings,
    pub(super) clock: C,
}

impl<'a> LifecycleManager<'a> {
    /// Creates a manager reading time from the system clock.
    pub fn new(db: &'a mut Database, settings: &'a Settings) -> Self {
        Self {
            db,
            settings,
            clock: SystemClock,
        }
    }
}

impl<'a, C: Clock> LifecycleManager<'a, C> {
    /// Creates a manager with an explicit clock.
    pub fn with_clock(db: &'a mut Database, settings: &'a Settings, clock: C) -> Self {
        Self { db, settings, clock }
    }

    /// The settings this manager bills and classifies with.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        self.settings
    }

    /// Read access to the underlying database.
    #[must_use]
    pub fn database(&self) -> &Database {
        self.db
    }
}

/// Logs the outcome of a lifecycle operation at the right level.
///
/// Domain rejections are expected and stay at debug.
pub(super) fn note_outcome<T>(operation: &str, result: &Result<T>) {
    match result {
        Ok(_) => {}
        Err(e) if e.is_domain() => log::debug!("{operation} rejected: {e}"),
        Err(e) => log::warn!("{operation} failed: {e}"),
    }
}
