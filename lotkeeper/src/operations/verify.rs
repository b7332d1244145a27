//! Consistency checks between slot inventory and sessions.

use rusqlite::Connection;
use serde::Serialize;

use crate::category::SlotStatus;
use crate::clock::Clock;
use crate::database::Database;
use crate::error::Result;

use super::lifecycle::LifecycleManager;

/// A slot whose status disagrees with the sessions pointing at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotMismatch {
    /// The slot.
    pub slot_number: String,
    /// Its stored status.
    pub status: SlotStatus,
    /// How many Active sessions reference it.
    pub active_sessions: i64,
}

/// A vehicle holding more than one Active session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateActive {
    /// The vehicle.
    pub plate: String,
    /// Its Active session count.
    pub active_sessions: i64,
}

/// Everything found by [`verify_invariants`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvariantReport {
    /// Slots Occupied without exactly one Active session, or not Occupied
    /// with one.
    pub slot_mismatches: Vec<SlotMismatch>,
    /// Vehicles with several Active sessions.
    pub duplicate_active: Vec<DuplicateActive>,
}

impl InvariantReport {
    /// True when nothing was found.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.slot_mismatches.is_empty() && self.duplicate_active.is_empty()
    }
}

/// Checks that every slot is Occupied iff exactly one Active session points
/// at it, and that no vehicle has two Active sessions.
///
/// # Errors
///
/// Returns an error if the queries fail.
///
/// # Examples
///
/// ```
/// use lotkeeper::database::Database;
/// use lotkeeper::operations::verify_invariants;
///
/// let db = Database::open_in_memory().unwrap();
/// assert!(verify_invariants(db.connection()).unwrap().is_clean());
/// ```
pub fn verify_invariants(conn: &Connection) -> Result<InvariantReport> {
    let slot_mismatches = Database::slot_occupancy_mismatches(conn)?
        .into_iter()
        .map(|(slot_number, status, active_sessions)| SlotMismatch {
            slot_number,
            status,
            active_sessions,
        })
        .collect();
    let duplicate_active = Database::plates_with_multiple_active(conn)?
        .into_iter()
        .map(|(plate, active_sessions)| DuplicateActive {
            plate,
            active_sessions,
        })
        .collect();

    let report = InvariantReport {
        slot_mismatches,
        duplicate_active,
    };
    if !report.is_clean() {
        log::warn!(
            "invariant check found {} slot mismatch(es) and {} duplicate active vehicle(s)",
            report.slot_mismatches.len(),
            report.duplicate_active.len()
        );
    }
    Ok(report)
}

impl<C: Clock> LifecycleManager<'_, C> {
    /// Runs [`verify_invariants`] and the SQLite integrity check.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::DatabaseCorruption`] if the file fails its
    /// integrity check, or a query error.
    pub fn verify(&self) -> Result<InvariantReport> {
        self.db.verify_integrity()?;
        verify_invariants(self.db.connection())
    }
}
