//! Parking sessions.
//!
//! A session ties one vehicle to one slot from entry to exit. It is created
//! Active, may move between slots while Active, and becomes Completed exactly
//! once. Sessions are never deleted.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::billing::Amount;
use crate::category::{BillingMode, SessionStatus, VehicleCategory};
use crate::slot::{SlotId, SlotNumber};
use crate::vehicle::LicensePlate;

/// Storage identifier of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(i64);

impl SessionId {
    /// Wraps a raw row id.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw row id.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for SessionId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for SessionId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_i64().map(Self)
    }
}

/// A parking session as stored, joined with its vehicle and slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParkingSession {
    /// Storage identifier.
    pub id: SessionId,
    /// Plate of the parked vehicle.
    pub plate: LicensePlate,
    /// Category of the parked vehicle.
    pub vehicle_category: VehicleCategory,
    /// Slot currently (or finally) held.
    pub slot_id: SlotId,
    /// Operator-facing name of that slot.
    pub slot_number: SlotNumber,
    /// When the vehicle entered. Never changed by an override.
    pub entry_time: DateTime<Utc>,
    /// When the vehicle left, once completed.
    pub exit_time: Option<DateTime<Utc>>,
    /// How the session is charged.
    pub billing_mode: BillingMode,
    /// Lifecycle state.
    pub status: SessionStatus,
    /// Final charge, once completed.
    pub billing_amount: Option<Amount>,
}

impl ParkingSession {
    /// Whether the vehicle is still in the facility.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    /// Time parked so far, or in total once completed.
    ///
    /// Negative spans (a clock that moved backwards) are reported as zero.
    #[must_use]
    pub fn elapsed(&self, now: DateTime<Utc>) -> Duration {
        let end = self.exit_time.unwrap_or(now);
        (end - self.entry_time).max(Duration::zero())
    }
}
