//! Parking slot types.
//!
//! A slot is identified internally by a database row id ([`SlotId`]) and to
//! operators by a human-readable [`SlotNumber`] such as `B1-04`. Allocation of
//! slots to vehicles lives in [`allocator`].

pub mod allocator;

use std::fmt;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::category::{SlotCategory, SlotStatus};
use crate::error::{Error, Result};

/// Longest accepted slot number.
pub const MAX_SLOT_NUMBER_LEN: usize = 32;

/// Storage identifier of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(i64);

impl SlotId {
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

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for SlotId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for SlotId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_i64().map(Self)
    }
}

/// The operator-facing name of a slot, e.g. `B1-04`.
///
/// Slot numbers are uppercased and must be 1 to 32 characters drawn from
/// ASCII letters, digits, `-` and `_`.
///
/// # Examples
///
/// ```
/// use lotkeeper::SlotNumber;
///
/// let number = SlotNumber::parse("b1-04").unwrap();
/// assert_eq!(number.as_str(), "B1-04");
/// assert!(SlotNumber::parse("B1 04").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotNumber(String);

impl SlotNumber {
    /// Validates and uppercases a slot number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the number is empty, longer than
    /// 32 characters, or contains a character outside `[A-Za-z0-9-_]`.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::Validation {
                field: "slot_number".into(),
                message: "slot number cannot be empty".into(),
            });
        }
        if trimmed.len() > MAX_SLOT_NUMBER_LEN {
            return Err(Error::Validation {
                field: "slot_number".into(),
                message: format!("slot number exceeds {MAX_SLOT_NUMBER_LEN} characters"),
            });
        }
        if let Some(bad) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(Error::Validation {
                field: "slot_number".into(),
                message: format!("slot number '{trimmed}' contains invalid character '{bad}'"),
            });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// The slot number text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlotNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SlotNumber {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<SlotNumber> for String {
    fn from(number: SlotNumber) -> Self {
        number.0
    }
}

impl ToSql for SlotNumber {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.as_str()))
    }
}

impl FromSql for SlotNumber {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Self::parse(value.as_str()?).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// A physical parking slot and its current status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParkingSlot {
    /// Storage identifier.
    pub id: SlotId,
    /// Operator-facing name.
    pub number: SlotNumber,
    /// Physical kind of bay.
    pub category: SlotCategory,
    /// Current allocation status.
    pub status: SlotStatus,
}

impl ParkingSlot {
    /// Whether the slot can be claimed right now.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.status == SlotStatus::Available
    }
}
