//! Vehicles and license plates.

use std::fmt;

use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::category::VehicleCategory;
use crate::error::{Error, Result};

/// Longest accepted plate after normalization.
pub const MAX_PLATE_LEN: usize = 15;

/// A normalized license plate.
///
/// Plates are trimmed, uppercased, and stripped of spaces and hyphens, so
/// `"ka 01-ab 1234"` and `"KA01AB1234"` name the same vehicle. The result must
/// be 1 to 15 ASCII letters and digits.
///
/// # Examples
///
/// ```
/// use lotkeeper::LicensePlate;
///
/// let plate = LicensePlate::parse(" ka-01 ab 1234 ").unwrap();
/// assert_eq!(plate.as_str(), "KA01AB1234");
///
/// assert!(LicensePlate::parse("").is_err());
/// assert!(LicensePlate::parse("KA01/1234").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LicensePlate(String);

impl LicensePlate {
    /// Normalizes and validates a raw plate string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the normalized plate is empty, too
    /// long, or contains anything other than ASCII letters and digits.
    pub fn parse(raw: &str) -> Result<Self> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-'))
            .map(|c| c.to_ascii_uppercase())
            .collect();

        if normalized.is_empty() {
            return Err(Error::Validation {
                field: "plate".into(),
                message: "license plate cannot be empty".into(),
            });
        }
        if normalized.len() > MAX_PLATE_LEN {
            return Err(Error::Validation {
                field: "plate".into(),
                message: format!(
                    "license plate '{normalized}' exceeds {MAX_PLATE_LEN} characters"
                ),
            });
        }
        if let Some(bad) = normalized.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(Error::Validation {
                field: "plate".into(),
                message: format!("license plate '{raw}' contains invalid character '{bad}'"),
            });
        }

        Ok(Self(normalized))
    }

    /// The normalized plate text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LicensePlate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LicensePlate {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<LicensePlate> for String {
    fn from(plate: LicensePlate) -> Self {
        plate.0
    }
}

impl ToSql for LicensePlate {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.as_str()))
    }
}

impl FromSql for LicensePlate {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Self::parse(value.as_str()?).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// A vehicle known to the facility.
///
/// Vehicles are created the first time they enter and are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vehicle {
    /// Normalized plate; the vehicle's identity.
    pub plate: LicensePlate,
    /// Category recorded at the most recent entry.
    pub category: VehicleCategory,
    /// When the vehicle was first seen.
    pub registered_at: DateTime<Utc>,
}
