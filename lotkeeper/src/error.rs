//! Error types for the lotkeeper library.
//!
//! Every business outcome the engine can refuse with (a vehicle already
//! parked, a slot lost to a concurrent entry, an incompatible override target)
//! is a typed variant here, carrying enough context for its `Display` output
//! to be shown to an operator verbatim. Storage and configuration faults share
//! the same enum so callers can propagate everything with `?`.

use std::path::PathBuf;

use thiserror::Error;

use crate::category::{SlotCategory, SlotStatus, VehicleCategory};

/// Result type alias for operations that may fail with a lotkeeper error.
///
/// # Examples
///
/// ```
/// use lotkeeper::{Error, Result};
///
/// fn example_operation() -> Result<i64> {
///     Ok(42)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the lotkeeper library.
#[derive(Debug, Error)]
pub enum Error {
    /// The vehicle already has an active session.
    #[error("vehicle {plate} is already parked in slot {slot_number}")]
    AlreadyParked {
        /// Normalized plate of the vehicle.
        plate: String,
        /// Slot the active session occupies.
        slot_number: String,
    },

    /// The vehicle has no active session.
    #[error("vehicle {plate} is not currently parked")]
    NotParked {
        /// Normalized plate of the vehicle.
        plate: String,
    },

    /// No compatible slot is available for the vehicle category.
    #[error("no {category} compatible slot is available")]
    NoSlotsAvailable {
        /// The vehicle category that could not be placed.
        category: VehicleCategory,
    },

    /// The slot was claimed by a concurrent transaction.
    #[error("slot {slot_number} is no longer available; it was taken by another entry")]
    SlotNoLongerAvailable {
        /// The slot that was lost.
        slot_number: String,
    },

    /// The target slot is occupied or under maintenance.
    #[error("slot {slot_number} is unavailable (currently {status})")]
    SlotUnavailable {
        /// The slot that was requested.
        slot_number: String,
        /// Its status at the time of the check.
        status: SlotStatus,
    },

    /// The slot category does not accept the vehicle category.
    #[error("slot {slot_number} ({slot_category}) cannot accept a {vehicle_category}")]
    IncompatibleSlot {
        /// The slot that was requested.
        slot_number: String,
        /// Category of that slot.
        slot_category: SlotCategory,
        /// Category of the vehicle.
        vehicle_category: VehicleCategory,
    },

    /// An override targeted the slot the session already occupies.
    #[error("session is already in slot {slot_number}")]
    SameSlot {
        /// The slot in question.
        slot_number: String,
    },

    /// Slot inventory and session state disagree.
    #[error("inconsistent state: {details}")]
    InvalidState {
        /// What was found to be inconsistent.
        details: String,
    },

    /// A lifecycle transaction exceeded its wall-clock budget and was rolled back.
    #[error("transaction timed out after {millis}ms and was rolled back; retry the operation")]
    TransactionTimeout {
        /// How long the transaction waited or ran before giving up, in milliseconds.
        millis: u64,
    },

    /// A rate or threshold table is malformed.
    #[error("invalid configuration for '{field}': {message}")]
    InvalidConfiguration {
        /// The configuration field at fault.
        field: String,
        /// A description of the problem.
        message: String,
    },

    /// A configuration file could not be parsed.
    #[error("configuration error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// The data directory was not found and auto-initialization is disabled.
    #[error("data directory not found: {}", path.display())]
    DataDirectoryNotFound {
        /// The expected path to the data directory.
        path: PathBuf,
    },

    /// Database corruption was detected.
    #[error("database corruption detected: {details}")]
    DatabaseCorruption {
        /// Details about the corruption.
        details: String,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: i32,
        /// The schema version found in the database.
        found: i32,
    },
}

impl Error {
    /// Whether this error is an expected business outcome rather than a fault.
    ///
    /// Domain errors are returned to callers as ordinary results; they should
    /// never be logged as failures.
    ///
    /// # Examples
    ///
    /// ```
    /// use lotkeeper::Error;
    ///
    /// let err = Error::NotParked { plate: "KA01AB1234".into() };
    /// assert!(err.is_domain());
    ///
    /// let err = Error::DatabaseCorruption { details: "bad page".into() };
    /// assert!(!err.is_domain());
    /// ```
    #[must_use]
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            Self::AlreadyParked { .. }
                | Self::NotParked { .. }
                | Self::NoSlotsAvailable { .. }
                | Self::SlotNoLongerAvailable { .. }
                | Self::SlotUnavailable { .. }
                | Self::IncompatibleSlot { .. }
                | Self::SameSlot { .. }
                | Self::InvalidState { .. }
                | Self::TransactionTimeout { .. }
        )
    }

    /// Whether retrying the same request may succeed.
    ///
    /// # Examples
    ///
    /// ```
    /// use lotkeeper::Error;
    ///
    /// assert!(Error::TransactionTimeout { millis: 10_000 }.is_retryable());
    /// assert!(!Error::SameSlot { slot_number: "A-01".into() }.is_retryable());
    /// ```
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::TransactionTimeout { .. } | Self::SlotNoLongerAvailable { .. }
        )
    }

    /// Whether the underlying SQLite error means the store was locked by
    /// another writer.
    pub(crate) fn is_lock_contention(&self) -> bool {
        match self {
            Self::Database(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}
