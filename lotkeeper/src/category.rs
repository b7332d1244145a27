//! Closed enumerations for the parking domain.
//!
//! Vehicle and slot categories, slot and session statuses, billing modes and
//! overstay severities are all stored as lowercase snake_case text in the
//! database and in configuration files. Each type here round-trips through
//! that text form via `Display`/`FromStr`, serde, and rusqlite's
//! `ToSql`/`FromSql`.

use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::error::Error;

macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The stable text form used in storage and configuration.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
                match normalized.as_str() {
                    $( $text => Ok(Self::$variant), )+
                    _ => Err(Error::Validation {
                        field: $field.into(),
                        message: format!(
                            "unknown value '{s}' (expected one of: {})",
                            [$($text),+].join(", ")
                        ),
                    }),
                }
            }
        }

        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let text = value.as_str()?;
                text.parse().map_err(|e: Error| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

text_enum! {
    /// The kind of vehicle presented at entry.
    VehicleCategory, "vehicle_category" {
        /// A standard passenger car.
        Car => "car",
        /// A two-wheeler.
        Bike => "bike",
        /// An electric vehicle that may use charging bays.
        ElectricVehicle => "electric_vehicle",
        /// A vehicle whose driver needs an accessible bay.
        AccessibleNeed => "accessible_need",
    }
}

text_enum! {
    /// The physical kind of a parking slot.
    SlotCategory, "slot_category" {
        /// A full-size bay.
        Regular => "regular",
        /// A compact bay.
        Compact => "compact",
        /// A bay with a charger.
        ElectricCharging => "electric_charging",
        /// A bay reserved for accessible parking.
        AccessibleReserved => "accessible_reserved",
    }
}

text_enum! {
    /// Whether a slot can currently be allocated.
    SlotStatus, "slot_status" {
        /// Free to be claimed.
        Available => "available",
        /// Held by exactly one active session.
        Occupied => "occupied",
        /// Withdrawn from allocation by an operator.
        UnderMaintenance => "under_maintenance",
    }
}

text_enum! {
    /// How a session is charged.
    BillingMode, "billing_mode" {
        /// Slab-based pricing by rounded-up hours.
        Hourly => "hourly",
        /// A flat fee regardless of duration.
        DayPass => "day_pass",
    }
}

text_enum! {
    /// Lifecycle state of a parking session.
    SessionStatus, "session_status" {
        /// The vehicle is in the facility.
        Active => "active",
        /// The vehicle has left; terminal.
        Completed => "completed",
    }
}

text_enum! {
    /// How far past its thresholds a session has run.
    ///
    /// Variants are ordered by urgency, so `Critical > Alert > Warning`.
    Severity, "severity" {
        /// The warning threshold was crossed.
        Warning => "warning",
        /// The alert threshold was crossed.
        Alert => "alert",
        /// The critical threshold was crossed.
        Critical => "critical",
    }
}
