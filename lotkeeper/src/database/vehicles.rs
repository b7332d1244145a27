//! Vehicle registry storage.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::category::VehicleCategory;
use crate::error::Result;
use crate::vehicle::{LicensePlate, Vehicle};

use super::connection::Database;
use super::{from_millis, to_millis};

impl Database {
    /// Looks a vehicle up by plate.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_vehicle(conn: &Connection, plate: &LicensePlate) -> Result<Option<Vehicle>> {
        let vehicle = conn
            .query_row(
                "SELECT plate, category, registered_at FROM vehicles WHERE plate = ?1",
                [plate],
                |row| {
                    Ok(Vehicle {
                        plate: row.get(0)?,
                        category: row.get(1)?,
                        registered_at: from_millis(row.get(2)?)?,
                    })
                },
            )
            .optional()?;
        Ok(vehicle)
    }

    /// Registers a vehicle on first sight, or records its category if it
    /// changed since the last visit.
    ///
    /// Returns `true` when the vehicle was created.
    ///
    /// # Errors
    ///
    /// Returns an error if the query or write fails.
    pub fn register_vehicle(
        conn: &Connection,
        plate: &LicensePlate,
        category: VehicleCategory,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        match Self::get_vehicle(conn, plate)? {
            None => {
                conn.execute(
                    "INSERT INTO vehicles (plate, category, registered_at) VALUES (?1, ?2, ?3)",
                    params![plate, category, to_millis(now)],
                )?;
                log::debug!("registered vehicle {plate} as {category}");
                Ok(true)
            }
            Some(existing) if existing.category != category => {
                conn.execute(
                    "UPDATE vehicles SET category = ?2 WHERE plate = ?1",
                    params![plate, category],
                )?;
                log::debug!(
                    "vehicle {plate} re-registered from {} to {category}",
                    existing.category
                );
                Ok(false)
            }
            Some(_) => Ok(false),
        }
    }
}
