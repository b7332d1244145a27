//! Slot administration and session queries.

use crate::category::{SlotCategory, SlotStatus};
use crate::clock::Clock;
use crate::database::{Database, OccupancySnapshot};
use crate::error::{Error, Result};
use crate::session::{ParkingSession, SessionId};
use crate::slot::{ParkingSlot, SlotNumber};
use crate::vehicle::LicensePlate;

use super::lifecycle::{note_outcome, LifecycleManager};

fn slot_not_found(number: &SlotNumber) -> Error {
    Error::NotFound {
        resource: format!("slot {number}"),
    }
}

impl<C: Clock> LifecycleManager<'_, C> {
    /// Adds a slot to the inventory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the number is taken.
    pub fn add_slot(&mut self, number: &SlotNumber, category: SlotCategory) -> Result<ParkingSlot> {
        let result = self
            .db
            .with_transaction(self.settings.transaction_timeout, |tx| {
                Database::insert_slot(tx, number, category)
            });
        if result.is_ok() {
            log::info!("added slot {number} ({category})");
        }
        result
    }

    /// Lists slots, optionally filtered by status and category.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_slots(
        &self,
        status: Option<SlotStatus>,
        category: Option<SlotCategory>,
    ) -> Result<Vec<ParkingSlot>> {
        Database::list_slots(self.db.connection(), status, category)
    }

    /// Withdraws a slot from allocation. Already withdrawn slots are left
    /// as they are.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if no slot has that number
    /// - [`Error::SlotUnavailable`] if the slot is Occupied
    pub fn set_maintenance(&mut self, number: &SlotNumber) -> Result<ParkingSlot> {
        let result = self
            .db
            .with_transaction(self.settings.transaction_timeout, |tx| {
                let slot =
                    Database::get_slot_by_number(tx, number)?.ok_or_else(|| slot_not_found(number))?;
                if !Database::set_maintenance(tx, slot.id)? {
                    return Err(Error::SlotUnavailable {
                        slot_number: slot.number.to_string(),
                        status: SlotStatus::Occupied,
                    });
                }
                Ok(ParkingSlot {
                    status: SlotStatus::UnderMaintenance,
                    ..slot
                })
            });

        note_outcome("maintenance", &result);
        if result.is_ok() {
            log::info!("slot {number} is under maintenance");
        }
        result
    }

    /// Returns a slot from maintenance. A slot that is already Available is
    /// left as it is.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if no slot has that number
    /// - [`Error::SlotUnavailable`] if the slot is Occupied
    pub fn restore_slot(&mut self, number: &SlotNumber) -> Result<ParkingSlot> {
        let result = self
            .db
            .with_transaction(self.settings.transaction_timeout, |tx| {
                let slot =
                    Database::get_slot_by_number(tx, number)?.ok_or_else(|| slot_not_found(number))?;
                match slot.status {
                    SlotStatus::Available => Ok(slot),
                    SlotStatus::Occupied => Err(Error::SlotUnavailable {
                        slot_number: slot.number.to_string(),
                        status: slot.status,
                    }),
                    SlotStatus::UnderMaintenance => {
                        if !Database::restore_slot(tx, slot.id)? {
                            return Err(Error::InvalidState {
                                details: format!("slot {} changed during restore", slot.number),
                            });
                        }
                        Ok(ParkingSlot {
                            status: SlotStatus::Available,
                            ..slot
                        })
                    }
                }
            });

        note_outcome("restore", &result);
        if result.is_ok() {
            log::info!("slot {number} is available");
        }
        result
    }

    /// Every Active session, oldest entry first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn active_sessions(&self) -> Result<Vec<ParkingSession>> {
        Database::list_active_sessions(self.db.connection())
    }

    /// One session by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no session has that id.
    pub fn session(&self, id: SessionId) -> Result<ParkingSession> {
        Database::get_session(self.db.connection(), id)?.ok_or_else(|| Error::NotFound {
            resource: format!("session {id}"),
        })
    }

    /// A vehicle's sessions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn history(&self, plate: &LicensePlate, limit: Option<u32>) -> Result<Vec<ParkingSession>> {
        Database::session_history(self.db.connection(), plate, limit)
    }

    /// Current slot counts by status and category.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn occupancy(&self) -> Result<OccupancySnapshot> {
        Database::occupancy(self.db.connection())
    }
}
