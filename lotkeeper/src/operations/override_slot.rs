//! Moving an Active session to another slot.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::category::{BillingMode, SlotStatus};
use crate::clock::Clock;
use crate::compatibility::is_compatible;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::session::SessionId;
use crate::slot::SlotNumber;

use super::lifecycle::{note_outcome, LifecycleManager};

/// Result of a slot override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverrideReceipt {
    /// The session that moved.
    pub session_id: SessionId,
    /// The slot it left, now Available.
    pub old_slot: SlotNumber,
    /// The slot it holds now.
    pub new_slot: SlotNumber,
    /// Unchanged by the move.
    pub entry_time: DateTime<Utc>,
    /// Unchanged by the move.
    pub billing_mode: BillingMode,
}

impl<C: Clock> LifecycleManager<'_, C> {
    /// Moves an Active session to `target`, keeping its entry time.
    ///
    /// Checks run in this order: the session exists and is Active, the
    /// target differs from the current slot, the current slot is Occupied,
    /// the target exists, is Available, and accepts the vehicle.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] for an unknown session or target slot
    /// - [`Error::InvalidState`] if the session is completed or its slot is
    ///   not Occupied
    /// - [`Error::SameSlot`] if `target` is the current slot
    /// - [`Error::SlotUnavailable`] if the target is Occupied or under
    ///   maintenance
    /// - [`Error::IncompatibleSlot`] if the target rejects the vehicle category
    /// - [`Error::SlotNoLongerAvailable`] if the target was taken concurrently
    pub fn override_slot(
        &mut self,
        session_id: SessionId,
        target: &SlotNumber,
    ) -> Result<OverrideReceipt> {
        let result = self
            .db
            .with_transaction(self.settings.transaction_timeout, |tx| {
                let session =
                    Database::get_session(tx, session_id)?.ok_or_else(|| Error::NotFound {
                        resource: format!("session {session_id}"),
                    })?;
                if !session.is_active() {
                    return Err(Error::InvalidState {
                        details: format!("session {session_id} is not active"),
                    });
                }
                if &session.slot_number == target {
                    return Err(Error::SameSlot {
                        slot_number: target.to_string(),
                    });
                }

                let current = Database::get_slot(tx, session.slot_id)?;
                if current.as_ref().map(|s| s.status) != Some(SlotStatus::Occupied) {
                    return Err(Error::InvalidState {
                        details: format!(
                            "slot {} held by session {session_id} is not occupied",
                            session.slot_number
                        ),
                    });
                }

                let new_slot =
                    Database::get_slot_by_number(tx, target)?.ok_or_else(|| Error::NotFound {
                        resource: format!("slot {target}"),
                    })?;
                if !new_slot.is_available() {
                    return Err(Error::SlotUnavailable {
                        slot_number: new_slot.number.to_string(),
                        status: new_slot.status,
                    });
                }
                if !is_compatible(session.vehicle_category, new_slot.category) {
                    return Err(Error::IncompatibleSlot {
                        slot_number: new_slot.number.to_string(),
                        slot_category: new_slot.category,
                        vehicle_category: session.vehicle_category,
                    });
                }

                if !Database::try_reserve(tx, new_slot.id, SlotStatus::Available)? {
                    return Err(Error::SlotNoLongerAvailable {
                        slot_number: new_slot.number.to_string(),
                    });
                }
                if !Database::move_session(tx, session.id, session.slot_id, new_slot.id)? {
                    return Err(Error::InvalidState {
                        details: format!("session {session_id} changed during override"),
                    });
                }
                if !Database::release_slot(tx, session.slot_id)? {
                    return Err(Error::InvalidState {
                        details: format!("slot {} could not be released", session.slot_number),
                    });
                }

                Ok(OverrideReceipt {
                    session_id,
                    old_slot: session.slot_number,
                    new_slot: new_slot.number,
                    entry_time: session.entry_time,
                    billing_mode: session.billing_mode,
                })
            });

        note_outcome("override", &result);
        if let Ok(receipt) = &result {
            log::info!(
                "session {session_id} moved from slot {} to {}",
                receipt.old_slot,
                receipt.new_slot
            );
        }
        result
    }
}
