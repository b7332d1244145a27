//! Vehicle exit and administrative force-end.

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;

use crate::billing::{compute_amount, format_duration, Amount, RateTable};
use crate::category::BillingMode;
use crate::clock::Clock;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::session::{ParkingSession, SessionId};
use crate::slot::SlotNumber;
use crate::vehicle::LicensePlate;

use super::lifecycle::{note_outcome, LifecycleManager};

/// Result of a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExitReceipt {
    /// The session that was completed.
    pub session_id: SessionId,
    /// The departing vehicle.
    pub plate: LicensePlate,
    /// The slot that was released.
    pub slot_number: SlotNumber,
    /// When the session started.
    pub entry_time: DateTime<Utc>,
    /// When it ended.
    pub exit_time: DateTime<Utc>,
    /// Wall-clock stay as `"Xh Ym"`.
    pub duration: String,
    /// Billable hours, rounded up.
    pub duration_hours: u32,
    /// The charge.
    pub billing_amount: Amount,
    /// How it was billed.
    pub billing_mode: BillingMode,
}

/// Bills and completes `session`, then frees its slot.
///
/// Both writes are conditional; if either finds the rows in an unexpected
/// state the caller's transaction must be rolled back.
fn complete(
    conn: &Connection,
    session: ParkingSession,
    now: DateTime<Utc>,
    rates: &RateTable,
) -> Result<ExitReceipt> {
    let bill = compute_amount(session.entry_time, now, session.billing_mode, rates);

    if !Database::complete_session(conn, session.id, now, bill.amount)? {
        return Err(Error::InvalidState {
            details: format!("session {} is no longer active", session.id),
        });
    }
    if !Database::release_slot(conn, session.slot_id)? {
        return Err(Error::InvalidState {
            details: format!(
                "slot {} was not occupied by session {}",
                session.slot_number, session.id
            ),
        });
    }

    Ok(ExitReceipt {
        session_id: session.id,
        duration: format_duration(session.entry_time, now),
        plate: session.plate,
        slot_number: session.slot_number,
        entry_time: session.entry_time,
        exit_time: now,
        duration_hours: bill.duration_hours,
        billing_amount: bill.amount,
        billing_mode: session.billing_mode,
    })
}

impl<C: Clock> LifecycleManager<'_, C> {
    /// Ends the vehicle's Active session and bills it.
    ///
    /// # Errors
    ///
    /// - [`Error::NotParked`] if the vehicle has no Active session
    /// - [`Error::InvalidState`] if the session's slot was not Occupied
    /// - [`Error::TransactionTimeout`] if the transaction overran
    pub fn exit(&mut self, plate: &LicensePlate) -> Result<ExitReceipt> {
        let now = self.clock.now();
        let rates = &self.settings.rates;

        let result = self
            .db
            .with_transaction(self.settings.transaction_timeout, |tx| {
                let session = Database::active_session_for_plate(tx, plate)?.ok_or_else(|| {
                    Error::NotParked {
                        plate: plate.to_string(),
                    }
                })?;
                complete(tx, session, now, rates)
            });

        note_outcome("exit", &result);
        if let Ok(receipt) = &result {
            log::info!(
                "{plate} left slot {} after {}, charged {}",
                receipt.slot_number,
                receipt.duration,
                receipt.billing_amount
            );
        }
        result
    }

    /// Ends a session by id, billing it exactly like an exit.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if no session has that id
    /// - [`Error::InvalidState`] if it is already completed or its slot was
    ///   not Occupied
    /// - [`Error::TransactionTimeout`] if the transaction overran
    pub fn force_end(&mut self, session_id: SessionId) -> Result<ExitReceipt> {
        let now = self.clock.now();
        let rates = &self.settings.rates;

        let result = self
            .db
            .with_transaction(self.settings.transaction_timeout, |tx| {
                let session =
                    Database::get_session(tx, session_id)?.ok_or_else(|| Error::NotFound {
                        resource: format!("session {session_id}"),
                    })?;
                if !session.is_active() {
                    return Err(Error::InvalidState {
                        details: format!("session {session_id} is already completed"),
                    });
                }
                complete(tx, session, now, rates)
            });

        note_outcome("force-end", &result);
        if let Ok(receipt) = &result {
            log::info!(
                "session {session_id} force-ended in slot {}, charged {}",
                receipt.slot_number,
                receipt.billing_amount
            );
        }
        result
    }
}
