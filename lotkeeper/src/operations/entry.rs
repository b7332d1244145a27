//! Vehicle entry.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::category::{BillingMode, VehicleCategory};
use crate::clock::Clock;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::session::SessionId;
use crate::slot::allocator::{AllocationResult, SlotAllocator};
use crate::slot::{SlotId, SlotNumber};
use crate::vehicle::LicensePlate;

use super::lifecycle::{note_outcome, LifecycleManager};

/// Parameters of an entry.
///
/// # Examples
///
/// ```
/// use lotkeeper::operations::EntryOptions;
/// use lotkeeper::{BillingMode, LicensePlate, SlotNumber, VehicleCategory};
///
/// let options = EntryOptions::new(LicensePlate::parse("KA01").unwrap(), VehicleCategory::Bike)
///     .with_billing_mode(BillingMode::DayPass)
///     .with_slot(Some(SlotNumber::parse("R-07").unwrap()));
/// assert_eq!(options.billing_mode, BillingMode::DayPass);
/// ```
#[derive(Debug, Clone)]
pub struct EntryOptions {
    /// The arriving vehicle.
    pub plate: LicensePlate,
    /// Its category; updates the stored category of a returning vehicle.
    pub category: VehicleCategory,
    /// How the session will be billed.
    pub billing_mode: BillingMode,
    /// A slot chosen by the operator. `None` auto-assigns.
    pub slot: Option<SlotNumber>,
}

impl EntryOptions {
    /// Hourly billing with automatic slot assignment.
    #[must_use]
    pub const fn new(plate: LicensePlate, category: VehicleCategory) -> Self {
        Self {
            plate,
            category,
            billing_mode: BillingMode::Hourly,
            slot: None,
        }
    }

    /// Sets the billing mode.
    #[must_use]
    pub const fn with_billing_mode(mut self, mode: BillingMode) -> Self {
        self.billing_mode = mode;
        self
    }

    /// Requests a specific slot.
    #[must_use]
    pub fn with_slot(mut self, slot: Option<SlotNumber>) -> Self {
        self.slot = slot;
        self
    }
}

/// Result of a successful entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryReceipt {
    /// The new Active session.
    pub session_id: SessionId,
    /// The slot now Occupied by it.
    pub slot_id: SlotId,
    /// That slot's number.
    pub slot_number: SlotNumber,
    /// When the session started.
    pub entry_time: DateTime<Utc>,
    /// Whether this was the vehicle's first visit.
    pub vehicle_created: bool,
}

impl<C: Clock> LifecycleManager<'_, C> {
    /// Parks a vehicle.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyParked`] if the vehicle has an Active session
    /// - [`Error::NoSlotsAvailable`] if auto-assignment finds no compatible slot
    /// - [`Error::SlotNoLongerAvailable`] if the slot was taken concurrently
    /// - [`Error::NotFound`], [`Error::IncompatibleSlot`] or
    ///   [`Error::SlotUnavailable`] for a bad manual slot
    /// - [`Error::TransactionTimeout`] if the transaction overran
    pub fn enter(&mut self, options: &EntryOptions) -> Result<EntryReceipt> {
        let now = self.clock.now();
        let allocator = SlotAllocator::new(self.settings.max_allocation_attempts);
        let proposal = match options.slot {
            Some(_) => None,
            None => SlotAllocator::propose(self.db.connection(), options.category)?,
        };

        let result = self
            .db
            .with_transaction(self.settings.transaction_timeout, |tx| {
                if let Some(active) = Database::active_session_for_plate(tx, &options.plate)? {
                    return Err(Error::AlreadyParked {
                        plate: options.plate.to_string(),
                        slot_number: active.slot_number.to_string(),
                    });
                }

                let slot = match &options.slot {
                    Some(number) => SlotAllocator::claim(tx, number, options.category)?,
                    None => match allocator.allocate_from(tx, options.category, proposal)? {
                        AllocationResult::Allocated(slot) => slot,
                        AllocationResult::Exhausted => {
                            return Err(Error::NoSlotsAvailable {
                                category: options.category,
                            })
                        }
                        AllocationResult::Contended { last_lost } => {
                            return Err(Error::SlotNoLongerAvailable {
                                slot_number: last_lost.to_string(),
                            })
                        }
                    },
                };

                let vehicle_created =
                    Database::register_vehicle(tx, &options.plate, options.category, now)?;
                let session_id = Database::insert_session(
                    tx,
                    &options.plate,
                    slot.id,
                    now,
                    options.billing_mode,
                )?;

                Ok(EntryReceipt {
                    session_id,
                    slot_id: slot.id,
                    slot_number: slot.number,
                    entry_time: now,
                    vehicle_created,
                })
            });

        note_outcome("entry", &result);
        if let Ok(receipt) = &result {
            log::info!(
                "{} entered slot {} as session {}",
                options.plate,
                receipt.slot_number,
                receipt.session_id
            );
        }
        result
    }
}
