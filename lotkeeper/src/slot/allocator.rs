//! Slot allocation.
//!
//! Allocation is a search followed by a claim: the allocator picks the lowest
//! numbered Available slot the vehicle category accepts (charging bays first
//! for electric vehicles) and then flips it to Occupied with a
//! conditional update. A lost claim means another entry took the slot first;
//! the allocator moves on to the next candidate, up to a bounded number of
//! attempts.

use rusqlite::Connection;

use crate::category::{SlotStatus, VehicleCategory};
use crate::compatibility::is_compatible;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::slot::{ParkingSlot, SlotId, SlotNumber};

/// Outcome of an automatic allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationResult {
    /// The slot was claimed and is now Occupied.
    Allocated(ParkingSlot),
    /// No compatible slot was Available.
    Exhausted,
    /// Every candidate tried was claimed by someone else first.
    Contended {
        /// The last slot that was lost.
        last_lost: SlotNumber,
    },
}

/// Picks and claims slots for arriving vehicles.
///
/// # Examples
///
/// ```
/// use lotkeeper::database::Database;
/// use lotkeeper::slot::allocator::{AllocationResult, SlotAllocator};
/// use lotkeeper::{SlotCategory, SlotNumber, VehicleCategory};
///
/// let mut db = Database::open_in_memory().unwrap();
/// db.add_slot(&SlotNumber::parse("R-01").unwrap(), SlotCategory::Regular).unwrap();
///
/// let allocator = SlotAllocator::new(2);
/// let result = allocator.allocate(db.connection(), VehicleCategory::Car).unwrap();
/// assert!(matches!(result, AllocationResult::Allocated(slot) if slot.number.as_str() == "R-01"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SlotAllocator {
    max_attempts: u32,
}

impl SlotAllocator {
    /// Creates an allocator that tries at most `max_attempts` candidates.
    /// Zero is treated as one.
    #[must_use]
    pub const fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: if max_attempts == 0 { 1 } else { max_attempts },
        }
    }

    /// How many candidates one allocation may try.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// The slot an allocation would try first, read without claiming it.
    ///
    /// Entry makes this pick before opening its write transaction; the pick
    /// is then re-checked by the claim inside it.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn propose(conn: &Connection, category: VehicleCategory) -> Result<Option<ParkingSlot>> {
        Database::find_candidate(conn, category, &[])
    }

    /// Claims the first Available slot `category` is offered.
    ///
    /// # Errors
    ///
    /// Returns an error only if a query fails; running out of slots is an
    /// [`AllocationResult`], not an error.
    pub fn allocate(
        &self,
        conn: &Connection,
        category: VehicleCategory,
    ) -> Result<AllocationResult> {
        self.allocate_from(conn, category, None)
    }

    /// Like [`allocate`](Self::allocate), but tries `proposal` first.
    ///
    /// A proposal that has been taken since it was made counts as a lost
    /// attempt, so if nothing else is free the result is
    /// [`AllocationResult::Contended`] rather than `Exhausted`.
    ///
    /// # Errors
    ///
    /// Returns an error only if a query fails.
    pub fn allocate_from(
        &self,
        conn: &Connection,
        category: VehicleCategory,
        mut proposal: Option<ParkingSlot>,
    ) -> Result<AllocationResult> {
        let mut tried: Vec<SlotId> = Vec::new();
        let mut last_lost = None;

        for attempt in 1..=self.max_attempts {
            let candidate = match proposal.take() {
                Some(slot) => slot,
                None => match Database::find_candidate(conn, category, &tried)? {
                    Some(slot) => slot,
                    None => break,
                },
            };

            if Database::try_reserve(conn, candidate.id, SlotStatus::Available)? {
                log::debug!(
                    "allocated slot {} to {category} on attempt {attempt}",
                    candidate.number
                );
                return Ok(AllocationResult::Allocated(ParkingSlot {
                    status: SlotStatus::Occupied,
                    ..candidate
                }));
            }

            log::debug!("slot {} lost to a concurrent entry", candidate.number);
            tried.push(candidate.id);
            last_lost = Some(candidate.number);
        }

        Ok(last_lost.map_or(AllocationResult::Exhausted, |last_lost| {
            AllocationResult::Contended { last_lost }
        }))
    }

    /// Claims a specific slot chosen by an operator.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if no slot has that number
    /// - [`Error::IncompatibleSlot`] if it cannot accept `category`
    /// - [`Error::SlotNoLongerAvailable`] if it is Occupied
    /// - [`Error::SlotUnavailable`] if it is under maintenance
    pub fn claim(
        conn: &Connection,
        number: &SlotNumber,
        category: VehicleCategory,
    ) -> Result<ParkingSlot> {
        let slot = Database::get_slot_by_number(conn, number)?.ok_or_else(|| Error::NotFound {
            resource: format!("slot {number}"),
        })?;

        if !is_compatible(category, slot.category) {
            return Err(Error::IncompatibleSlot {
                slot_number: slot.number.to_string(),
                slot_category: slot.category,
                vehicle_category: category,
            });
        }

        if Database::try_reserve(conn, slot.id, SlotStatus::Available)? {
            return Ok(ParkingSlot {
                status: SlotStatus::Occupied,
                ..slot
            });
        }

        let current = Database::get_slot(conn, slot.id)?.map_or(slot.status, |s| s.status);
        Err(match current {
            SlotStatus::UnderMaintenance => Error::SlotUnavailable {
                slot_number: slot.number.to_string(),
                status: current,
            },
            _ => Error::SlotNoLongerAvailable {
                slot_number: slot.number.to_string(),
            },
        })
    }
}
