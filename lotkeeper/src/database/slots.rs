//! Slot inventory storage.
//!
//! Every status change is a conditional `UPDATE ... WHERE status = ?`, so a
//! transition only happens if the row still holds the status the caller
//! observed. Callers inspect the returned flag rather than re-reading.

use rusqlite::{params, params_from_iter, Connection, OptionalExtension, TransactionBehavior};
use serde::Serialize;

use crate::category::{SlotCategory, SlotStatus, VehicleCategory};
use crate::compatibility::{compatible_slot_categories, preference_rank};
use crate::error::{Error, Result};
use crate::slot::{ParkingSlot, SlotId, SlotNumber};

use super::connection::Database;

const SELECT_SLOT_COLUMNS: &str = "SELECT id, number, category, status FROM slots";

const INSERT_SLOT: &str = "INSERT INTO slots (number, category, status) VALUES (?1, ?2, 'available')";

const TRY_TRANSITION: &str = "UPDATE slots SET status = ?3 WHERE id = ?1 AND status = ?2";

fn row_to_slot(row: &rusqlite::Row<'_>) -> rusqlite::Result<ParkingSlot> {
    Ok(ParkingSlot {
        id: row.get(0)?,
        number: row.get(1)?,
        category: row.get(2)?,
        status: row.get(3)?,
    })
}

/// Slot counts at one instant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OccupancySnapshot {
    /// Total slots.
    pub total: usize,
    /// Slots free to be claimed.
    pub available: usize,
    /// Slots held by an active session.
    pub occupied: usize,
    /// Slots withdrawn by an operator.
    pub under_maintenance: usize,
    /// `(category, available, total)` per slot category, in declaration order.
    pub by_category: Vec<CategoryOccupancy>,
}

/// Availability of one slot category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryOccupancy {
    /// The slot category.
    pub category: SlotCategory,
    /// Slots of this category that are available.
    pub available: usize,
    /// All slots of this category.
    pub total: usize,
}

impl Database {
    /// Adds a slot to the inventory as Available.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if a slot with the same number exists.
    pub fn add_slot(&mut self, number: &SlotNumber, category: SlotCategory) -> Result<ParkingSlot> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let slot = Self::insert_slot(&tx, number, category)?;
        tx.commit()?;
        log::info!("added slot {} ({category})", slot.number);
        Ok(slot)
    }

    /// Adds a slot using an existing connection or transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if a slot with the same number exists.
    pub fn insert_slot(
        conn: &Connection,
        number: &SlotNumber,
        category: SlotCategory,
    ) -> Result<ParkingSlot> {
        if Self::get_slot_by_number(conn, number)?.is_some() {
            return Err(Error::Validation {
                field: "slot_number".into(),
                message: format!("slot {number} already exists"),
            });
        }
        conn.execute(INSERT_SLOT, params![number, category])?;
        Ok(ParkingSlot {
            id: SlotId::new(conn.last_insert_rowid()),
            number: number.clone(),
            category,
            status: SlotStatus::Available,
        })
    }

    /// Looks a slot up by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_slot(conn: &Connection, id: SlotId) -> Result<Option<ParkingSlot>> {
        let sql = format!("{SELECT_SLOT_COLUMNS} WHERE id = ?1");
        Ok(conn.query_row(&sql, [id], row_to_slot).optional()?)
    }

    /// Looks a slot up by its operator-facing number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_slot_by_number(conn: &Connection, number: &SlotNumber) -> Result<Option<ParkingSlot>> {
        let sql = format!("{SELECT_SLOT_COLUMNS} WHERE number = ?1");
        Ok(conn.query_row(&sql, [number], row_to_slot).optional()?)
    }

    /// Lists slots ordered by number, optionally filtered.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_slots(
        conn: &Connection,
        status: Option<SlotStatus>,
        category: Option<SlotCategory>,
    ) -> Result<Vec<ParkingSlot>> {
        let sql = format!(
            "{SELECT_SLOT_COLUMNS} WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR category = ?2) ORDER BY number"
        );
        let mut stmt = conn.prepare(&sql)?;
        let slots = stmt
            .query_map(params![status, category], row_to_slot)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(slots)
    }

    /// The best Available slot for a `vehicle`, or `None` if every compatible
    /// slot is taken. Slots in `exclude` are skipped.
    ///
    /// Candidates are taken in ascending slot number across all compatible
    /// categories, except that a charging bay beats any other slot for an
    /// electric vehicle (see [`preference_rank`]).
    ///
    /// The result is only a candidate; it must still be claimed with
    /// [`Database::try_reserve`].
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_candidate(
        conn: &Connection,
        vehicle: VehicleCategory,
        exclude: &[SlotId],
    ) -> Result<Option<ParkingSlot>> {
        let categories = compatible_slot_categories(vehicle);
        let placeholders = (1..=categories.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "{SELECT_SLOT_COLUMNS} WHERE status = 'available' AND category IN ({placeholders}) ORDER BY number"
        );

        let mut stmt = conn.prepare_cached(&sql)?;
        let mut rows = stmt.query(params_from_iter(categories))?;
        let mut best: Option<(usize, ParkingSlot)> = None;
        while let Some(row) = rows.next()? {
            let slot = row_to_slot(row)?;
            if exclude.contains(&slot.id) {
                continue;
            }
            let Some(rank) = preference_rank(vehicle, slot.category) else {
                continue;
            };
            if rank == 0 {
                return Ok(Some(slot));
            }
            if best.as_ref().map_or(true, |(kept, _)| rank < *kept) {
                best = Some((rank, slot));
            }
        }
        Ok(best.map(|(_, slot)| slot))
    }

    /// Flips `expected` to Occupied iff the slot still holds `expected`.
    ///
    /// Returns `false`, with no side effects, if the slot is gone or its
    /// status changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn try_reserve(conn: &Connection, id: SlotId, expected: SlotStatus) -> Result<bool> {
        Self::transition_slot(conn, id, expected, SlotStatus::Occupied)
    }

    /// Returns an Occupied slot to Available.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn release_slot(conn: &Connection, id: SlotId) -> Result<bool> {
        Self::transition_slot(conn, id, SlotStatus::Occupied, SlotStatus::Available)
    }

    /// Withdraws a slot from allocation. Idempotent; fails only if the slot
    /// is missing or Occupied.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn set_maintenance(conn: &Connection, id: SlotId) -> Result<bool> {
        let rows = conn.execute(
            "UPDATE slots SET status = 'under_maintenance' WHERE id = ?1 AND status IN ('available', 'under_maintenance')",
            [id],
        )?;
        Ok(rows == 1)
    }

    /// Returns a slot from maintenance to Available.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn restore_slot(conn: &Connection, id: SlotId) -> Result<bool> {
        Self::transition_slot(conn, id, SlotStatus::UnderMaintenance, SlotStatus::Available)
    }

    /// The single conditional write every status change goes through.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn transition_slot(
        conn: &Connection,
        id: SlotId,
        from: SlotStatus,
        to: SlotStatus,
    ) -> Result<bool> {
        let rows = conn.execute(TRY_TRANSITION, params![id, from, to])?;
        Ok(rows == 1)
    }

    /// Counts slots by status and category.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn occupancy(conn: &Connection) -> Result<OccupancySnapshot> {
        let mut stmt =
            conn.prepare("SELECT category, status, COUNT(*) FROM slots GROUP BY category, status")?;
        let mut rows = stmt.query([])?;

        let mut snapshot = OccupancySnapshot {
            by_category: SlotCategory::ALL
                .iter()
                .map(|category| CategoryOccupancy {
                    category: *category,
                    available: 0,
                    total: 0,
                })
                .collect(),
            ..OccupancySnapshot::default()
        };

        while let Some(row) = rows.next()? {
            let category: SlotCategory = row.get(0)?;
            let status: SlotStatus = row.get(1)?;
            let count = usize::try_from(row.get::<_, i64>(2)?).unwrap_or(0);

            snapshot.total += count;
            match status {
                SlotStatus::Available => snapshot.available += count,
                SlotStatus::Occupied => snapshot.occupied += count,
                SlotStatus::UnderMaintenance => snapshot.under_maintenance += count,
            }
            if let Some(entry) = snapshot.by_category.iter_mut().find(|c| c.category == category) {
                entry.total += count;
                if status == SlotStatus::Available {
                    entry.available += count;
                }
            }
        }

        Ok(snapshot)
    }
}
