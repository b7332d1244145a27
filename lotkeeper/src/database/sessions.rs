//! Parking session storage.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::billing::Amount;
use crate::category::BillingMode;
use crate::error::Result;
use crate::session::{ParkingSession, SessionId};
use crate::slot::SlotId;
use crate::vehicle::LicensePlate;

use super::connection::Database;
use super::{from_millis, to_millis};

const SELECT_SESSION_COLUMNS: &str = r"
    SELECT s.id, s.plate, v.category, s.slot_id, sl.number, s.entry_time, s.exit_time,
           s.billing_mode, s.status, s.billing_amount
    FROM sessions s
    JOIN vehicles v ON v.plate = s.plate
    JOIN slots sl ON sl.id = s.slot_id
";

const INSERT_SESSION: &str = r"
    INSERT INTO sessions (plate, slot_id, entry_time, billing_mode, status)
    VALUES (?1, ?2, ?3, ?4, 'active')
";

const MOVE_SESSION: &str = r"
    UPDATE sessions SET slot_id = ?3
    WHERE id = ?1 AND slot_id = ?2 AND status = 'active'
";

const COMPLETE_SESSION: &str = r"
    UPDATE sessions SET status = 'completed', exit_time = ?2, billing_amount = ?3
    WHERE id = ?1 AND status = 'active'
";

fn row_to_session(row: &rusqlite::Row<'_>) -> rusqlite::Result<ParkingSession> {
    let exit_time: Option<i64> = row.get(6)?;
    Ok(ParkingSession {
        id: row.get(0)?,
        plate: row.get(1)?,
        vehicle_category: row.get(2)?,
        slot_id: row.get(3)?,
        slot_number: row.get(4)?,
        entry_time: from_millis(row.get(5)?)?,
        exit_time: exit_time.map(from_millis).transpose()?,
        billing_mode: row.get(7)?,
        status: row.get(8)?,
        billing_amount: row.get(9)?,
    })
}

fn query_sessions(
    conn: &Connection,
    clause: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<ParkingSession>> {
    let sql = format!("{SELECT_SESSION_COLUMNS} {clause}");
    let mut stmt = conn.prepare(&sql)?;
    let sessions = stmt
        .query_map(params, row_to_session)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(sessions)
}

impl Database {
    /// Creates an Active session and returns its id.
    ///
    /// The slot must already have been claimed by the caller in the same
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including when the vehicle or
    /// slot already has an active session.
    pub fn insert_session(
        conn: &Connection,
        plate: &LicensePlate,
        slot_id: SlotId,
        entry_time: DateTime<Utc>,
        billing_mode: BillingMode,
    ) -> Result<SessionId> {
        conn.execute(
            INSERT_SESSION,
            params![plate, slot_id, to_millis(entry_time), billing_mode],
        )?;
        Ok(SessionId::new(conn.last_insert_rowid()))
    }

    /// Looks a session up by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_session(conn: &Connection, id: SessionId) -> Result<Option<ParkingSession>> {
        let sql = format!("{SELECT_SESSION_COLUMNS} WHERE s.id = ?1");
        Ok(conn.query_row(&sql, [id], row_to_session).optional()?)
    }

    /// The vehicle's Active session, if it has one.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn active_session_for_plate(
        conn: &Connection,
        plate: &LicensePlate,
    ) -> Result<Option<ParkingSession>> {
        let sql = format!("{SELECT_SESSION_COLUMNS} WHERE s.plate = ?1 AND s.status = 'active'");
        Ok(conn.query_row(&sql, [plate], row_to_session).optional()?)
    }

    /// Every Active session, oldest entry first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_active_sessions(conn: &Connection) -> Result<Vec<ParkingSession>> {
        query_sessions(
            conn,
            "WHERE s.status = 'active' ORDER BY s.entry_time, s.id",
            [],
        )
    }

    /// A vehicle's sessions, newest entry first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn session_history(
        conn: &Connection,
        plate: &LicensePlate,
        limit: Option<u32>,
    ) -> Result<Vec<ParkingSession>> {
        query_sessions(
            conn,
            "WHERE s.plate = ?1 ORDER BY s.entry_time DESC, s.id DESC LIMIT ?2",
            params![plate, limit.map_or(-1, i64::from)],
        )
    }

    /// Points an Active session at a new slot iff it still holds `from`.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn move_session(
        conn: &Connection,
        id: SessionId,
        from: SlotId,
        to: SlotId,
    ) -> Result<bool> {
        let rows = conn.execute(MOVE_SESSION, params![id, from, to])?;
        Ok(rows == 1)
    }

    /// Completes an Active session with its exit time and charge.
    ///
    /// Returns `false` if the session is missing or already completed.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn complete_session(
        conn: &Connection,
        id: SessionId,
        exit_time: DateTime<Utc>,
        amount: Amount,
    ) -> Result<bool> {
        let rows = conn.execute(COMPLETE_SESSION, params![id, to_millis(exit_time), amount])?;
        Ok(rows == 1)
    }

    /// Slots whose status disagrees with their Active sessions, as
    /// `(slot number, status, active session count)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn slot_occupancy_mismatches(
        conn: &Connection,
    ) -> Result<Vec<(String, crate::category::SlotStatus, i64)>> {
        let mut stmt = conn.prepare(
            r"
            SELECT sl.number, sl.status,
                   (SELECT COUNT(*) FROM sessions s WHERE s.slot_id = sl.id AND s.status = 'active') AS active
            FROM slots sl
            WHERE (sl.status = 'occupied') != (active = 1) OR active > 1
            ORDER BY sl.number
            ",
        )?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Plates with more than one Active session, with the count.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn plates_with_multiple_active(conn: &Connection) -> Result<Vec<(String, i64)>> {
        let mut stmt = conn.prepare(
            r"
            SELECT plate, COUNT(*) FROM sessions
            WHERE status = 'active'
            GROUP BY plate HAVING COUNT(*) > 1
            ORDER BY plate
            ",
        )?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{SessionStatus, SlotCategory, SlotStatus, VehicleCategory};
    use crate::database::test_util::{add_slot, create_test_database};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 2, 10, 0, 0).unwrap()
    }

    fn park(db: &Database, plate: &str, slot: SlotId, at: DateTime<Utc>) -> SessionId {
        let plate = LicensePlate::parse(plate).unwrap();
        Database::register_vehicle(db.connection(), &plate, VehicleCategory::Car, at).unwrap();
        assert!(Database::try_reserve(db.connection(), slot, SlotStatus::Available).unwrap());
        Database::insert_session(db.connection(), &plate, slot, at, BillingMode::Hourly).unwrap()
    }

    #[test]
    fn test_insert_and_get_session() {
        let mut db = create_test_database();
        let slot = add_slot(&mut db, "A-01", SlotCategory::Regular);
        let id = park(&db, "KA01", slot.id, t0());

        let session = Database::get_session(db.connection(), id).unwrap().unwrap();
        assert_eq!(session.plate.as_str(), "KA01");
        assert_eq!(session.slot_number.as_str(), "A-01");
        assert_eq!(session.entry_time, t0());
        assert_eq!(session.status, SessionStatus::Active);
        assert_eq!(session.exit_time, None);
        assert_eq!(session.billing_amount, None);

        let active = Database::active_session_for_plate(db.connection(), &session.plate)
            .unwrap()
            .unwrap();
        assert_eq!(active.id, id);
    }

    #[test]
    fn test_complete_session_once() {
        let mut db = create_test_database();
        let slot = add_slot(&mut db, "A-01", SlotCategory::Regular);
        let id = park(&db, "KA01", slot.id, t0());
        let exit = t0() + Duration::minutes(90);

        assert!(Database::complete_session(db.connection(), id, exit, Amount::new(100)).unwrap());
        assert!(!Database::complete_session(db.connection(), id, exit, Amount::new(999)).unwrap());

        let session = Database::get_session(db.connection(), id).unwrap().unwrap();
        assert_eq!(session.status, SessionStatus::Completed);
        assert_eq!(session.exit_time, Some(exit));
        assert_eq!(session.billing_amount, Some(Amount::new(100)));
        assert!(Database::active_session_for_plate(db.connection(), &session.plate)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_move_session_conditional() {
        let mut db = create_test_database();
        let a = add_slot(&mut db, "A", SlotCategory::Regular);
        let b = add_slot(&mut db, "B", SlotCategory::Regular);
        let id = park(&db, "KA01", a.id, t0());

        assert!(!Database::move_session(db.connection(), id, b.id, a.id).unwrap());
        assert!(Database::move_session(db.connection(), id, a.id, b.id).unwrap());
        let session = Database::get_session(db.connection(), id).unwrap().unwrap();
        assert_eq!(session.slot_id, b.id);
        assert_eq!(session.entry_time, t0());
    }

    #[test]
    fn test_history_newest_first_with_limit() {
        let mut db = create_test_database();
        let slot = add_slot(&mut db, "A", SlotCategory::Regular);
        let plate = LicensePlate::parse("KA01").unwrap();

        for day in 0..3 {
            let entry = t0() + Duration::days(day);
            let id = park(&db, "KA01", slot.id, entry);
            Database::complete_session(db.connection(), id, entry + Duration::hours(1), Amount::new(50))
                .unwrap();
            Database::release_slot(db.connection(), slot.id).unwrap();
        }

        let history = Database::session_history(db.connection(), &plate, None).unwrap();
        assert_eq!(history.len(), 3);
        assert!(history[0].entry_time > history[1].entry_time);
        assert!(history[1].entry_time > history[2].entry_time);

        let limited = Database::session_history(db.connection(), &plate, Some(1)).unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].id, history[0].id);
    }

    #[test]
    fn test_list_active_sessions_oldest_first() {
        let mut db = create_test_database();
        let a = add_slot(&mut db, "A", SlotCategory::Regular);
        let b = add_slot(&mut db, "B", SlotCategory::Regular);
        let late = park(&db, "LATE", a.id, t0() + Duration::hours(2));
        let early = park(&db, "EARLY", b.id, t0());

        let active = Database::list_active_sessions(db.connection()).unwrap();
        let ids: Vec<_> = active.iter().map(|s| s.id).collect();
        assert_eq!(ids, [early, late]);
    }

    #[test]
    fn test_mismatch_queries() {
        let mut db = create_test_database();
        let a = add_slot(&mut db, "A", SlotCategory::Regular);
        let b = add_slot(&mut db, "B", SlotCategory::Regular);
        park(&db, "KA01", a.id, t0());

        assert!(Database::slot_occupancy_mismatches(db.connection()).unwrap().is_empty());

        // Occupied with no session.
        Database::try_reserve(db.connection(), b.id, SlotStatus::Available).unwrap();
        // Session whose slot was flipped back to available.
        Database::release_slot(db.connection(), a.id).unwrap();

        let mismatches = Database::slot_occupancy_mismatches(db.connection()).unwrap();
        assert_eq!(mismatches.len(), 2);
        assert_eq!(mismatches[0], ("A".to_string(), SlotStatus::Available, 1));
        assert_eq!(mismatches[1], ("B".to_string(), SlotStatus::Occupied, 0));

        assert!(Database::plates_with_multiple_active(db.connection()).unwrap().is_empty());
    }
}
