//! Database schema management and migrations.

use rusqlite::Connection;

use crate::error::{Error, Result};

use super::schema::{
    CREATE_ACTIVE_SLOT_INDEX, CREATE_ACTIVE_VEHICLE_INDEX, CREATE_METADATA_TABLE,
    CREATE_PLATE_HISTORY_INDEX, CREATE_SESSIONS_TABLE, CREATE_SLOTS_TABLE,
    CREATE_SLOT_STATUS_INDEX, CREATE_VEHICLES_TABLE, CURRENT_SCHEMA_VERSION,
    INSERT_SCHEMA_VERSION, SELECT_SCHEMA_VERSION,
};

/// Creates every table and index and records the schema version.
///
/// # Errors
///
/// Returns an error if any SQL statement fails to execute.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use lotkeeper::database::migrations::{get_schema_version, initialize_schema};
///
/// let conn = Connection::open_in_memory().unwrap();
/// initialize_schema(&conn).unwrap();
/// assert_eq!(get_schema_version(&conn).unwrap(), 1);
/// ```
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch("BEGIN IMMEDIATE")?;
    let result = (|| -> Result<()> {
        conn.execute(CREATE_METADATA_TABLE, [])?;
        conn.execute(CREATE_SLOTS_TABLE, [])?;
        conn.execute(CREATE_VEHICLES_TABLE, [])?;
        conn.execute(CREATE_SESSIONS_TABLE, [])?;

        conn.execute(CREATE_ACTIVE_VEHICLE_INDEX, [])?;
        conn.execute(CREATE_ACTIVE_SLOT_INDEX, [])?;
        conn.execute(CREATE_PLATE_HISTORY_INDEX, [])?;
        conn.execute(CREATE_SLOT_STATUS_INDEX, [])?;

        conn.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION])?;
        Ok(())
    })();

    match result {
        Ok(()) => {
            conn.execute_batch("COMMIT")?;
            log::debug!("initialized schema version {CURRENT_SCHEMA_VERSION}");
            Ok(())
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(e)
        }
    }
}

/// Reads the schema version; 0 means the database is uninitialized.
///
/// # Errors
///
/// Returns an error if the query fails for a reason other than a missing
/// metadata table or row.
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    let has_metadata: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'metadata')",
        [],
        |row| row.get(0),
    )?;
    if !has_metadata {
        return Ok(0);
    }

    match conn.query_row(SELECT_SCHEMA_VERSION, [], |row| {
        let value: String = row.get(0)?;
        value
            .parse::<i32>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e)))
    }) {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e.into()),
    }
}

/// Initializes a fresh database or checks an existing one's version.
///
/// # Errors
///
/// Returns [`Error::UnsupportedSchemaVersion`] when the database was written
/// by an older or newer release, or a database error.
pub fn check_schema_compatibility(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        initialize_schema(conn)?;
    } else if version != CURRENT_SCHEMA_VERSION {
        return Err(Error::UnsupportedSchemaVersion {
            expected: CURRENT_SCHEMA_VERSION,
            found: version,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_connection() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    #[test]
    fn test_initialize_schema() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);
        for table in ["slots", "vehicles", "sessions"] {
            let count: i64 = conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
                .unwrap();
            assert_eq!(count, 0);
        }
    }

    #[test]
    fn test_get_schema_version_uninitialized() {
        let conn = create_test_connection();
        assert_eq!(get_schema_version(&conn).unwrap(), 0);
    }

    #[test]
    fn test_check_schema_compatibility_fresh_database() {
        let conn = create_test_connection();
        check_schema_compatibility(&conn).unwrap();
        assert_eq!(get_schema_version(&conn).unwrap(), CURRENT_SCHEMA_VERSION);

        // Idempotent on an initialized database.
        check_schema_compatibility(&conn).unwrap();
    }

    #[test]
    fn test_check_schema_compatibility_newer_version() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();
        conn.execute(
            "UPDATE metadata SET value = '999' WHERE key = 'schema_version'",
            [],
        )
        .unwrap();

        let err = check_schema_compatibility(&conn).unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedSchemaVersion {
                expected: CURRENT_SCHEMA_VERSION,
                found: 999
            }
        ));
    }

    #[test]
    fn test_schema_creates_all_indices() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();

        let index_count: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name LIKE 'idx_%'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(index_count, 4);
    }

    #[test]
    fn test_active_session_index_rejects_second_active() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO slots (number, category) VALUES ('A', 'regular'), ('B', 'regular');
             INSERT INTO vehicles VALUES ('X1', 'car', 0);
             INSERT INTO sessions (plate, slot_id, entry_time, billing_mode) VALUES ('X1', 1, 0, 'hourly');",
        )
        .unwrap();

        let second = conn.execute(
            "INSERT INTO sessions (plate, slot_id, entry_time, billing_mode) VALUES ('X1', 2, 0, 'hourly')",
            [],
        );
        assert!(second.is_err());
    }

    #[test]
    fn test_check_constraint_ties_exit_time_to_status() {
        let conn = create_test_connection();
        initialize_schema(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO slots (number, category) VALUES ('A', 'regular');
             INSERT INTO vehicles VALUES ('X1', 'car', 0);",
        )
        .unwrap();

        let bad = conn.execute(
            "INSERT INTO sessions (plate, slot_id, entry_time, billing_mode, status) VALUES ('X1', 1, 0, 'hourly', 'completed')",
            [],
        );
        assert!(bad.is_err());
    }
}
