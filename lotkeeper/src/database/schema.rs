//! Database schema definitions and SQL constants.
//!
//! Times are stored as epoch milliseconds and enums as their snake_case text.

/// Current schema version for the database.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Key-value metadata, including the schema version.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// Slot inventory. `number` is the operator-facing unique name.
pub const CREATE_SLOTS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS slots (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        number TEXT NOT NULL UNIQUE,
        category TEXT NOT NULL CHECK (category IN
            ('regular', 'compact', 'electric_charging', 'accessible_reserved')),
        status TEXT NOT NULL DEFAULT 'available' CHECK (status IN
            ('available', 'occupied', 'under_maintenance'))
    )";

/// Vehicles, keyed by normalized plate.
pub const CREATE_VEHICLES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS vehicles (
        plate TEXT PRIMARY KEY NOT NULL,
        category TEXT NOT NULL CHECK (category IN
            ('car', 'bike', 'electric_vehicle', 'accessible_need')),
        registered_at INTEGER NOT NULL
    )";

/// Parking sessions.
pub const CREATE_SESSIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS sessions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        plate TEXT NOT NULL REFERENCES vehicles(plate),
        slot_id INTEGER NOT NULL REFERENCES slots(id),
        entry_time INTEGER NOT NULL,
        exit_time INTEGER,
        billing_mode TEXT NOT NULL CHECK (billing_mode IN ('hourly', 'day_pass')),
        status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'completed')),
        billing_amount INTEGER,
        CHECK ((status = 'active') = (exit_time IS NULL))
    )";

/// At most one active session per vehicle.
pub const CREATE_ACTIVE_VEHICLE_INDEX: &str = r"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_sessions_active_plate
    ON sessions(plate) WHERE status = 'active'";

/// At most one active session per slot.
pub const CREATE_ACTIVE_SLOT_INDEX: &str = r"
    CREATE UNIQUE INDEX IF NOT EXISTS idx_sessions_active_slot
    ON sessions(slot_id) WHERE status = 'active'";

/// Speeds up per-plate history.
pub const CREATE_PLATE_HISTORY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_sessions_plate_entry ON sessions(plate, entry_time)";

/// Speeds up candidate selection.
pub const CREATE_SLOT_STATUS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_slots_status_category ON slots(status, category)";

/// Reads the schema version.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// Writes the schema version.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";
