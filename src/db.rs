// ==========================================
// Course Planner - SQLite connection and schema
// ==========================================
// Goals:
// - one PRAGMA set for every Connection::open (foreign keys, busy timeout)
// - idempotent schema creation, recorded in schema_version
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// Default busy_timeout (ms)
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// schema_version this code writes and expects
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// Uniform PRAGMA set.
///
/// foreign_keys and busy_timeout are per-connection settings.
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Opens a connection with the uniform configuration applied
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// Reads schema_version (None when the table does not exist)
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// Creates every planner table if missing and records the schema version.
/// Safe to call on every start.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;

    if let Some(version) = read_schema_version(conn)? {
        if version > CURRENT_SCHEMA_VERSION {
            tracing::warn!(
                found = version,
                expected = CURRENT_SCHEMA_VERSION,
                "database schema is newer than this build"
            );
        }
    }
    Ok(())
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- ===== configuration =====
CREATE TABLE IF NOT EXISTS config_scope (
    scope_id TEXT PRIMARY KEY,
    scope_type TEXT NOT NULL,
    scope_key TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(scope_type, scope_key)
);

INSERT OR IGNORE INTO config_scope (scope_id, scope_type, scope_key)
VALUES ('global', 'GLOBAL', 'global');

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL REFERENCES config_scope(scope_id) ON DELETE CASCADE,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (scope_id, key)
);

-- ===== catalog =====
CREATE TABLE IF NOT EXISTS course (
    course_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    credits TEXT,
    department_code TEXT NOT NULL,
    gen_ed_json TEXT,
    description TEXT,
    grading_status TEXT
);

CREATE TABLE IF NOT EXISTS course_prerequisite (
    course_id TEXT NOT NULL,
    prereq_group INTEGER NOT NULL,
    is_corequisite INTEGER NOT NULL DEFAULT 0,
    required_course_id TEXT NOT NULL,
    required_course_name TEXT NOT NULL DEFAULT '',
    seq INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (course_id, prereq_group, required_course_id)
);

CREATE TABLE IF NOT EXISTS program (
    program_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    program_type TEXT NOT NULL,
    degree_type TEXT,
    total_hours INTEGER,
    url TEXT
);

CREATE TABLE IF NOT EXISTS requirement_category (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    program_id TEXT NOT NULL REFERENCES program(program_id) ON DELETE CASCADE,
    requirement_type TEXT NOT NULL,
    category_name TEXT,
    min_credits INTEGER,
    min_courses INTEGER,
    selection_notes TEXT,
    level_requirement TEXT,
    other_restrictions TEXT,
    seq INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS requirement_course (
    category_id INTEGER NOT NULL REFERENCES requirement_category(id) ON DELETE CASCADE,
    course_id TEXT NOT NULL,
    course_name TEXT NOT NULL DEFAULT '',
    credits TEXT,
    is_required INTEGER NOT NULL DEFAULT 0,
    seq INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (category_id, course_id)
);

CREATE TABLE IF NOT EXISTS gen_ed_code (
    code TEXT PRIMARY KEY,
    name TEXT NOT NULL DEFAULT '',
    description TEXT,
    seq INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS gen_ed_course (
    code TEXT NOT NULL REFERENCES gen_ed_code(code) ON DELETE CASCADE,
    course_id TEXT NOT NULL,
    seq INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (code, course_id)
);

CREATE INDEX IF NOT EXISTS idx_requirement_category_program ON requirement_category(program_id, seq);

-- ===== planner state =====
CREATE TABLE IF NOT EXISTS schedule (
    schedule_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    snapshot_json TEXT NOT NULL,
    revision INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS program_selection (
    schedule_id TEXT PRIMARY KEY REFERENCES schedule(schedule_id) ON DELETE CASCADE,
    selection_json TEXT NOT NULL,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
