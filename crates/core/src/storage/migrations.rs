//! Database migration system
//!
//! Tracks schema versions and applies migrations in order.

use rusqlite::Connection;
use tracing::{info, instrument};

use crate::error::Result;

/// A database migration
pub struct Migration {
    /// Version number (must be sequential starting from 1)
    pub version: u32,
    /// Description of what this migration does
    pub description: &'static str,
    /// SQL to run for this migration
    pub sql: &'static str,
}

/// All migrations in order
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial schema",
        sql: r#"
            -- Hostels table
            CREATE TABLE IF NOT EXISTS hostels (
                hostel_no TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                hostel_type TEXT NOT NULL,
                capacity INTEGER NOT NULL
            );

            -- Rooms table
            CREATE TABLE IF NOT EXISTS rooms (
                room_no TEXT PRIMARY KEY,
                hostel_no TEXT NOT NULL,
                floor INTEGER NOT NULL,
                room_occupancy INTEGER NOT NULL,
                current_occupancy INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY (hostel_no) REFERENCES hostels(hostel_no) ON DELETE CASCADE,
                CHECK (current_occupancy >= 0 AND current_occupancy <= room_occupancy)
            );

            -- Batches table
            CREATE TABLE IF NOT EXISTS batches (
                batch_no TEXT PRIMARY KEY,
                number_of_students INTEGER NOT NULL DEFAULT 0
            );

            -- Students table
            CREATE TABLE IF NOT EXISTS students (
                student_id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                gender TEXT NOT NULL,
                batch_no TEXT NOT NULL,
                room_no TEXT,
                FOREIGN KEY (batch_no) REFERENCES batches(batch_no),
                FOREIGN KEY (room_no) REFERENCES rooms(room_no)
            );

            -- Internship applications table
            CREATE TABLE IF NOT EXISTS internship_applications (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                gender TEXT NOT NULL,
                faculty_email TEXT NOT NULL,
                status TEXT NOT NULL,
                room_no TEXT,
                applied_at TEXT NOT NULL,
                FOREIGN KEY (room_no) REFERENCES rooms(room_no)
            );
        "#,
    },
    Migration {
        version: 2,
        description: "Add indexes for query performance",
        sql: r#"
            -- Room indexes
            CREATE INDEX IF NOT EXISTS idx_rooms_hostel ON rooms(hostel_no);

            -- Student indexes
            CREATE INDEX IF NOT EXISTS idx_students_batch ON students(batch_no);
            CREATE INDEX IF NOT EXISTS idx_students_room ON students(room_no);

            -- Application indexes
            CREATE INDEX IF NOT EXISTS idx_applications_status ON internship_applications(status);
            CREATE INDEX IF NOT EXISTS idx_applications_faculty ON internship_applications(faculty_email);
        "#,
    },
];

/// Initialize the migrations table
fn init_migrations_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

/// Get the current schema version
fn get_current_version(conn: &Connection) -> Result<u32> {
    let version: Option<u32> = conn
        .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get(0)
        })
        .unwrap_or(None);
    Ok(version.unwrap_or(0))
}

/// Record that a migration was applied
fn record_migration(conn: &Connection, migration: &Migration) -> Result<()> {
    conn.execute(
        "INSERT INTO schema_migrations (version, description, applied_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![
            migration.version,
            migration.description,
            chrono::Utc::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

/// Run all pending migrations
#[instrument(skip(conn))]
pub fn run_migrations(conn: &Connection) -> Result<()> {
    init_migrations_table(conn)?;

    let current_version = get_current_version(conn)?;
    info!(current_version, "Checking for pending migrations");

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                description = migration.description,
                "Applying migration"
            );

            conn.execute_batch(migration.sql)?;
            record_migration(conn, migration)?;

            info!(version = migration.version, "Migration complete");
        }
    }

    let new_version = get_current_version(conn)?;
    if new_version > current_version {
        info!(
            from = current_version,
            to = new_version,
            "Database schema updated"
        );
    }

    Ok(())
}
