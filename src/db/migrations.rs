// src/db/migrations.rs
//
// Database schema initialization and migrations
//
// PRINCIPLES:
// - Explicit schema versions
// - No automatic migrations
// - Clear error messages
// - Idempotent operations

use crate::error::{AppError, AppResult};
use rusqlite::Connection;

/// Current schema version
/// Increment this when adding migrations
const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema.
///
/// Safe to call multiple times (idempotent).
pub fn initialize_database(conn: &Connection) -> AppResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        apply_initial_schema(conn)?;
        set_schema_version(conn, 1)?;
    } else if current_version < CURRENT_SCHEMA_VERSION {
        return Err(AppError::Other(format!(
            "Schema version {} is outdated. Expected {}. Manual migration required.",
            current_version, CURRENT_SCHEMA_VERSION
        )));
    } else if current_version > CURRENT_SCHEMA_VERSION {
        return Err(AppError::Other(format!(
            "Schema version {} is newer than supported {}. Update the application.",
            current_version, CURRENT_SCHEMA_VERSION
        )));
    }

    Ok(())
}

/// Get current schema version.
/// Returns 0 if the schema_version table doesn't exist (fresh database).
fn get_schema_version(conn: &Connection) -> AppResult<i32> {
    let table_exists: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )
        .map_err(AppError::Database)?;

    if !table_exists {
        return Ok(0);
    }

    let version: Option<i32> = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get(0)
        })
        .map_err(AppError::Database)?;

    Ok(version.unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> AppResult<()> {
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (?1, datetime('now'))",
        [version],
    )
    .map_err(AppError::Database)?;

    Ok(())
}

/// Apply initial schema (version 1), embedded from schema.sql.
fn apply_initial_schema(conn: &Connection) -> AppResult<()> {
    let schema = include_str!("../../schema.sql");

    conn.execute_batch(schema)
        .map_err(|e| AppError::Other(format!("Failed to apply initial schema: {}", e)))?;

    Ok(())
}

/// Run SQLite's integrity check.
pub fn verify_database_integrity(conn: &Connection) -> AppResult<()> {
    let result: String = conn
        .query_row("PRAGMA integrity_check", [], |row| row.get(0))
        .map_err(AppError::Database)?;

    if result != "ok" {
        return Err(AppError::Other(format!(
            "Database integrity check failed: {}",
            result
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_in_memory_pool;

    #[test]
    fn test_initialize_is_idempotent() {
        let pool = create_in_memory_pool().unwrap();
        let conn = pool.get().unwrap();

        initialize_database(&conn).unwrap();
        initialize_database(&conn).unwrap();

        let version = get_schema_version(&conn).unwrap();
        assert_eq!(version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_schema_creates_queue_table() {
        let pool = create_in_memory_pool().unwrap();
        let conn = pool.get().unwrap();
        initialize_database(&conn).unwrap();

        let exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='queue_items')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(exists);

        verify_database_integrity(&conn).unwrap();
    }
}
