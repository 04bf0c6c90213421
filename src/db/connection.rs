// src/db/connection.rs
//
// Database connection management
//
// PRINCIPLES:
// - Explicit connection pooling
// - No hidden connection creation
// - Clear error propagation
// - Thread-safe access

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Type alias for connection pool
pub type ConnectionPool = Pool<SqliteConnectionManager>;

/// Type alias for a pooled connection
pub type PooledConn = PooledConnection<SqliteConnectionManager>;

/// Default queue database path: {APP_DATA}/adrescue/adrescue.db
pub fn default_database_path() -> AppResult<PathBuf> {
    let app_data_dir = dirs::data_dir()
        .ok_or_else(|| AppError::Other("Could not determine app data directory".to_string()))?;

    let adrescue_dir = app_data_dir.join("adrescue");

    std::fs::create_dir_all(&adrescue_dir).map_err(AppError::Io)?;

    Ok(adrescue_dir.join("adrescue.db"))
}

/// Create a connection pool for the queue database.
///
/// Pool configuration:
/// - SQLite in WAL mode for better concurrency
/// - Foreign keys enabled
/// - Busy timeout set to avoid immediate errors
pub fn create_connection_pool(db_path: &Path) -> AppResult<ConnectionPool> {
    let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(())
    });

    let pool = Pool::builder()
        .max_size(8)
        .build(manager)
        .map_err(|e| AppError::Pool(format!("Failed to create connection pool: {}", e)))?;

    Ok(pool)
}

/// Create an in-memory pool for tests.
///
/// Capped at a single connection: every r2d2 connection to ":memory:" would
/// otherwise open its own private database.
pub fn create_in_memory_pool() -> AppResult<ConnectionPool> {
    let manager = SqliteConnectionManager::memory().with_init(|conn| {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(())
    });

    let pool = Pool::builder()
        .max_size(1)
        .build(manager)
        .map_err(|e| AppError::Pool(format!("Failed to create in-memory pool: {}", e)))?;

    Ok(pool)
}
