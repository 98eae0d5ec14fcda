use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;

use crate::error::ApiError;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Open the read-write account store, creating the file and schema when
/// missing. Unlike a pre-existing analytics DB, the hub owns this store, so
/// a failure to open it is fatal at startup.
pub fn open_pool(path: &Path, max_size: u32) -> Result<DbPool, ApiError> {
    let manager = SqliteConnectionManager::file(path);
    let pool = Pool::builder()
        .max_size(max_size)
        .build(manager)
        .map_err(|e| ApiError::Db(format!("failed to open {}: {e}", path.display())))?;
    let conn = pool.get()?;
    init_schema(&conn)?;
    Ok(pool)
}

/// Single-connection in-memory pool with the schema applied. One connection
/// because every sqlite memory database is private to its connection.
#[cfg(test)]
pub fn memory_pool() -> DbPool {
    let manager = SqliteConnectionManager::memory();
    let pool = Pool::builder().max_size(1).build(manager).unwrap();
    init_schema(&pool.get().unwrap()).unwrap();
    pool
}

/// Pool whose connections can never open, for exercising read-failure
/// fallbacks. `build_unchecked` defers the failure to `get()`.
#[cfg(test)]
pub fn broken_pool() -> DbPool {
    let manager = SqliteConnectionManager::file("/nonexistent/solera-test/store.db");
    Pool::builder()
        .max_size(1)
        .connection_timeout(std::time::Duration::from_millis(50))
        .build_unchecked(manager)
}

/// Idempotent schema bootstrap. One row per account; ledger entries are the
/// embedded transaction list of the account document.
pub fn init_schema(conn: &Connection) -> Result<(), ApiError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS accounts (
             address         TEXT PRIMARY KEY,
             balance         REAL NOT NULL DEFAULT 0,
             bitcoin_reserve REAL NOT NULL DEFAULT 0,
             bnb_reserve     REAL NOT NULL DEFAULT 0,
             lockup_months   INTEGER NOT NULL DEFAULT 0,
             active_apy      REAL NOT NULL DEFAULT 0,
             updated_at      TEXT NOT NULL
         );
         CREATE TABLE IF NOT EXISTS ledger (
             id       INTEGER PRIMARY KEY AUTOINCREMENT,
             address  TEXT NOT NULL,
             date     TEXT NOT NULL,
             amount   REAL NOT NULL,
             status   TEXT NOT NULL,
             protocol TEXT NOT NULL,
             kind     TEXT NOT NULL
         );
         CREATE INDEX IF NOT EXISTS idx_ledger_address ON ledger(address, id);",
    )?;
    Ok(())
}
