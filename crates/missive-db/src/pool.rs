//! Connection pool creation and configuration.

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::time::Duration;
use thiserror::Error;

/// Runtime tunables for SQLite connection behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DbRuntimeSettings {
    pub busy_timeout_ms: u64,
    pub pool_max_size: u32,
}

impl Default for DbRuntimeSettings {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5_000,
            pool_max_size: 8,
        }
    }
}

/// The shared store handle: a pool of SQLite connections.
pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Debug, Error)]
pub enum PoolError {
    #[error("failed to open message store: {0}")]
    PoolInit(#[from] r2d2::Error),
}

/// Puts a fresh connection in WAL mode and sets its busy timeout.
///
/// The returned journal mode is only logged: in-memory databases stay in
/// `memory` mode and that is fine for them.
fn prepare_connection(conn: &Connection, busy_timeout: Duration) -> rusqlite::Result<()> {
    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    conn.busy_timeout(busy_timeout)?;
    tracing::trace!(journal_mode = %mode, "connection prepared");
    Ok(())
}

/// Opens (or creates) the SQLite file at `db_path` behind a connection pool.
///
/// Use `:memory:` for an in-memory database. Each pooled connection then
/// gets its own private database, so callers that need one shared
/// in-memory store must set `pool_max_size` to 1.
///
/// # Errors
///
/// Returns `PoolError::PoolInit` if no connection can be opened and
/// prepared.
pub fn create_pool(db_path: &str, settings: DbRuntimeSettings) -> Result<DbPool, PoolError> {
    let busy_timeout = Duration::from_millis(settings.busy_timeout_ms);
    let manager = SqliteConnectionManager::file(db_path)
        .with_init(move |conn| prepare_connection(conn, busy_timeout));

    let pool = Pool::builder()
        .max_size(settings.pool_max_size)
        .build(manager)?;

    tracing::debug!(
        path = db_path,
        max_size = settings.pool_max_size,
        "message store pool ready"
    );
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pragma<T: rusqlite::types::FromSql>(conn: &Connection, name: &str) -> T {
        conn.pragma_query_value(None, name, |row| row.get(0))
            .expect("pragma query")
    }

    #[test]
    fn in_memory_pool_applies_settings() {
        let settings = DbRuntimeSettings {
            busy_timeout_ms: 2_500,
            pool_max_size: 1,
        };

        let pool = create_pool(":memory:", settings).expect("pool creation should succeed");
        let conn = pool.get().expect("should get a connection");

        assert_eq!(pragma::<String>(&conn, "journal_mode"), "memory");
        assert_eq!(pragma::<i64>(&conn, "busy_timeout"), 2_500);
        assert_eq!(pool.max_size(), 1);
    }

    #[test]
    fn file_pool_runs_in_wal_mode() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let path = dir.path().join("messages.db");
        let path_str = path.to_str().expect("temp path should be utf-8");

        let pool = create_pool(path_str, DbRuntimeSettings::default())
            .expect("pool creation should succeed");
        let conn = pool.get().expect("should get a connection");

        assert_eq!(pragma::<String>(&conn, "journal_mode"), "wal");
        assert_eq!(pragma::<i64>(&conn, "busy_timeout"), 5_000);
        assert!(path.exists(), "database file should be created on open");
    }
}
