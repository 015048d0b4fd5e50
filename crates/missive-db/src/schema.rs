//! Schema bootstrap for the message store.
//!
//! There is exactly one table and no versioning: startup executes the
//! embedded `schema.sql`, which only creates what is missing.

use rusqlite::Connection;
use thiserror::Error;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Errors that can occur while creating the schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to create messages table: {0}")]
    Create(#[from] rusqlite::Error),
}

/// Ensures the `messages` table exists. Safe to call on every start.
///
/// # Errors
///
/// Returns `SchemaError::Create` if the statement fails, e.g. because the
/// file is read-only or not a SQLite database.
pub fn init_schema(conn: &Connection) -> Result<(), SchemaError> {
    conn.execute_batch(SCHEMA_SQL)?;
    tracing::debug!("messages table ready");
    Ok(())
}
