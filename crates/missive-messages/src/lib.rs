//! Message model and persistence for the missive service.
//!
//! A [`Message`] is an `(id, text)` pair stored in the `messages` table
//! created by `missive-db`. Every operation here is a single SQL statement
//! on a borrowed connection; callers decide which connection (and which
//! thread) to run it on.
//!
//! Update and delete report the number of affected rows instead of failing
//! on a missing id. Whether "nothing matched" matters is the caller's call.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;
use thiserror::Error;

mod wire;

/// Errors that can occur during message operations.
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("{0}")]
    Database(#[from] rusqlite::Error),
    #[error("message not found: {0}")]
    NotFound(i64),
}

/// A stored message.
///
/// On the wire the text is carried under `message`. Decoding is lenient
/// (absent or `null` fields stay zero, keys ignore case); see `wire.rs`.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Message {
    /// Store-assigned row ID; `0` before insertion.
    pub id: i64,
    /// Message body.
    #[serde(rename = "message")]
    pub text: String,
}

impl Message {
    pub fn new(id: i64, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
        }
    }
}

/// Lists every stored message in ascending ID (insertion) order.
pub fn list_messages(conn: &Connection) -> Result<Vec<Message>, MessageError> {
    let mut stmt = conn.prepare("SELECT id, message FROM messages ORDER BY id ASC")?;

    let rows = stmt.query_map([], map_row_to_message)?;
    let mut messages = Vec::new();
    for row in rows {
        messages.push(row?);
    }
    Ok(messages)
}

/// Retrieves a single message by ID.
pub fn get_message(conn: &Connection, id: i64) -> Result<Message, MessageError> {
    conn.query_row(
        "SELECT id, message FROM messages WHERE id = ?1",
        [id],
        map_row_to_message,
    )
    .optional()?
    .ok_or(MessageError::NotFound(id))
}

/// Inserts a new message and returns it with the store-assigned ID.
pub fn create_message(conn: &Connection, text: &str) -> Result<Message, MessageError> {
    let id: i64 = conn.query_row(
        "INSERT INTO messages (message) VALUES (?1) RETURNING id",
        [text],
        |row| row.get(0),
    )?;

    tracing::debug!(id, "message created");

    Ok(Message::new(id, text))
}

/// Replaces the text of the message with `message.id`.
///
/// Returns the number of rows changed: `0` when no message has that ID.
pub fn update_message(conn: &Connection, message: &Message) -> Result<usize, MessageError> {
    let affected = conn.execute(
        "UPDATE messages SET message = ?1 WHERE id = ?2",
        params![message.text, message.id],
    )?;
    Ok(affected)
}

/// Deletes the message with the given ID.
///
/// Returns the number of rows removed: `0` when no message has that ID.
pub fn delete_message(conn: &Connection, id: i64) -> Result<usize, MessageError> {
    let affected = conn.execute("DELETE FROM messages WHERE id = ?1", [id])?;
    Ok(affected)
}

fn map_row_to_message(row: &Row) -> rusqlite::Result<Message> {
    Ok(Message {
        id: row.get(0)?,
        text: row.get(1)?,
    })
}
