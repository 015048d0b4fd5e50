//! Handlers for the `/messages` endpoint.
//!
//! Each HTTP verb decodes its request into a [`MessageOp`], which
//! [`execute`] runs against a single connection. `execute` knows nothing
//! about HTTP, so the store behavior can be tested without a router.

use crate::api::ApiError;
use crate::AppState;
use axum::{
    body::Body,
    extract::{rejection::QueryRejection, Extension, Query},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use missive_db::DbPool;
use missive_messages::{create_message, delete_message, list_messages, update_message, Message};
use rusqlite::Connection;
use std::sync::Arc;

/// Maximum request body size (2 MiB). Larger bodies are treated as unreadable.
pub const MAX_REQUEST_BODY_BYTES: usize = 2 * 1024 * 1024;

/// One operation on the message store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOp {
    List,
    /// Insert a new message; the payload `id` is ignored.
    Create(Message),
    /// Replace the text of `id`. A missing row is not an error.
    Update(Message),
    /// Remove `id`. A missing row is not an error.
    Delete(i64),
}

/// Outcome of a [`MessageOp`], ready to be written as a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageReply {
    Listed(Vec<Message>),
    Created(Message),
    Updated(Message),
    Deleted(Message),
}

impl IntoResponse for MessageReply {
    fn into_response(self) -> Response {
        match self {
            MessageReply::Listed(messages) => Json(messages).into_response(),
            MessageReply::Created(message) => (StatusCode::CREATED, Json(message)).into_response(),
            MessageReply::Updated(message) | MessageReply::Deleted(message) => {
                Json(message).into_response()
            }
        }
    }
}

/// Runs one operation against the store.
///
/// Update and delete answer with the requested message whether or not a
/// row matched; the affected count only reaches the debug log.
pub fn execute(conn: &Connection, op: MessageOp) -> Result<MessageReply, ApiError> {
    match op {
        MessageOp::List => Ok(MessageReply::Listed(list_messages(conn)?)),
        MessageOp::Create(message) => {
            let created = create_message(conn, &message.text)?;
            Ok(MessageReply::Created(created))
        }
        MessageOp::Update(message) => {
            let affected = update_message(conn, &message)?;
            tracing::debug!(id = message.id, affected, "message update applied");
            Ok(MessageReply::Updated(message))
        }
        MessageOp::Delete(id) => {
            let affected = delete_message(conn, id)?;
            tracing::debug!(id, affected, "message delete applied");
            Ok(MessageReply::Deleted(Message::new(id, "")))
        }
    }
}

/// Checks out a pooled connection on the blocking pool and runs `op` there.
async fn run(pool: &DbPool, op: MessageOp) -> Result<MessageReply, ApiError> {
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let conn = pool.get()?;
        execute(&conn, op)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("task join error: {}", e)))?
}

/// Reads the whole body and decodes it as a [`Message`]. A `null` body
/// decodes to an empty message.
pub async fn decode_message(body: Body) -> Result<Message, ApiError> {
    let bytes = axum::body::to_bytes(body, MAX_REQUEST_BODY_BYTES)
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, "request body could not be read");
            ApiError::UnreadableBody
        })?;

    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::debug!(error = %e, "request body is not a message");
        ApiError::MalformedBody
    })
}

/// Parses the `id` query parameter as a signed integer.
pub fn parse_id(raw: Option<&str>) -> Result<i64, ApiError> {
    raw.and_then(|s| s.parse().ok()).ok_or(ApiError::InvalidId)
}

/// The first value of `key` in a decoded query string. Later repeats are
/// ignored.
pub fn first_query_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// GET /messages
pub async fn list_messages_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<MessageReply, ApiError> {
    run(&state.pool, MessageOp::List).await
}

/// POST /messages
pub async fn create_message_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Body,
) -> Result<MessageReply, ApiError> {
    let message = decode_message(body).await?;
    let reply = run(&state.pool, MessageOp::Create(message)).await?;
    if let MessageReply::Created(ref created) = reply {
        tracing::info!(id = created.id, "message created");
    }
    Ok(reply)
}

/// PUT /messages
pub async fn update_message_handler(
    Extension(state): Extension<Arc<AppState>>,
    body: Body,
) -> Result<MessageReply, ApiError> {
    let message = decode_message(body).await?;
    run(&state.pool, MessageOp::Update(message)).await
}

/// DELETE /messages?id=N
pub async fn delete_message_handler(
    Extension(state): Extension<Arc<AppState>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<MessageReply, ApiError> {
    let pairs = query.map(|Query(pairs)| pairs).unwrap_or_default();
    let id = parse_id(first_query_value(&pairs, "id"))?;
    run(&state.pool, MessageOp::Delete(id)).await
}

/// Any other method on /messages.
pub async fn method_not_allowed_handler() -> ApiError {
    ApiError::MethodNotAllowed
}
