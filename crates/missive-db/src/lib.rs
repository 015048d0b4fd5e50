//! Database layer for the missive message service.
//!
//! Provides SQLite connection pooling (via `r2d2`), per-connection WAL and
//! busy-timeout setup, and the schema bootstrap for the `messages` table.
//!
//! The pool is built once at process start and handed to the HTTP layer;
//! nothing in this crate holds global state.

mod pool;
mod schema;

pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError};
pub use schema::{init_schema, SchemaError};
