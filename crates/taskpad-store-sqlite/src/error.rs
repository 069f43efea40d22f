//! Error types for the SQLite task store.

use thiserror::Error;

/// Errors that can occur during `SqliteStore` operations.
#[derive(Error, Debug)]
pub enum SqliteStoreError {
    /// Underlying SQLite failure.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A persisted row failed validation on read.
    #[error("invalid persisted task row: {0}")]
    InvalidRow(String),
}
