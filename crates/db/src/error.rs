//! Storage-layer error taxonomy.
//!
//! Not-found is never an error here: lookups return `Option`/`bool`. Errors
//! are reserved for storage faults, transaction-state misuse, and domain
//! rejections raised by business checks.

use sqlx::migrate::MigrateError;
use thiserror::Error;
use workforce_core::error::CoreError;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    /// An unexpected failure from the backing store, annotated with the
    /// entity and operation it occurred in. Logged at the raise site, never
    /// masked.
    #[error("storage operation failed: {entity}.{operation}")]
    Storage {
        entity: &'static str,
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("a transaction is already in progress")]
    TransactionAlreadyActive,

    #[error("no active transaction")]
    NoActiveTransaction,

    #[error("migration failed")]
    Migrate(#[from] MigrateError),

    #[error(transparent)]
    Domain(#[from] CoreError),
}

/// Log a storage fault with its entity/operation context, then wrap it.
pub(crate) fn storage_err(
    entity: &'static str,
    operation: &'static str,
    source: sqlx::Error,
) -> DbError {
    tracing::error!(entity, operation, error = %source, "storage operation failed");
    DbError::Storage {
        entity,
        operation,
        source,
    }
}
