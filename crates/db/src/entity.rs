//! The [`Entity`] trait wires table metadata into the generic repository.
//!
//! Each persisted entity declares its table name, column lists, and bind
//! hooks once; [`crate::repositories::GenericRepository`] builds every CRUD
//! statement from them. The stamp setters are how the database context
//! applies audit fields uniformly across entity types.

use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Sqlite};
use workforce_core::types::{DbId, Timestamp};

/// A `query_as` bound to the SQLite driver, as passed to bind hooks.
pub type SqliteQueryAs<'q, O> = sqlx::query::QueryAs<'q, Sqlite, O, SqliteArguments<'q>>;

pub trait Entity:
    Clone + Send + Sync + Unpin + for<'r> FromRow<'r, SqliteRow> + 'static
{
    /// Table name.
    const TABLE: &'static str;

    /// Full column list for SELECT/RETURNING, starting with `id`.
    const COLUMNS: &'static str;

    /// Column list for INSERT. Excludes the storage-assigned `id`.
    const INSERT_COLUMNS: &'static str;

    /// `?` placeholder list matching `INSERT_COLUMNS`.
    const INSERT_PLACEHOLDERS: &'static str;

    /// SET list for full-replace UPDATE. Excludes `id`, `created_at`, and
    /// `created_by`; includes `updated_at`/`updated_by` as the last two
    /// placeholders.
    const UPDATE_SET: &'static str;

    fn id(&self) -> DbId;

    /// Bind every value of `INSERT_COLUMNS`, in order.
    fn bind_insert<'q, O>(&'q self, query: SqliteQueryAs<'q, O>) -> SqliteQueryAs<'q, O>;

    /// Bind every value of `UPDATE_SET`, in order. The repository binds the
    /// row id after this.
    fn bind_update<'q, O>(&'q self, query: SqliteQueryAs<'q, O>) -> SqliteQueryAs<'q, O>;

    fn stamp_created(&mut self, at: Timestamp, by: &str);

    fn stamp_updated(&mut self, at: Timestamp, by: &str);
}
