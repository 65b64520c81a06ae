//! Database context: session ownership, transaction state, audit stamping.
//!
//! One context per logical workflow. The underlying session is not safe for
//! concurrent repository calls, so every statement is serialized through the
//! transaction slot's async mutex: when an explicit transaction is open the
//! statement runs on it, otherwise it runs on the pool and is its own atomic
//! unit.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use sqlx::sqlite::{SqliteArguments, SqlitePool, SqliteQueryResult, SqliteRow};
use sqlx::{FromRow, Sqlite, Transaction};
use tokio::sync::Mutex;
use tracing::warn;
use workforce_core::audit::{resolve_actor, SYSTEM_ACTOR};

use crate::entity::{Entity, SqliteQueryAs};
use crate::error::{storage_err, DbError, DbResult};
use crate::query::SqliteQueryScalar;

pub(crate) type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// Owns the connection pool, the explicit-transaction slot, the acting user
/// identity, and the count of rows written since the last flush report.
pub struct DatabaseContext {
    pool: SqlitePool,
    tx: Mutex<Option<Transaction<'static, Sqlite>>>,
    actor: std::sync::Mutex<String>,
    pending_writes: AtomicI64,
}

impl DatabaseContext {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            tx: Mutex::new(None),
            actor: std::sync::Mutex::new(SYSTEM_ACTOR.to_string()),
            pending_writes: AtomicI64::new(0),
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Set the identity recorded in audit fields. Blank falls back to
    /// `"System"`.
    pub fn set_actor(&self, actor: &str) {
        let resolved = resolve_actor(actor).to_string();
        let mut guard = self
            .actor
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = resolved;
    }

    pub fn actor(&self) -> String {
        self.actor
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    // -----------------------------------------------------------------
    // Statement routing
    // -----------------------------------------------------------------

    pub(crate) async fn fetch_all_as<'q, T>(
        &self,
        query: SqliteQueryAs<'q, T>,
    ) -> Result<Vec<T>, sqlx::Error>
    where
        T: Send + Unpin + for<'r> FromRow<'r, SqliteRow>,
    {
        let mut tx = self.tx.lock().await;
        match tx.as_mut() {
            Some(tx) => query.fetch_all(&mut **tx).await,
            None => query.fetch_all(&self.pool).await,
        }
    }

    pub(crate) async fn fetch_optional_as<'q, T>(
        &self,
        query: SqliteQueryAs<'q, T>,
    ) -> Result<Option<T>, sqlx::Error>
    where
        T: Send + Unpin + for<'r> FromRow<'r, SqliteRow>,
    {
        let mut tx = self.tx.lock().await;
        match tx.as_mut() {
            Some(tx) => query.fetch_optional(&mut **tx).await,
            None => query.fetch_optional(&self.pool).await,
        }
    }

    pub(crate) async fn fetch_one_as<'q, T>(
        &self,
        query: SqliteQueryAs<'q, T>,
    ) -> Result<T, sqlx::Error>
    where
        T: Send + Unpin + for<'r> FromRow<'r, SqliteRow>,
    {
        let mut tx = self.tx.lock().await;
        match tx.as_mut() {
            Some(tx) => query.fetch_one(&mut **tx).await,
            None => query.fetch_one(&self.pool).await,
        }
    }

    pub(crate) async fn fetch_scalar<'q, O>(
        &self,
        query: SqliteQueryScalar<'q, O>,
    ) -> Result<O, sqlx::Error>
    where
        O: Send + Unpin,
        (O,): Send + Unpin + for<'r> FromRow<'r, SqliteRow>,
    {
        let mut tx = self.tx.lock().await;
        match tx.as_mut() {
            Some(tx) => query.fetch_one(&mut **tx).await,
            None => query.fetch_one(&self.pool).await,
        }
    }

    pub(crate) async fn execute<'q>(
        &self,
        query: SqliteQuery<'q>,
    ) -> Result<SqliteQueryResult, sqlx::Error> {
        let mut tx = self.tx.lock().await;
        match tx.as_mut() {
            Some(tx) => query.execute(&mut **tx).await,
            None => query.execute(&self.pool).await,
        }
    }

    /// Record rows written by a mutating statement toward the next flush
    /// report.
    pub(crate) fn record_writes(&self, rows: u64) {
        self.pending_writes.fetch_add(rows as i64, Ordering::Relaxed);
    }

    // -----------------------------------------------------------------
    // Audit stamping
    // -----------------------------------------------------------------

    /// Stamp a newly-added row: creation and update fields both get "now" and
    /// the current actor. Overwrites anything the caller put there.
    pub(crate) fn stamp_for_insert<T: Entity>(&self, row: &mut T) {
        let now = Utc::now();
        let actor = self.actor();
        row.stamp_created(now, &actor);
        row.stamp_updated(now, &actor);
    }

    /// Stamp a modified row. Unconditional: every save advances `updated_at`
    /// even when no field value changed.
    pub(crate) fn stamp_for_update<T: Entity>(&self, row: &mut T) {
        row.stamp_updated(Utc::now(), &self.actor());
    }

    // -----------------------------------------------------------------
    // Transactions
    // -----------------------------------------------------------------

    /// Open an explicit transaction. Fails fast if one is already open.
    pub async fn begin_transaction(&self) -> DbResult<()> {
        let mut tx = self.tx.lock().await;
        if tx.is_some() {
            return Err(DbError::TransactionAlreadyActive);
        }
        *tx = Some(
            self.pool
                .begin()
                .await
                .map_err(|e| storage_err("transaction", "begin", e))?,
        );
        Ok(())
    }

    /// Commit the open transaction. A failed commit is rolled back before the
    /// error reaches the caller.
    pub async fn commit_transaction(&self) -> DbResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard.take().ok_or(DbError::NoActiveTransaction)?;
        self.pending_writes.store(0, Ordering::Relaxed);
        if let Err(source) = tx.commit().await {
            warn!(error = %source, "commit failed; transaction rolled back");
            return Err(storage_err("transaction", "commit", source));
        }
        Ok(())
    }

    /// Roll back the open transaction. With none open this degrades to a
    /// logged no-op.
    pub async fn rollback_transaction(&self) -> DbResult<()> {
        let mut guard = self.tx.lock().await;
        match guard.take() {
            Some(tx) => {
                self.pending_writes.store(0, Ordering::Relaxed);
                tx.rollback()
                    .await
                    .map_err(|e| storage_err("transaction", "rollback", e))
            }
            None => {
                warn!("rollback requested with no active transaction; ignoring");
                Ok(())
            }
        }
    }

    pub async fn in_transaction(&self) -> bool {
        self.tx.lock().await.is_some()
    }

    /// Report and reset the number of rows written since the last flush.
    ///
    /// Statements are pushed to the store as they are issued, so outside an
    /// explicit transaction there is nothing left to send here; the call
    /// exists so callers have one place to observe how much work a unit of
    /// work performed.
    pub async fn save_changes(&self) -> DbResult<i64> {
        Ok(self.pending_writes.swap(0, Ordering::Relaxed))
    }
}
