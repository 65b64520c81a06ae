//! Persistence core for the workforce management application.
//!
//! The layering, leaf-first: entity models ([`models`]) → database context
//! ([`context`], session ownership + audit stamping) → generic repository
//! ([`repositories::GenericRepository`]) → specialized repositories →
//! unit of work ([`UnitOfWork`]).
//!
//! Every write is persisted as it is issued; wrapping calls in an explicit
//! transaction on the owning [`UnitOfWork`] is what groups them into one
//! atomic unit.

pub mod config;
pub mod context;
pub mod entity;
pub mod error;
pub mod models;
pub mod query;
pub mod repositories;
pub mod seed;
pub mod unit_of_work;

pub use config::{create_pool, DatabaseConfig};
pub use context::DatabaseContext;
pub use error::{DbError, DbResult};
pub use unit_of_work::UnitOfWork;

use sqlx::SqlitePool;

/// Apply all pending migrations.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Cheap connectivity probe.
pub async fn health_check(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}
