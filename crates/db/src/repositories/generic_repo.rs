//! Type-parameterized CRUD, query, pagination, and bulk-operation engine.

use std::marker::PhantomData;
use std::sync::Arc;

use workforce_core::types::DbId;

use crate::context::DatabaseContext;
use crate::entity::Entity;
use crate::error::{storage_err, DbError, DbResult};
use crate::query::{bind_values_as, bind_values_scalar, Filter, OrderBy};

/// Single-entity-type CRUD and query surface.
///
/// Every write persists immediately; when the owning context has an explicit
/// transaction open, the write joins it instead of auto-committing.
pub struct GenericRepository<T: Entity> {
    context: Arc<DatabaseContext>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Entity> Clone for GenericRepository<T> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Entity> GenericRepository<T> {
    pub fn new(context: Arc<DatabaseContext>) -> Self {
        Self {
            context,
            _marker: PhantomData,
        }
    }

    pub fn context(&self) -> &Arc<DatabaseContext> {
        &self.context
    }

    fn fault(operation: &'static str, source: sqlx::Error) -> DbError {
        storage_err(T::TABLE, operation, source)
    }

    // -----------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------

    /// Fetch by id. `None` for a missing id, never an error.
    pub async fn get_by_id(&self, id: DbId) -> DbResult<Option<T>> {
        let sql = format!("SELECT {} FROM {} WHERE id = ?", T::COLUMNS, T::TABLE);
        let query = sqlx::query_as::<_, T>(&sql).bind(id);
        self.context
            .fetch_optional_as(query)
            .await
            .map_err(|e| Self::fault("get_by_id", e))
    }

    /// All rows, in storage order.
    pub async fn get_all(&self) -> DbResult<Vec<T>> {
        let sql = format!("SELECT {} FROM {}", T::COLUMNS, T::TABLE);
        let query = sqlx::query_as::<_, T>(&sql);
        self.context
            .fetch_all_as(query)
            .await
            .map_err(|e| Self::fault("get_all", e))
    }

    pub async fn find(&self, filter: &Filter) -> DbResult<Vec<T>> {
        let sql = format!(
            "SELECT {} FROM {} {}",
            T::COLUMNS,
            T::TABLE,
            filter.where_clause()
        );
        let query = bind_values_as(sqlx::query_as::<_, T>(&sql), filter.values());
        self.context
            .fetch_all_as(query)
            .await
            .map_err(|e| Self::fault("find", e))
    }

    pub async fn first(&self, filter: &Filter) -> DbResult<Option<T>> {
        let sql = format!(
            "SELECT {} FROM {} {} LIMIT 1",
            T::COLUMNS,
            T::TABLE,
            filter.where_clause()
        );
        let query = bind_values_as(sqlx::query_as::<_, T>(&sql), filter.values());
        self.context
            .fetch_optional_as(query)
            .await
            .map_err(|e| Self::fault("first", e))
    }

    pub async fn any(&self, filter: &Filter) -> DbResult<bool> {
        Ok(self.count(Some(filter)).await? > 0)
    }

    pub async fn count(&self, filter: Option<&Filter>) -> DbResult<i64> {
        let where_clause = filter.map(Filter::where_clause).unwrap_or_default();
        let sql = format!("SELECT COUNT(*) FROM {} {}", T::TABLE, where_clause);
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        if let Some(filter) = filter {
            query = bind_values_scalar(query, filter.values());
        }
        self.context
            .fetch_scalar(query)
            .await
            .map_err(|e| Self::fault("count", e))
    }

    pub async fn exists(&self, id: DbId) -> DbResult<bool> {
        let sql = format!("SELECT EXISTS (SELECT 1 FROM {} WHERE id = ?)", T::TABLE);
        let query = sqlx::query_scalar::<_, bool>(&sql).bind(id);
        self.context
            .fetch_scalar(query)
            .await
            .map_err(|e| Self::fault("exists", e))
    }

    /// One page of rows plus the total count of the *filtered* set.
    ///
    /// `page` is 1-based; filtering is applied before counting, ordering
    /// after filtering, pagination after ordering.
    pub async fn get_paged(
        &self,
        page: i64,
        page_size: i64,
        filter: Option<&Filter>,
        order: Option<&OrderBy>,
    ) -> DbResult<(Vec<T>, i64)> {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let total = self.count(filter).await?;

        let where_clause = filter.map(Filter::where_clause).unwrap_or_default();
        let order_clause = order.map(OrderBy::clause).unwrap_or_default();
        let sql = format!(
            "SELECT {} FROM {} {} {} LIMIT ? OFFSET ?",
            T::COLUMNS,
            T::TABLE,
            where_clause,
            order_clause
        );
        let mut query = sqlx::query_as::<_, T>(&sql);
        if let Some(filter) = filter {
            query = bind_values_as(query, filter.values());
        }
        let query = query.bind(page_size).bind((page - 1) * page_size);
        let items = self
            .context
            .fetch_all_as(query)
            .await
            .map_err(|e| Self::fault("get_paged", e))?;
        Ok((items, total))
    }

    // -----------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------

    /// Insert a row, returning it with its storage-assigned id and stamped
    /// audit fields.
    pub async fn add(&self, entity: &T) -> DbResult<T> {
        let mut row = entity.clone();
        self.context.stamp_for_insert(&mut row);
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
            T::TABLE,
            T::INSERT_COLUMNS,
            T::INSERT_PLACEHOLDERS,
            T::COLUMNS
        );
        let query = row.bind_insert(sqlx::query_as::<_, T>(&sql));
        let created = self
            .context
            .fetch_one_as(query)
            .await
            .map_err(|e| Self::fault("add", e))?;
        self.context.record_writes(1);
        Ok(created)
    }

    pub async fn add_range(&self, entities: &[T]) -> DbResult<Vec<T>> {
        let mut created = Vec::with_capacity(entities.len());
        for entity in entities {
            created.push(self.add(entity).await?);
        }
        Ok(created)
    }

    /// Full-record replace: every business field of the stored row is
    /// overwritten from `entity`, so callers must re-supply unchanged fields.
    /// Returns `None` when the id does not exist.
    pub async fn update(&self, entity: &T) -> DbResult<Option<T>> {
        let mut row = entity.clone();
        self.context.stamp_for_update(&mut row);
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ? RETURNING {}",
            T::TABLE,
            T::UPDATE_SET,
            T::COLUMNS
        );
        let query = row.bind_update(sqlx::query_as::<_, T>(&sql)).bind(row.id());
        let updated = self
            .context
            .fetch_optional_as(query)
            .await
            .map_err(|e| Self::fault("update", e))?;
        if updated.is_some() {
            self.context.record_writes(1);
        }
        Ok(updated)
    }

    /// Update each entity in turn, returning how many rows existed.
    pub async fn update_range(&self, entities: &[T]) -> DbResult<i64> {
        let mut updated = 0;
        for entity in entities {
            if self.update(entity).await?.is_some() {
                updated += 1;
            }
        }
        Ok(updated)
    }

    /// Hard delete. `false` when the id did not exist. Side effects on
    /// dependent rows (cascade / restrict / set-null) are schema policy.
    pub async fn delete_by_id(&self, id: DbId) -> DbResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ?", T::TABLE);
        let result = self
            .context
            .execute(sqlx::query(&sql).bind(id))
            .await
            .map_err(|e| Self::fault("delete", e))?;
        let deleted = result.rows_affected() > 0;
        if deleted {
            self.context.record_writes(result.rows_affected());
        }
        Ok(deleted)
    }

    pub async fn delete(&self, entity: &T) -> DbResult<bool> {
        self.delete_by_id(entity.id()).await
    }

    pub async fn delete_range(&self, entities: &[T]) -> DbResult<i64> {
        let mut deleted = 0;
        for entity in entities {
            if self.delete(entity).await? {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    // -----------------------------------------------------------------
    // Bulk operations
    // -----------------------------------------------------------------

    /// Load the matching rows, then delete them one by one. Atomicity across
    /// the batch comes only from the surrounding transaction.
    pub async fn bulk_delete(&self, filter: &Filter) -> DbResult<i64> {
        let rows = self.find(filter).await?;
        let mut deleted = 0;
        for row in &rows {
            if self.delete_by_id(row.id()).await? {
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    /// Load the matching rows, apply `transform`, and persist each one.
    pub async fn bulk_update<F>(&self, filter: &Filter, mut transform: F) -> DbResult<i64>
    where
        F: FnMut(&mut T),
    {
        let rows = self.find(filter).await?;
        let mut updated = 0;
        for mut row in rows {
            transform(&mut row);
            if self.update(&row).await?.is_some() {
                updated += 1;
            }
        }
        Ok(updated)
    }
}
