//! Append-only audit log repository.
//!
//! Entries are written through the context so they join any open explicit
//! transaction, and `performed_by` defaults to the context actor. There is
//! no update path: history is immutable.

use std::sync::Arc;

use chrono::Utc;
use workforce_core::types::DbId;

use crate::context::DatabaseContext;
use crate::error::{storage_err, DbResult};
use crate::models::{AuditLog, AuditLogPage, AuditLogQuery, NewAuditLog};
use crate::query::{bind_values_as, bind_values_scalar, Filter};

const TABLE: &str = "audit_logs";

const COLUMNS: &str = "id, action, table_name, record_id, performed_by, \
    employee_id, timestamp, old_values, new_values, is_success, \
    error_message, created_at, updated_at, created_by, updated_by";

const INSERT_COLUMNS: &str = "action, table_name, record_id, performed_by, \
    employee_id, old_values, new_values, is_success, error_message, \
    timestamp, created_at, updated_at, created_by, updated_by";

const MAX_PAGE_SIZE: i64 = 500;
const DEFAULT_PAGE_SIZE: i64 = 50;

pub struct AuditLogRepository {
    context: Arc<DatabaseContext>,
}

impl AuditLogRepository {
    pub fn new(context: Arc<DatabaseContext>) -> Self {
        Self { context }
    }

    // -----------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------

    /// Append one entry, returning the stored row.
    pub async fn append(&self, entry: &NewAuditLog) -> DbResult<AuditLog> {
        let mut created = self.append_batch(std::slice::from_ref(entry)).await?;
        created.pop().ok_or_else(|| {
            storage_err(TABLE, "append", sqlx::Error::RowNotFound)
        })
    }

    /// Append a batch in one multi-row INSERT, returning the stored rows.
    pub async fn append_batch(&self, entries: &[NewAuditLog]) -> DbResult<Vec<AuditLog>> {
        if entries.is_empty() {
            return Ok(Vec::new());
        }
        let now = Utc::now();
        let actor = self.context.actor();

        let row_placeholders = vec!["(?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"; entries.len()];
        let sql = format!(
            "INSERT INTO {TABLE} ({INSERT_COLUMNS}) VALUES {} RETURNING {COLUMNS}",
            row_placeholders.join(", ")
        );
        let mut query = sqlx::query_as::<_, AuditLog>(&sql);
        for entry in entries {
            query = query
                .bind(entry.action)
                .bind(entry.table_name.as_str())
                .bind(entry.record_id)
                .bind(entry.performed_by.as_deref().unwrap_or(actor.as_str()))
                .bind(entry.employee_id)
                .bind(entry.old_values.as_ref())
                .bind(entry.new_values.as_ref())
                .bind(entry.is_success)
                .bind(entry.error_message.as_deref())
                .bind(now)
                .bind(now)
                .bind(now)
                .bind(actor.as_str())
                .bind(actor.as_str());
        }
        let created = self
            .context
            .fetch_all_as(query)
            .await
            .map_err(|e| storage_err(TABLE, "append_batch", e))?;
        self.context.record_writes(created.len() as u64);
        Ok(created)
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    /// Filtered page of entries, newest first, plus the filtered total.
    pub async fn query(&self, params: &AuditLogQuery) -> DbResult<AuditLogPage> {
        let total = self.count(params).await?;

        let filter = Self::build_filter(params);
        let limit = params
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = params.offset.unwrap_or(0).max(0);
        let sql = format!(
            "SELECT {COLUMNS} FROM {TABLE} {} \
             ORDER BY timestamp DESC, id DESC LIMIT ? OFFSET ?",
            filter.where_clause()
        );
        let query = bind_values_as(sqlx::query_as::<_, AuditLog>(&sql), filter.values())
            .bind(limit)
            .bind(offset);
        let items = self
            .context
            .fetch_all_as(query)
            .await
            .map_err(|e| storage_err(TABLE, "query", e))?;
        Ok(AuditLogPage { items, total })
    }

    /// Total entries matching the filter, ignoring limit/offset.
    pub async fn count(&self, params: &AuditLogQuery) -> DbResult<i64> {
        let filter = Self::build_filter(params);
        let sql = format!("SELECT COUNT(*) FROM {TABLE} {}", filter.where_clause());
        let query = bind_values_scalar(sqlx::query_scalar::<_, i64>(&sql), filter.values());
        self.context
            .fetch_scalar(query)
            .await
            .map_err(|e| storage_err(TABLE, "count", e))
    }

    /// All entries attributed to one employee, newest first.
    pub async fn find_by_employee(&self, employee_id: DbId) -> DbResult<Vec<AuditLog>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM {TABLE} \
             WHERE employee_id = ? ORDER BY timestamp DESC, id DESC"
        );
        let query = sqlx::query_as::<_, AuditLog>(&sql).bind(employee_id);
        self.context
            .fetch_all_as(query)
            .await
            .map_err(|e| storage_err(TABLE, "find_by_employee", e))
    }

    fn build_filter(params: &AuditLogQuery) -> Filter {
        let mut filter = Filter::new();
        if let Some(action) = params.action {
            filter = filter.eq("action", action.as_str());
        }
        if let Some(table_name) = &params.table_name {
            filter = filter.eq("table_name", table_name.as_str());
        }
        if let Some(record_id) = params.record_id {
            filter = filter.eq("record_id", record_id);
        }
        if let Some(performed_by) = &params.performed_by {
            filter = filter.eq("performed_by", performed_by.as_str());
        }
        if let Some(employee_id) = params.employee_id {
            filter = filter.eq("employee_id", employee_id);
        }
        if let Some(from) = params.from {
            filter = filter.ge("timestamp", from);
        }
        if let Some(to) = params.to {
            filter = filter.le("timestamp", to);
        }
        filter
    }
}
