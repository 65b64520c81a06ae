//! Audit log entity model and query DTOs.
//!
//! Audit logs are append-only: there is no update path anywhere in the
//! layer, and the repository exposes none. The `employee_id` reference is
//! nulled (not cascaded) when the employee is deleted, so history survives.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use workforce_core::types::{DbId, Timestamp};

/// Kind of action recorded in an audit entry. Stored as snake_case TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Read,
    Update,
    Delete,
    Login,
    Logout,
    Export,
    Import,
    Backup,
    Restore,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Login => "login",
            Self::Logout => "logout",
            Self::Export => "export",
            Self::Import => "import",
            Self::Backup => "backup",
            Self::Restore => "restore",
        }
    }
}

/// A single audit log entry. Immutable once created.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct AuditLog {
    pub id: DbId,
    pub action: AuditAction,
    pub table_name: String,
    pub record_id: Option<DbId>,
    pub performed_by: String,
    pub employee_id: Option<DbId>,
    pub timestamp: Timestamp,
    /// Serialized snapshot of the record before the action, if any.
    pub old_values: Option<serde_json::Value>,
    /// Serialized snapshot after the action, if any.
    pub new_values: Option<serde_json::Value>,
    pub is_success: bool,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: String,
    pub updated_by: String,
}

/// DTO for appending a new audit log entry.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAuditLog {
    pub action: AuditAction,
    pub table_name: String,
    pub record_id: Option<DbId>,
    /// Defaults to the context actor when `None`.
    pub performed_by: Option<String>,
    pub employee_id: Option<DbId>,
    pub old_values: Option<serde_json::Value>,
    pub new_values: Option<serde_json::Value>,
    pub is_success: bool,
    pub error_message: Option<String>,
}

impl NewAuditLog {
    /// A successful action against a table.
    pub fn success(action: AuditAction, table_name: impl Into<String>) -> Self {
        Self {
            action,
            table_name: table_name.into(),
            record_id: None,
            performed_by: None,
            employee_id: None,
            old_values: None,
            new_values: None,
            is_success: true,
            error_message: None,
        }
    }

    /// A failed action with its error message.
    pub fn failure(
        action: AuditAction,
        table_name: impl Into<String>,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            error_message: Some(error_message.into()),
            is_success: false,
            ..Self::success(action, table_name)
        }
    }

    pub fn with_record(mut self, record_id: DbId) -> Self {
        self.record_id = Some(record_id);
        self
    }

    pub fn with_employee(mut self, employee_id: DbId) -> Self {
        self.employee_id = Some(employee_id);
        self
    }

    pub fn with_snapshots(
        mut self,
        old_values: Option<serde_json::Value>,
        new_values: Option<serde_json::Value>,
    ) -> Self {
        self.old_values = old_values;
        self.new_values = new_values;
        self
    }
}

/// Filter parameters for querying audit logs.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditLogQuery {
    pub action: Option<AuditAction>,
    pub table_name: Option<String>,
    pub record_id: Option<DbId>,
    pub performed_by: Option<String>,
    pub employee_id: Option<DbId>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Paginated response for audit log queries.
#[derive(Debug, Clone, Serialize)]
pub struct AuditLogPage {
    pub items: Vec<AuditLog>,
    pub total: i64,
}
