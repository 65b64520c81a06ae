//! Department entity model and statistics result.

use chrono::Utc;
use serde::Serialize;
use sqlx::FromRow;
use workforce_core::types::{DbId, Timestamp};

use crate::entity::{Entity, SqliteQueryAs};

/// A department row from the `departments` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Department {
    pub id: DbId,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub budget: f64,
    pub manager_id: Option<DbId>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: String,
    pub updated_by: String,
}

impl Department {
    /// Build a new, not-yet-persisted department.
    pub fn new(name: impl Into<String>, code: impl Into<String>, budget: f64) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: name.into(),
            code: code.into(),
            description: None,
            budget,
            manager_id: None,
            is_active: true,
            created_at: now,
            updated_at: now,
            created_by: String::new(),
            updated_by: String::new(),
        }
    }
}

impl Entity for Department {
    const TABLE: &'static str = "departments";

    const COLUMNS: &'static str = "id, name, code, description, budget, manager_id, is_active, \
        created_at, updated_at, created_by, updated_by";

    const INSERT_COLUMNS: &'static str = "name, code, description, budget, manager_id, \
        is_active, created_at, updated_at, created_by, updated_by";

    const INSERT_PLACEHOLDERS: &'static str = "?, ?, ?, ?, ?, ?, ?, ?, ?, ?";

    const UPDATE_SET: &'static str = "name = ?, code = ?, description = ?, budget = ?, \
        manager_id = ?, is_active = ?, updated_at = ?, updated_by = ?";

    fn id(&self) -> DbId {
        self.id
    }

    fn bind_insert<'q, O>(&'q self, query: SqliteQueryAs<'q, O>) -> SqliteQueryAs<'q, O> {
        query
            .bind(&self.name)
            .bind(&self.code)
            .bind(&self.description)
            .bind(self.budget)
            .bind(self.manager_id)
            .bind(self.is_active)
            .bind(self.created_at)
            .bind(self.updated_at)
            .bind(&self.created_by)
            .bind(&self.updated_by)
    }

    fn bind_update<'q, O>(&'q self, query: SqliteQueryAs<'q, O>) -> SqliteQueryAs<'q, O> {
        query
            .bind(&self.name)
            .bind(&self.code)
            .bind(&self.description)
            .bind(self.budget)
            .bind(self.manager_id)
            .bind(self.is_active)
            .bind(self.updated_at)
            .bind(&self.updated_by)
    }

    fn stamp_created(&mut self, at: Timestamp, by: &str) {
        self.created_at = at;
        self.created_by = by.to_string();
    }

    fn stamp_updated(&mut self, at: Timestamp, by: &str) {
        self.updated_at = at;
        self.updated_by = by.to_string();
    }
}

/// Aggregate figures for one department. A concrete struct rather than a
/// string-keyed map so the contract is visible in the type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentStatistics {
    pub department_id: DbId,
    /// Active employees only.
    pub employee_count: i64,
    /// Projects not yet completed or cancelled.
    pub active_project_count: i64,
    pub total_salary: f64,
    pub average_salary: f64,
    pub budget: f64,
    /// (salary expense + project actual cost) / budget × 100; `0` when the
    /// budget is zero.
    pub budget_utilization: f64,
}
