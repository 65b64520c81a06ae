//! Project assignment entity model.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use workforce_core::types::{DbId, Timestamp};

use crate::entity::{Entity, SqliteQueryAs};

/// Links one project to one employee.
///
/// At most one *active* assignment may exist per (project, employee) pair;
/// the project repository enforces this at insert time. Unassignment marks
/// the row inactive rather than deleting it, so history stays queryable.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ProjectAssignment {
    pub id: DbId,
    pub project_id: DbId,
    pub employee_id: DbId,
    pub role: String,
    pub hourly_rate: Option<f64>,
    /// Always within [0, 100].
    pub allocation_percentage: f64,
    pub is_active: bool,
    pub assigned_date: NaiveDate,
    pub unassigned_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: String,
    pub updated_by: String,
}

impl ProjectAssignment {
    /// Build a new, not-yet-persisted assignment at 100% allocation,
    /// assigned today.
    pub fn new(project_id: DbId, employee_id: DbId, role: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            project_id,
            employee_id,
            role: role.into(),
            hourly_rate: None,
            allocation_percentage: 100.0,
            is_active: true,
            assigned_date: now.date_naive(),
            unassigned_date: None,
            created_at: now,
            updated_at: now,
            created_by: String::new(),
            updated_by: String::new(),
        }
    }
}

impl Entity for ProjectAssignment {
    const TABLE: &'static str = "project_assignments";

    const COLUMNS: &'static str = "id, project_id, employee_id, role, hourly_rate, \
        allocation_percentage, is_active, assigned_date, unassigned_date, \
        created_at, updated_at, created_by, updated_by";

    const INSERT_COLUMNS: &'static str = "project_id, employee_id, role, hourly_rate, \
        allocation_percentage, is_active, assigned_date, unassigned_date, \
        created_at, updated_at, created_by, updated_by";

    const INSERT_PLACEHOLDERS: &'static str = "?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?";

    const UPDATE_SET: &'static str = "project_id = ?, employee_id = ?, role = ?, \
        hourly_rate = ?, allocation_percentage = ?, is_active = ?, assigned_date = ?, \
        unassigned_date = ?, updated_at = ?, updated_by = ?";

    fn id(&self) -> DbId {
        self.id
    }

    fn bind_insert<'q, O>(&'q self, query: SqliteQueryAs<'q, O>) -> SqliteQueryAs<'q, O> {
        query
            .bind(self.project_id)
            .bind(self.employee_id)
            .bind(&self.role)
            .bind(self.hourly_rate)
            .bind(self.allocation_percentage)
            .bind(self.is_active)
            .bind(self.assigned_date)
            .bind(self.unassigned_date)
            .bind(self.created_at)
            .bind(self.updated_at)
            .bind(&self.created_by)
            .bind(&self.updated_by)
    }

    fn bind_update<'q, O>(&'q self, query: SqliteQueryAs<'q, O>) -> SqliteQueryAs<'q, O> {
        query
            .bind(self.project_id)
            .bind(self.employee_id)
            .bind(&self.role)
            .bind(self.hourly_rate)
            .bind(self.allocation_percentage)
            .bind(self.is_active)
            .bind(self.assigned_date)
            .bind(self.unassigned_date)
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
