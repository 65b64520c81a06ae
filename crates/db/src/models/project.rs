//! Project entity model and status/priority enumerations.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use workforce_core::types::{DbId, Timestamp};

use crate::entity::{Entity, SqliteQueryAs};

/// Lifecycle state of a project. Stored as snake_case TEXT.
///
/// The repository never transitions status automatically; moving to
/// `Completed` when progress hits 100 is a service-layer policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planning,
    InProgress,
    OnHold,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planning => "planning",
            Self::InProgress => "in_progress",
            Self::OnHold => "on_hold",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Scheduling priority. Stored as snake_case TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl ProjectPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

/// A project row from the `projects` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub priority: ProjectPriority,
    pub budget: f64,
    pub actual_cost: f64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub estimated_end_date: Option<NaiveDate>,
    /// Always within [0, 100].
    pub progress_percentage: f64,
    pub department_id: DbId,
    pub project_manager_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: String,
    pub updated_by: String,
}

impl Project {
    /// Build a new, not-yet-persisted project in `Planning` state.
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        department_id: DbId,
        budget: f64,
        start_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name: name.into(),
            code: code.into(),
            description: None,
            status: ProjectStatus::Planning,
            priority: ProjectPriority::Medium,
            budget,
            actual_cost: 0.0,
            start_date,
            end_date: None,
            estimated_end_date: None,
            progress_percentage: 0.0,
            department_id,
            project_manager_id: None,
            created_at: now,
            updated_at: now,
            created_by: String::new(),
            updated_by: String::new(),
        }
    }
}

impl Entity for Project {
    const TABLE: &'static str = "projects";

    const COLUMNS: &'static str = "id, name, code, description, status, priority, budget, \
        actual_cost, start_date, end_date, estimated_end_date, progress_percentage, \
        department_id, project_manager_id, created_at, updated_at, created_by, updated_by";

    const INSERT_COLUMNS: &'static str = "name, code, description, status, priority, budget, \
        actual_cost, start_date, end_date, estimated_end_date, progress_percentage, \
        department_id, project_manager_id, created_at, updated_at, created_by, updated_by";

    const INSERT_PLACEHOLDERS: &'static str = "?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?";

    const UPDATE_SET: &'static str = "name = ?, code = ?, description = ?, status = ?, \
        priority = ?, budget = ?, actual_cost = ?, start_date = ?, end_date = ?, \
        estimated_end_date = ?, progress_percentage = ?, department_id = ?, \
        project_manager_id = ?, updated_at = ?, updated_by = ?";

    fn id(&self) -> DbId {
        self.id
    }

    fn bind_insert<'q, O>(&'q self, query: SqliteQueryAs<'q, O>) -> SqliteQueryAs<'q, O> {
        query
            .bind(&self.name)
            .bind(&self.code)
            .bind(&self.description)
            .bind(self.status)
            .bind(self.priority)
            .bind(self.budget)
            .bind(self.actual_cost)
            .bind(self.start_date)
            .bind(self.end_date)
            .bind(self.estimated_end_date)
            .bind(self.progress_percentage)
            .bind(self.department_id)
            .bind(self.project_manager_id)
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
            .bind(self.status)
            .bind(self.priority)
            .bind(self.budget)
            .bind(self.actual_cost)
            .bind(self.start_date)
            .bind(self.end_date)
            .bind(self.estimated_end_date)
            .bind(self.progress_percentage)
            .bind(self.department_id)
            .bind(self.project_manager_id)
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
