//! Project milestone entity model.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use workforce_core::types::{DbId, Timestamp};

use crate::entity::{Entity, SqliteQueryAs};

/// A milestone belonging to exactly one project.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct ProjectMilestone {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub due_date: NaiveDate,
    pub is_completed: bool,
    pub completed_date: Option<NaiveDate>,
    pub is_critical: bool,
    /// Always within [0, 100].
    pub progress_percentage: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: String,
    pub updated_by: String,
}

impl ProjectMilestone {
    /// Build a new, not-yet-persisted milestone.
    pub fn new(project_id: DbId, name: impl Into<String>, due_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            project_id,
            name: name.into(),
            description: None,
            due_date,
            is_completed: false,
            completed_date: None,
            is_critical: false,
            progress_percentage: 0.0,
            created_at: now,
            updated_at: now,
            created_by: String::new(),
            updated_by: String::new(),
        }
    }
}

impl Entity for ProjectMilestone {
    const TABLE: &'static str = "project_milestones";

    const COLUMNS: &'static str = "id, project_id, name, description, due_date, is_completed, \
        completed_date, is_critical, progress_percentage, \
        created_at, updated_at, created_by, updated_by";

    const INSERT_COLUMNS: &'static str = "project_id, name, description, due_date, \
        is_completed, completed_date, is_critical, progress_percentage, \
        created_at, updated_at, created_by, updated_by";

    const INSERT_PLACEHOLDERS: &'static str = "?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?";

    const UPDATE_SET: &'static str = "project_id = ?, name = ?, description = ?, due_date = ?, \
        is_completed = ?, completed_date = ?, is_critical = ?, progress_percentage = ?, \
        updated_at = ?, updated_by = ?";

    fn id(&self) -> DbId {
        self.id
    }

    fn bind_insert<'q, O>(&'q self, query: SqliteQueryAs<'q, O>) -> SqliteQueryAs<'q, O> {
        query
            .bind(self.project_id)
            .bind(&self.name)
            .bind(&self.description)
            .bind(self.due_date)
            .bind(self.is_completed)
            .bind(self.completed_date)
            .bind(self.is_critical)
            .bind(self.progress_percentage)
            .bind(self.created_at)
            .bind(self.updated_at)
            .bind(&self.created_by)
            .bind(&self.updated_by)
    }

    fn bind_update<'q, O>(&'q self, query: SqliteQueryAs<'q, O>) -> SqliteQueryAs<'q, O> {
        query
            .bind(self.project_id)
            .bind(&self.name)
            .bind(&self.description)
            .bind(self.due_date)
            .bind(self.is_completed)
            .bind(self.completed_date)
            .bind(self.is_critical)
            .bind(self.progress_percentage)
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
