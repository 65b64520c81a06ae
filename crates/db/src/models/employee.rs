//! Employee entity model.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use workforce_core::types::{DbId, Timestamp};

use crate::entity::{Entity, SqliteQueryAs};

/// An employee row from the `employees` table.
///
/// `manager_id` is a self-reference forming a reporting tree; cycle freedom
/// is guarded at write time by the employee repository, not by the schema.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Employee {
    pub id: DbId,
    pub employee_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub salary: f64,
    pub hire_date: NaiveDate,
    pub termination_date: Option<NaiveDate>,
    pub is_active: bool,
    pub department_id: DbId,
    pub manager_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub created_by: String,
    pub updated_by: String,
}

impl Employee {
    /// Build a new, not-yet-persisted employee. The id is storage-assigned
    /// and the audit fields are stamped on save.
    pub fn new(
        employee_number: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        department_id: DbId,
        salary: f64,
        hire_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            employee_number: employee_number.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: None,
            position: None,
            salary,
            hire_date,
            termination_date: None,
            is_active: true,
            department_id,
            manager_id: None,
            created_at: now,
            updated_at: now,
            created_by: String::new(),
            updated_by: String::new(),
        }
    }

    /// Display name. Not persisted.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whole years between hire and termination (or today). Not persisted.
    pub fn years_of_service(&self) -> i64 {
        let end = self
            .termination_date
            .unwrap_or_else(|| Utc::now().date_naive());
        ((end - self.hire_date).num_days() / 365).max(0)
    }
}

impl Entity for Employee {
    const TABLE: &'static str = "employees";

    const COLUMNS: &'static str = "id, employee_number, first_name, last_name, email, phone, \
        position, salary, hire_date, termination_date, is_active, department_id, manager_id, \
        created_at, updated_at, created_by, updated_by";

    const INSERT_COLUMNS: &'static str = "employee_number, first_name, last_name, email, phone, \
        position, salary, hire_date, termination_date, is_active, department_id, manager_id, \
        created_at, updated_at, created_by, updated_by";

    const INSERT_PLACEHOLDERS: &'static str = "?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?";

    const UPDATE_SET: &'static str = "employee_number = ?, first_name = ?, last_name = ?, \
        email = ?, phone = ?, position = ?, salary = ?, hire_date = ?, termination_date = ?, \
        is_active = ?, department_id = ?, manager_id = ?, updated_at = ?, updated_by = ?";

    fn id(&self) -> DbId {
        self.id
    }

    fn bind_insert<'q, O>(&'q self, query: SqliteQueryAs<'q, O>) -> SqliteQueryAs<'q, O> {
        query
            .bind(&self.employee_number)
            .bind(&self.first_name)
            .bind(&self.last_name)
            .bind(&self.email)
            .bind(&self.phone)
            .bind(&self.position)
            .bind(self.salary)
            .bind(self.hire_date)
            .bind(self.termination_date)
            .bind(self.is_active)
            .bind(self.department_id)
            .bind(self.manager_id)
            .bind(self.created_at)
            .bind(self.updated_at)
            .bind(&self.created_by)
            .bind(&self.updated_by)
    }

    fn bind_update<'q, O>(&'q self, query: SqliteQueryAs<'q, O>) -> SqliteQueryAs<'q, O> {
        query
            .bind(&self.employee_number)
            .bind(&self.first_name)
            .bind(&self.last_name)
            .bind(&self.email)
            .bind(&self.phone)
            .bind(&self.position)
            .bind(self.salary)
            .bind(self.hire_date)
            .bind(self.termination_date)
            .bind(self.is_active)
            .bind(self.department_id)
            .bind(self.manager_id)
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
