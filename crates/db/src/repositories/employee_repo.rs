//! Employee repository: domain queries and business transitions on top of
//! the generic engine.

use std::sync::Arc;

use chrono::Utc;
use workforce_core::error::CoreError;
use workforce_core::types::DbId;

use crate::context::DatabaseContext;
use crate::entity::Entity;
use crate::error::{storage_err, DbResult};
use crate::models::Employee;
use crate::query::{like_pattern, Filter};
use crate::repositories::GenericRepository;

/// Depth bound for the ancestor walk when validating manager assignments.
const MAX_MANAGER_DEPTH: usize = 64;

pub struct EmployeeRepository {
    inner: GenericRepository<Employee>,
}

impl EmployeeRepository {
    pub fn new(context: Arc<DatabaseContext>) -> Self {
        Self {
            inner: GenericRepository::new(context),
        }
    }

    /// The underlying CRUD/query engine.
    pub fn generic(&self) -> &GenericRepository<Employee> {
        &self.inner
    }

    // -----------------------------------------------------------------
    // Domain queries
    // -----------------------------------------------------------------

    /// Case-insensitive substring search over number, name, email, and
    /// position.
    pub async fn search(&self, term: &str) -> DbResult<Vec<Employee>> {
        let sql = format!(
            "SELECT {} FROM employees \
             WHERE lower(employee_number) LIKE ?1 ESCAPE '\\' \
                OR lower(first_name) LIKE ?1 ESCAPE '\\' \
                OR lower(last_name) LIKE ?1 ESCAPE '\\' \
                OR lower(email) LIKE ?1 ESCAPE '\\' \
                OR lower(coalesce(position, '')) LIKE ?1 ESCAPE '\\' \
             ORDER BY last_name, first_name",
            Employee::COLUMNS
        );
        let query = sqlx::query_as::<_, Employee>(&sql).bind(like_pattern(term));
        self.inner
            .context()
            .fetch_all_as(query)
            .await
            .map_err(|e| storage_err(Employee::TABLE, "search", e))
    }

    pub async fn get_active(&self) -> DbResult<Vec<Employee>> {
        self.inner.find(&Filter::new().eq("is_active", true)).await
    }

    pub async fn get_inactive(&self) -> DbResult<Vec<Employee>> {
        self.inner.find(&Filter::new().eq("is_active", false)).await
    }

    pub async fn get_by_department(&self, department_id: DbId) -> DbResult<Vec<Employee>> {
        self.inner
            .find(&Filter::new().eq("department_id", department_id))
            .await
    }

    /// Direct reports of one manager.
    pub async fn get_by_manager(&self, manager_id: DbId) -> DbResult<Vec<Employee>> {
        self.inner
            .find(&Filter::new().eq("manager_id", manager_id))
            .await
    }

    /// Roots of the reporting trees: employees with no manager.
    pub async fn get_top_level(&self) -> DbResult<Vec<Employee>> {
        self.inner.find(&Filter::new().is_null("manager_id")).await
    }

    /// Employees carrying a termination date, whether or not they have been
    /// reactivated since.
    pub async fn get_terminated(&self) -> DbResult<Vec<Employee>> {
        self.inner
            .find(&Filter::new().is_not_null("termination_date"))
            .await
    }

    /// Employees whose position contains `term`, case-insensitively.
    pub async fn get_by_position(&self, term: &str) -> DbResult<Vec<Employee>> {
        self.inner
            .find(&Filter::new().contains("position", term))
            .await
    }

    // -----------------------------------------------------------------
    // Uniqueness checks
    // -----------------------------------------------------------------

    /// Whether `email` is free (case-insensitively). `exclude_id` skips the
    /// record being edited so an unchanged email does not self-collide.
    pub async fn is_email_unique(&self, email: &str, exclude_id: Option<DbId>) -> DbResult<bool> {
        self.is_field_unique("email", email, exclude_id).await
    }

    pub async fn is_employee_number_unique(
        &self,
        employee_number: &str,
        exclude_id: Option<DbId>,
    ) -> DbResult<bool> {
        self.is_field_unique("employee_number", employee_number, exclude_id)
            .await
    }

    async fn is_field_unique(
        &self,
        column: &str,
        value: &str,
        exclude_id: Option<DbId>,
    ) -> DbResult<bool> {
        let mut filter = Filter::new().eq_ci(column, value);
        if let Some(id) = exclude_id {
            filter = filter.ne("id", id);
        }
        Ok(self.inner.count(Some(&filter)).await? == 0)
    }

    // -----------------------------------------------------------------
    // Business transitions
    // -----------------------------------------------------------------

    /// Re-enable an employee. The termination date is deliberately left in
    /// place as last-termination history.
    pub async fn activate(&self, id: DbId) -> DbResult<bool> {
        let Some(mut employee) = self.inner.get_by_id(id).await? else {
            return Ok(false);
        };
        employee.is_active = true;
        Ok(self.inner.update(&employee).await?.is_some())
    }

    /// Soft-disable an employee and stamp today's date as termination.
    pub async fn deactivate(&self, id: DbId) -> DbResult<bool> {
        let Some(mut employee) = self.inner.get_by_id(id).await? else {
            return Ok(false);
        };
        employee.is_active = false;
        employee.termination_date = Some(Utc::now().date_naive());
        Ok(self.inner.update(&employee).await?.is_some())
    }

    /// Assign (or clear) an employee's manager.
    ///
    /// Rejects assignments that would close a reporting cycle, checked by a
    /// bounded walk up the prospective manager's chain. Returns `false` when
    /// the employee or the manager does not exist.
    pub async fn set_manager(&self, employee_id: DbId, manager_id: Option<DbId>) -> DbResult<bool> {
        let Some(mut employee) = self.inner.get_by_id(employee_id).await? else {
            return Ok(false);
        };
        if let Some(manager_id) = manager_id {
            if !self.inner.exists(manager_id).await? {
                return Ok(false);
            }
            if manager_id == employee_id || self.is_ancestor(employee_id, manager_id).await? {
                return Err(CoreError::Validation(format!(
                    "manager assignment would create a reporting cycle for employee {employee_id}"
                ))
                .into());
            }
        }
        employee.manager_id = manager_id;
        Ok(self.inner.update(&employee).await?.is_some())
    }

    /// Walk up the manager chain from `start`, checking whether `target`
    /// appears among its ancestors. An exhausted depth bound counts as
    /// cyclic rather than risking accepting one.
    async fn is_ancestor(&self, target: DbId, start: DbId) -> DbResult<bool> {
        let mut current = Some(start);
        for _ in 0..MAX_MANAGER_DEPTH {
            let Some(id) = current else {
                return Ok(false);
            };
            if id == target {
                return Ok(true);
            }
            current = match self.inner.get_by_id(id).await? {
                Some(employee) => employee.manager_id,
                None => None,
            };
        }
        Ok(true)
    }
}
