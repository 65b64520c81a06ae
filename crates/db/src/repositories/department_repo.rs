//! Department repository: domain queries, deletability rules, and aggregate
//! statistics.

use std::sync::Arc;

use workforce_core::error::CoreError;
use workforce_core::types::DbId;

use crate::context::DatabaseContext;
use crate::entity::Entity;
use crate::error::{storage_err, DbResult};
use crate::models::{Department, DepartmentStatistics};
use crate::query::{like_pattern, Filter};
use crate::repositories::GenericRepository;

pub struct DepartmentRepository {
    inner: GenericRepository<Department>,
}

impl DepartmentRepository {
    pub fn new(context: Arc<DatabaseContext>) -> Self {
        Self {
            inner: GenericRepository::new(context),
        }
    }

    /// The underlying CRUD/query engine.
    pub fn generic(&self) -> &GenericRepository<Department> {
        &self.inner
    }

    // -----------------------------------------------------------------
    // Domain queries
    // -----------------------------------------------------------------

    /// Case-insensitive substring search over name, code, and description.
    pub async fn search(&self, term: &str) -> DbResult<Vec<Department>> {
        let sql = format!(
            "SELECT {} FROM departments \
             WHERE lower(name) LIKE ?1 ESCAPE '\\' \
                OR lower(code) LIKE ?1 ESCAPE '\\' \
                OR lower(coalesce(description, '')) LIKE ?1 ESCAPE '\\' \
             ORDER BY name",
            Department::COLUMNS
        );
        let query = sqlx::query_as::<_, Department>(&sql).bind(like_pattern(term));
        self.inner
            .context()
            .fetch_all_as(query)
            .await
            .map_err(|e| storage_err(Department::TABLE, "search", e))
    }

    pub async fn get_active(&self) -> DbResult<Vec<Department>> {
        self.inner.find(&Filter::new().eq("is_active", true)).await
    }

    /// Whether `code` is free (case-insensitively), excluding the record
    /// being edited.
    pub async fn is_code_unique(&self, code: &str, exclude_id: Option<DbId>) -> DbResult<bool> {
        let mut filter = Filter::new().eq_ci("code", code);
        if let Some(id) = exclude_id {
            filter = filter.ne("id", id);
        }
        Ok(self.inner.count(Some(&filter)).await? == 0)
    }

    // -----------------------------------------------------------------
    // Deletability
    // -----------------------------------------------------------------

    /// A department is deletable only with zero employees and zero projects.
    pub async fn can_delete(&self, id: DbId) -> DbResult<bool> {
        let sql = "SELECT \
            (SELECT COUNT(*) FROM employees WHERE department_id = ?1) + \
            (SELECT COUNT(*) FROM projects WHERE department_id = ?1)";
        let query = sqlx::query_scalar::<_, i64>(sql).bind(id);
        let dependents = self
            .inner
            .context()
            .fetch_scalar(query)
            .await
            .map_err(|e| storage_err(Department::TABLE, "can_delete", e))?;
        Ok(dependents == 0)
    }

    /// Delete a department, refusing while dependent rows exist. `false`
    /// when the id does not exist.
    pub async fn delete(&self, id: DbId) -> DbResult<bool> {
        if !self.inner.exists(id).await? {
            return Ok(false);
        }
        if !self.can_delete(id).await? {
            return Err(CoreError::Conflict(format!(
                "department {id} still has employees or projects"
            ))
            .into());
        }
        self.inner.delete_by_id(id).await
    }

    // -----------------------------------------------------------------
    // Business transitions
    // -----------------------------------------------------------------

    pub async fn activate(&self, id: DbId) -> DbResult<bool> {
        self.set_active_flag(id, true).await
    }

    pub async fn deactivate(&self, id: DbId) -> DbResult<bool> {
        self.set_active_flag(id, false).await
    }

    async fn set_active_flag(&self, id: DbId, active: bool) -> DbResult<bool> {
        let Some(mut department) = self.inner.get_by_id(id).await? else {
            return Ok(false);
        };
        department.is_active = active;
        Ok(self.inner.update(&department).await?.is_some())
    }

    // -----------------------------------------------------------------
    // Statistics
    // -----------------------------------------------------------------

    /// Aggregate figures for one department; `None` when the id is missing.
    pub async fn get_statistics(&self, id: DbId) -> DbResult<Option<DepartmentStatistics>> {
        let Some(department) = self.inner.get_by_id(id).await? else {
            return Ok(None);
        };
        let sql = "SELECT \
            (SELECT COUNT(*) FROM employees \
                WHERE department_id = ?1 AND is_active = 1), \
            (SELECT COUNT(*) FROM projects \
                WHERE department_id = ?1 AND status NOT IN ('completed', 'cancelled')), \
            (SELECT COALESCE(SUM(salary), 0.0) FROM employees \
                WHERE department_id = ?1 AND is_active = 1), \
            (SELECT COALESCE(AVG(salary), 0.0) FROM employees \
                WHERE department_id = ?1 AND is_active = 1), \
            (SELECT COALESCE(SUM(actual_cost), 0.0) FROM projects \
                WHERE department_id = ?1)";
        let query = sqlx::query_as::<_, (i64, i64, f64, f64, f64)>(sql).bind(id);
        let (employee_count, active_project_count, total_salary, average_salary, project_cost) =
            self.inner
                .context()
                .fetch_one_as(query)
                .await
                .map_err(|e| storage_err(Department::TABLE, "get_statistics", e))?;

        let budget_utilization = if department.budget > 0.0 {
            (total_salary + project_cost) / department.budget * 100.0
        } else {
            0.0
        };

        Ok(Some(DepartmentStatistics {
            department_id: id,
            employee_count,
            active_project_count,
            total_salary,
            average_salary,
            budget: department.budget,
            budget_utilization,
        }))
    }

    /// Budget utilization alone. `0` for a missing department or a zero
    /// budget.
    pub async fn get_budget_utilization(&self, id: DbId) -> DbResult<f64> {
        Ok(self
            .get_statistics(id)
            .await?
            .map(|stats| stats.budget_utilization)
            .unwrap_or(0.0))
    }
}
