//! Project repository: domain queries, deletability rules, assignment and
//! milestone operations.

use std::sync::Arc;

use chrono::Utc;
use workforce_core::error::CoreError;
use workforce_core::types::DbId;

use crate::context::DatabaseContext;
use crate::entity::Entity;
use crate::error::{storage_err, DbResult};
use crate::models::{Project, ProjectAssignment, ProjectMilestone, ProjectStatus};
use crate::query::{like_pattern, Filter};
use crate::repositories::GenericRepository;

pub struct ProjectRepository {
    inner: GenericRepository<Project>,
    assignments: GenericRepository<ProjectAssignment>,
    milestones: GenericRepository<ProjectMilestone>,
}

impl ProjectRepository {
    pub fn new(context: Arc<DatabaseContext>) -> Self {
        Self {
            inner: GenericRepository::new(context.clone()),
            assignments: GenericRepository::new(context.clone()),
            milestones: GenericRepository::new(context),
        }
    }

    /// The underlying CRUD/query engine.
    pub fn generic(&self) -> &GenericRepository<Project> {
        &self.inner
    }

    // -----------------------------------------------------------------
    // Domain queries
    // -----------------------------------------------------------------

    /// Case-insensitive substring search over name, code, and description.
    pub async fn search(&self, term: &str) -> DbResult<Vec<Project>> {
        let sql = format!(
            "SELECT {} FROM projects \
             WHERE lower(name) LIKE ?1 ESCAPE '\\' \
                OR lower(code) LIKE ?1 ESCAPE '\\' \
                OR lower(coalesce(description, '')) LIKE ?1 ESCAPE '\\' \
             ORDER BY name",
            Project::COLUMNS
        );
        let query = sqlx::query_as::<_, Project>(&sql).bind(like_pattern(term));
        self.inner
            .context()
            .fetch_all_as(query)
            .await
            .map_err(|e| storage_err(Project::TABLE, "search", e))
    }

    pub async fn get_by_status(&self, status: ProjectStatus) -> DbResult<Vec<Project>> {
        self.inner
            .find(&Filter::new().eq("status", status.as_str()))
            .await
    }

    pub async fn get_by_department(&self, department_id: DbId) -> DbResult<Vec<Project>> {
        self.inner
            .find(&Filter::new().eq("department_id", department_id))
            .await
    }

    pub async fn get_by_manager(&self, project_manager_id: DbId) -> DbResult<Vec<Project>> {
        self.inner
            .find(&Filter::new().eq("project_manager_id", project_manager_id))
            .await
    }

    /// Projects past their estimated end date that are neither completed nor
    /// cancelled.
    pub async fn get_overdue(&self) -> DbResult<Vec<Project>> {
        let today = Utc::now().date_naive();
        self.inner
            .find(
                &Filter::new()
                    .lt("estimated_end_date", today)
                    .ne("status", ProjectStatus::Completed.as_str())
                    .ne("status", ProjectStatus::Cancelled.as_str()),
            )
            .await
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

    /// A project is deletable only with zero assignments, zero milestones,
    /// and a status other than `InProgress`. `false` for a missing id.
    pub async fn can_delete(&self, id: DbId) -> DbResult<bool> {
        let Some(project) = self.inner.get_by_id(id).await? else {
            return Ok(false);
        };
        if project.status == ProjectStatus::InProgress {
            return Ok(false);
        }
        let assignments = self
            .assignments
            .count(Some(&Filter::new().eq("project_id", id)))
            .await?;
        let milestones = self
            .milestones
            .count(Some(&Filter::new().eq("project_id", id)))
            .await?;
        Ok(assignments == 0 && milestones == 0)
    }

    /// Delete a project, refusing while dependent rows exist or while it is
    /// in progress. `false` when the id does not exist.
    pub async fn delete(&self, id: DbId) -> DbResult<bool> {
        if !self.inner.exists(id).await? {
            return Ok(false);
        }
        if !self.can_delete(id).await? {
            return Err(CoreError::Conflict(format!(
                "project {id} is in progress or still has assignments or milestones"
            ))
            .into());
        }
        self.inner.delete_by_id(id).await
    }

    // -----------------------------------------------------------------
    // Progress
    // -----------------------------------------------------------------

    /// Set progress, clamped into [0, 100]. Clamping is idempotent. Status
    /// is never auto-transitioned here. `false` for a missing id.
    pub async fn update_progress(&self, id: DbId, progress: f64) -> DbResult<bool> {
        if progress.is_nan() {
            return Err(
                CoreError::Validation("progress percentage must be a number".to_string()).into(),
            );
        }
        let Some(mut project) = self.inner.get_by_id(id).await? else {
            return Ok(false);
        };
        project.progress_percentage = progress.clamp(0.0, 100.0);
        Ok(self.inner.update(&project).await?.is_some())
    }

    // -----------------------------------------------------------------
    // Assignments
    // -----------------------------------------------------------------

    /// Assign an employee to a project. Returns `false` when either id is
    /// missing or when an active assignment for the pair already exists
    /// (the idempotency guard for the composite invariant).
    pub async fn assign_employee(
        &self,
        project_id: DbId,
        employee_id: DbId,
        role: &str,
        hourly_rate: Option<f64>,
    ) -> DbResult<bool> {
        if !self.inner.exists(project_id).await? {
            return Ok(false);
        }
        let employee_exists = self
            .employee_exists(employee_id)
            .await
            .map_err(|e| storage_err(ProjectAssignment::TABLE, "assign_employee", e))?;
        if !employee_exists {
            return Ok(false);
        }
        let already_active = self
            .assignments
            .any(&Self::active_pair_filter(project_id, employee_id))
            .await?;
        if already_active {
            return Ok(false);
        }
        let mut assignment = ProjectAssignment::new(project_id, employee_id, role);
        assignment.hourly_rate = hourly_rate;
        self.assignments.add(&assignment).await?;
        Ok(true)
    }

    /// Soft-unassign: mark the active assignment inactive and stamp today's
    /// date, keeping the row for history. `false` when no active assignment
    /// exists for the pair.
    pub async fn unassign_employee(&self, project_id: DbId, employee_id: DbId) -> DbResult<bool> {
        let Some(mut assignment) = self
            .assignments
            .first(&Self::active_pair_filter(project_id, employee_id))
            .await?
        else {
            return Ok(false);
        };
        assignment.is_active = false;
        assignment.unassigned_date = Some(Utc::now().date_naive());
        Ok(self.assignments.update(&assignment).await?.is_some())
    }

    pub async fn get_assignments(&self, project_id: DbId) -> DbResult<Vec<ProjectAssignment>> {
        self.assignments
            .find(&Filter::new().eq("project_id", project_id))
            .await
    }

    fn active_pair_filter(project_id: DbId, employee_id: DbId) -> Filter {
        Filter::new()
            .eq("project_id", project_id)
            .eq("employee_id", employee_id)
            .eq("is_active", true)
    }

    async fn employee_exists(&self, employee_id: DbId) -> Result<bool, sqlx::Error> {
        let query = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM employees WHERE id = ?)",
        )
        .bind(employee_id);
        self.inner.context().fetch_scalar(query).await
    }

    // -----------------------------------------------------------------
    // Milestones
    // -----------------------------------------------------------------

    /// Mark a milestone completed and stamp the completion date. Progress is
    /// deliberately not validated against 100. `false` for a missing id.
    pub async fn complete_milestone(&self, milestone_id: DbId) -> DbResult<bool> {
        let Some(mut milestone) = self.milestones.get_by_id(milestone_id).await? else {
            return Ok(false);
        };
        milestone.is_completed = true;
        milestone.completed_date = Some(Utc::now().date_naive());
        Ok(self.milestones.update(&milestone).await?.is_some())
    }

    pub async fn get_milestones(&self, project_id: DbId) -> DbResult<Vec<ProjectMilestone>> {
        self.milestones
            .find(&Filter::new().eq("project_id", project_id))
            .await
    }
}
