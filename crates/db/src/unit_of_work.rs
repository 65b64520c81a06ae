//! Unit of work: one context, one set of repositories, one transaction scope.

use std::sync::{Arc, OnceLock};

use sqlx::SqlitePool;

use crate::context::DatabaseContext;
use crate::entity::Entity;
use crate::error::DbResult;
use crate::models::{ProjectAssignment, ProjectMilestone};
use crate::repositories::{
    AuditLogRepository, DepartmentRepository, EmployeeRepository, GenericRepository,
    ProjectRepository,
};

/// Facade over one [`DatabaseContext`] and lazily-created repositories.
///
/// Every repository handed out by one unit of work shares the same context,
/// so all of them route statements into the same explicit transaction when
/// one is open. Dropping the unit of work with a transaction still open
/// drops the underlying transaction, which rolls it back.
pub struct UnitOfWork {
    context: Arc<DatabaseContext>,
    employees: OnceLock<EmployeeRepository>,
    departments: OnceLock<DepartmentRepository>,
    projects: OnceLock<ProjectRepository>,
    project_assignments: OnceLock<GenericRepository<ProjectAssignment>>,
    project_milestones: OnceLock<GenericRepository<ProjectMilestone>>,
    audit_logs: OnceLock<AuditLogRepository>,
}

impl UnitOfWork {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            context: Arc::new(DatabaseContext::new(pool)),
            employees: OnceLock::new(),
            departments: OnceLock::new(),
            projects: OnceLock::new(),
            project_assignments: OnceLock::new(),
            project_milestones: OnceLock::new(),
            audit_logs: OnceLock::new(),
        }
    }

    pub fn context(&self) -> &Arc<DatabaseContext> {
        &self.context
    }

    /// Identity stamped into audit fields by every subsequent write.
    pub fn set_actor(&self, actor: &str) {
        self.context.set_actor(actor);
    }

    // -----------------------------------------------------------------
    // Repositories
    // -----------------------------------------------------------------

    pub fn employees(&self) -> &EmployeeRepository {
        self.employees
            .get_or_init(|| EmployeeRepository::new(self.context.clone()))
    }

    pub fn departments(&self) -> &DepartmentRepository {
        self.departments
            .get_or_init(|| DepartmentRepository::new(self.context.clone()))
    }

    pub fn projects(&self) -> &ProjectRepository {
        self.projects
            .get_or_init(|| ProjectRepository::new(self.context.clone()))
    }

    pub fn project_assignments(&self) -> &GenericRepository<ProjectAssignment> {
        self.project_assignments
            .get_or_init(|| GenericRepository::new(self.context.clone()))
    }

    pub fn project_milestones(&self) -> &GenericRepository<ProjectMilestone> {
        self.project_milestones
            .get_or_init(|| GenericRepository::new(self.context.clone()))
    }

    pub fn audit_logs(&self) -> &AuditLogRepository {
        self.audit_logs
            .get_or_init(|| AuditLogRepository::new(self.context.clone()))
    }

    /// An ad-hoc generic repository for any entity type, sharing this unit
    /// of work's context and transaction scope.
    pub fn repository<T: Entity>(&self) -> GenericRepository<T> {
        GenericRepository::new(self.context.clone())
    }

    // -----------------------------------------------------------------
    // Transaction scope
    // -----------------------------------------------------------------

    pub async fn begin_transaction(&self) -> DbResult<()> {
        self.context.begin_transaction().await
    }

    pub async fn commit_transaction(&self) -> DbResult<()> {
        self.context.commit_transaction().await
    }

    pub async fn rollback_transaction(&self) -> DbResult<()> {
        self.context.rollback_transaction().await
    }

    pub async fn in_transaction(&self) -> bool {
        self.context.in_transaction().await
    }

    /// Report and reset the count of rows written since the last call.
    pub async fn save_changes(&self) -> DbResult<i64> {
        self.context.save_changes().await
    }
}
