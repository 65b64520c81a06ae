//! Entity models.
//!
//! Plain rows plus constructors for not-yet-persisted records. Audit fields
//! (`created_at`/`updated_at`/`created_by`/`updated_by`) exist on every
//! entity and are stamped by the database context on save; values supplied
//! by callers are overwritten.

pub mod assignment;
pub mod audit;
pub mod department;
pub mod employee;
pub mod milestone;
pub mod project;

pub use assignment::ProjectAssignment;
pub use audit::{AuditAction, AuditLog, AuditLogPage, AuditLogQuery, NewAuditLog};
pub use department::{Department, DepartmentStatistics};
pub use employee::Employee;
pub use milestone::ProjectMilestone;
pub use project::{Project, ProjectPriority, ProjectStatus};
