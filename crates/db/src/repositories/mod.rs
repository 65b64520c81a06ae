//! Repository layer.
//!
//! [`GenericRepository`] carries the CRUD/query/pagination engine for a
//! single entity type; the specialized repositories wrap it with domain
//! queries and business transitions. All repositories obtained from one
//! unit of work share its database context, so they see (and participate
//! in) the same explicit transaction.

pub mod audit_repo;
pub mod department_repo;
pub mod employee_repo;
pub mod generic_repo;
pub mod project_repo;

pub use audit_repo::AuditLogRepository;
pub use department_repo::DepartmentRepository;
pub use employee_repo::EmployeeRepository;
pub use generic_repo::GenericRepository;
pub use project_repo::ProjectRepository;
