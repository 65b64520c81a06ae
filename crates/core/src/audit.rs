//! Audit constants and helpers.
//!
//! Lives in `core` (zero internal deps) so both the persistence layer and
//! any service or tooling code agree on actor naming and table names.

/// Actor recorded when no caller identity was supplied.
pub const SYSTEM_ACTOR: &str = "System";

/// Table names as recorded in audit log entries.
pub mod table_names {
    pub const EMPLOYEES: &str = "employees";
    pub const DEPARTMENTS: &str = "departments";
    pub const PROJECTS: &str = "projects";
    pub const PROJECT_ASSIGNMENTS: &str = "project_assignments";
    pub const PROJECT_MILESTONES: &str = "project_milestones";
    pub const AUDIT_LOGS: &str = "audit_logs";
}

/// Resolve a caller-supplied actor to the value stored in audit fields.
///
/// Blank or whitespace-only actors fall back to [`SYSTEM_ACTOR`].
pub fn resolve_actor(actor: &str) -> &str {
    let trimmed = actor.trim();
    if trimmed.is_empty() {
        SYSTEM_ACTOR
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_actor_falls_back_to_system() {
        assert_eq!(resolve_actor(""), SYSTEM_ACTOR);
        assert_eq!(resolve_actor("   "), SYSTEM_ACTOR);
    }

    #[test]
    fn named_actor_is_trimmed_and_kept() {
        assert_eq!(resolve_actor(" alice "), "alice");
    }
}
