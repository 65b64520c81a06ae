//! Baseline reference data: four departments, five employees, two projects.
//!
//! Seeding is idempotent (`INSERT OR IGNORE` on fixed ids) and lives outside
//! the migrations so a freshly-migrated database starts empty.

use tracing::info;

use crate::context::DatabaseContext;
use crate::error::{storage_err, DbResult};

const SEED_STAMP: &str = "2024-01-01T00:00:00+00:00";

pub async fn apply(context: &DatabaseContext) -> DbResult<()> {
    for sql in department_statements() {
        run(context, &sql).await?;
    }
    for sql in employee_statements() {
        run(context, &sql).await?;
    }
    // Managers exist now; close the department -> manager references.
    run(
        context,
        "UPDATE departments SET manager_id = 1 WHERE id = 1 AND manager_id IS NULL",
    )
    .await?;
    run(
        context,
        "UPDATE departments SET manager_id = 3 WHERE id = 2 AND manager_id IS NULL",
    )
    .await?;
    for sql in project_statements() {
        run(context, &sql).await?;
    }
    info!("seed data applied");
    Ok(())
}

async fn run(context: &DatabaseContext, sql: &str) -> DbResult<()> {
    context
        .execute(sqlx::query(sql))
        .await
        .map_err(|e| storage_err("seed", "apply", e))?;
    Ok(())
}

fn department_statements() -> Vec<String> {
    [
        (1, "Information Technology", "IT", 500_000.0),
        (2, "Human Resources", "HR", 200_000.0),
        (3, "Finance", "FIN", 300_000.0),
        (4, "Marketing", "MKT", 250_000.0),
    ]
    .into_iter()
    .map(|(id, name, code, budget)| {
        format!(
            "INSERT OR IGNORE INTO departments \
             (id, name, code, description, budget, manager_id, is_active, \
              created_at, updated_at, created_by, updated_by) \
             VALUES ({id}, '{name}', '{code}', NULL, {budget}, NULL, 1, \
                     '{SEED_STAMP}', '{SEED_STAMP}', 'System', 'System')"
        )
    })
    .collect()
}

fn employee_statements() -> Vec<String> {
    [
        (1, "EMP001", "James", "Wilson", "james.wilson@example.com", "IT Director", 95_000.0, 1, "NULL"),
        (2, "EMP002", "Sarah", "Chen", "sarah.chen@example.com", "Senior Developer", 78_000.0, 1, "1"),
        (3, "EMP003", "Maria", "Garcia", "maria.garcia@example.com", "HR Manager", 67_000.0, 2, "1"),
        (4, "EMP004", "David", "Kim", "david.kim@example.com", "Financial Analyst", 61_000.0, 3, "1"),
        (5, "EMP005", "Emma", "Brown", "emma.brown@example.com", "Marketing Specialist", 54_000.0, 4, "1"),
    ]
    .into_iter()
    .map(
        |(id, number, first, last, email, position, salary, department_id, manager_id)| {
            format!(
                "INSERT OR IGNORE INTO employees \
                 (id, employee_number, first_name, last_name, email, phone, \
                  position, salary, hire_date, termination_date, is_active, \
                  department_id, manager_id, \
                  created_at, updated_at, created_by, updated_by) \
                 VALUES ({id}, '{number}', '{first}', '{last}', '{email}', NULL, \
                         '{position}', {salary}, '2023-01-15', NULL, 1, \
                         {department_id}, {manager_id}, \
                         '{SEED_STAMP}', '{SEED_STAMP}', 'System', 'System')"
            )
        },
    )
    .collect()
}

fn project_statements() -> Vec<String> {
    vec![
        format!(
            "INSERT OR IGNORE INTO projects \
             (id, name, code, description, status, priority, department_id, \
              project_manager_id, budget, actual_cost, progress_percentage, \
              start_date, end_date, estimated_end_date, \
              created_at, updated_at, created_by, updated_by) \
             VALUES (1, 'Employee Portal Development', 'EPD2024', NULL, \
                     'in_progress', 'high', 1, 1, 150000.0, 42000.0, 35.0, \
                     '2024-01-08', NULL, '2024-09-30', \
                     '{SEED_STAMP}', '{SEED_STAMP}', 'System', 'System')"
        ),
        format!(
            "INSERT OR IGNORE INTO projects \
             (id, name, code, description, status, priority, department_id, \
              project_manager_id, budget, actual_cost, progress_percentage, \
              start_date, end_date, estimated_end_date, \
              created_at, updated_at, created_by, updated_by) \
             VALUES (2, 'HR System Migration', 'HSM2024', NULL, \
                     'planning', 'medium', 2, 2, 80000.0, 0.0, 0.0, \
                     '2024-03-01', NULL, '2024-12-15', \
                     '{SEED_STAMP}', '{SEED_STAMP}', 'System', 'System')"
        ),
    ]
}
