//! Integration tests for case-insensitive uniqueness checks.
//!
//! The checks answer "is this value free?" before a save; `exclude_id` lets
//! an edit keep its own current value without reporting a self-collision.

use sqlx::SqlitePool;

mod common;
use common::{make_department, make_employee, make_project, uow};

// ---------------------------------------------------------------------------
// Test: employee email and number are checked case-insensitively
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_employee_uniqueness_is_case_insensitive(pool: SqlitePool) {
    let uow = uow(pool);
    let department = make_department(&uow, "Engineering", "ENG", 100_000.0).await;
    make_employee(&uow, department.id, "EMP100", "Ada", "Lovelace", 50_000.0).await;

    let employees = uow.employees();
    assert!(!employees
        .is_email_unique("ADA.LOVELACE@WORKFORCE.LOCAL", None)
        .await
        .unwrap());
    assert!(!employees.is_employee_number_unique("emp100", None).await.unwrap());

    assert!(employees
        .is_email_unique("fresh@workforce.local", None)
        .await
        .unwrap());
    assert!(employees.is_employee_number_unique("EMP200", None).await.unwrap());
}

// ---------------------------------------------------------------------------
// Test: exclude_id lets a record keep its own value
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_exclude_id_skips_own_record(pool: SqlitePool) {
    let uow = uow(pool);
    let department = make_department(&uow, "Engineering", "ENG", 100_000.0).await;
    let ada = make_employee(&uow, department.id, "EMP100", "Ada", "Lovelace", 50_000.0).await;
    let grace = make_employee(&uow, department.id, "EMP101", "Grace", "Hopper", 60_000.0).await;

    let employees = uow.employees();
    assert!(
        employees
            .is_email_unique(&ada.email, Some(ada.id))
            .await
            .unwrap(),
        "an unchanged email must not collide with itself"
    );
    assert!(
        !employees
            .is_email_unique(&ada.email, Some(grace.id))
            .await
            .unwrap(),
        "another record's email is still taken"
    );
}

// ---------------------------------------------------------------------------
// Test: department and project codes follow the same contract
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_code_uniqueness_for_departments_and_projects(pool: SqlitePool) {
    let uow = uow(pool);
    let department = make_department(&uow, "Engineering", "ENG", 100_000.0).await;
    let project = make_project(&uow, department.id, "Portal", "PRT1").await;

    assert!(!uow.departments().is_code_unique("eng", None).await.unwrap());
    assert!(uow
        .departments()
        .is_code_unique("ENG", Some(department.id))
        .await
        .unwrap());
    assert!(uow.departments().is_code_unique("OPS", None).await.unwrap());

    assert!(!uow.projects().is_code_unique("prt1", None).await.unwrap());
    assert!(uow
        .projects()
        .is_code_unique("PRT1", Some(project.id))
        .await
        .unwrap());
    assert!(uow.projects().is_code_unique("PRT2", None).await.unwrap());
}
