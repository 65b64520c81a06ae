//! Integration tests for the generic repository's CRUD surface.
//!
//! Exercises add/get/update/delete against a real database to verify that:
//! - Inserted rows come back with a storage-assigned id and stamped audit fields
//! - Updates are full-record replaces and advance `updated_at`
//! - Lookups for missing ids are `None`/`false`, never errors
//! - Bulk operations report how many rows they touched

use sqlx::SqlitePool;
use workforce_db::models::Employee;
use workforce_db::query::Filter;

mod common;
use common::{make_department, make_employee, uow};

// ---------------------------------------------------------------------------
// Test: add assigns id and stamps audit fields
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_add_assigns_id_and_stamps_audit_fields(pool: SqlitePool) {
    let uow = uow(pool);
    uow.set_actor("alice");
    let department = make_department(&uow, "Engineering", "ENG", 100_000.0).await;

    let created = make_employee(&uow, department.id, "EMP100", "Ada", "Lovelace", 50_000.0).await;
    assert!(created.id > 0, "storage should assign a positive id");
    assert_eq!(created.created_by, "alice");
    assert_eq!(created.updated_by, "alice");
    assert_eq!(created.created_at, created.updated_at);

    let fetched = uow
        .employees()
        .generic()
        .get_by_id(created.id)
        .await
        .unwrap()
        .expect("row should exist after add");
    assert_eq!(fetched, created);
}

// ---------------------------------------------------------------------------
// Test: update replaces the record and advances updated_at
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_update_replaces_record_and_advances_updated_at(pool: SqlitePool) {
    let uow = uow(pool);
    let department = make_department(&uow, "Engineering", "ENG", 100_000.0).await;
    let mut employee =
        make_employee(&uow, department.id, "EMP100", "Ada", "Lovelace", 50_000.0).await;
    let first_stamp = employee.updated_at;

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    employee.salary = 55_000.0;
    employee.position = Some("Staff Engineer".to_string());
    let updated = uow
        .employees()
        .generic()
        .update(&employee)
        .await
        .unwrap()
        .expect("update of an existing row should return it");

    assert_eq!(updated.salary, 55_000.0);
    assert_eq!(updated.position.as_deref(), Some("Staff Engineer"));
    assert!(
        updated.updated_at > first_stamp,
        "updated_at should advance on every save"
    );
    assert_eq!(
        updated.created_at, employee.created_at,
        "created_at must never move after insert"
    );
}

// ---------------------------------------------------------------------------
// Test: missing ids are None / false, not errors
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_missing_ids_are_not_errors(pool: SqlitePool) {
    let uow = uow(pool);
    let repo = uow.employees().generic();

    assert!(repo.get_by_id(9999).await.unwrap().is_none());
    assert!(!repo.exists(9999).await.unwrap());
    assert!(
        !repo.delete_by_id(9999).await.unwrap(),
        "deleting a missing id should report false"
    );

    let department = make_department(&uow, "Engineering", "ENG", 100_000.0).await;
    let mut ghost = Employee::new(
        "EMP999",
        "No",
        "Body",
        "nobody@workforce.local",
        department.id,
        1.0,
        common::hire_date(),
    );
    ghost.id = 9999;
    assert!(
        repo.update(&ghost).await.unwrap().is_none(),
        "updating a missing id should report None"
    );
}

// ---------------------------------------------------------------------------
// Test: delete removes the row
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_delete_removes_row(pool: SqlitePool) {
    let uow = uow(pool);
    let department = make_department(&uow, "Engineering", "ENG", 100_000.0).await;
    let employee = make_employee(&uow, department.id, "EMP100", "Ada", "Lovelace", 50_000.0).await;

    assert!(uow.employees().generic().delete(&employee).await.unwrap());
    assert!(uow
        .employees()
        .generic()
        .get_by_id(employee.id)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Test: find / first / any / count agree with each other
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_query_surface_is_consistent(pool: SqlitePool) {
    let uow = uow(pool);
    let department = make_department(&uow, "Engineering", "ENG", 100_000.0).await;
    make_employee(&uow, department.id, "EMP100", "Ada", "Lovelace", 50_000.0).await;
    make_employee(&uow, department.id, "EMP101", "Grace", "Hopper", 60_000.0).await;

    let repo = uow.employees().generic();
    let rich = Filter::new().ge("salary", 55_000.0);

    let found = repo.find(&rich).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].employee_number, "EMP101");

    assert!(repo.first(&rich).await.unwrap().is_some());
    assert!(repo.any(&rich).await.unwrap());
    assert_eq!(repo.count(Some(&rich)).await.unwrap(), 1);
    assert_eq!(repo.count(None).await.unwrap(), 2);
    assert_eq!(repo.get_all().await.unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Test: range operations stamp every row and report how many existed
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_range_operations_stamp_and_count(pool: SqlitePool) {
    let uow = uow(pool);
    let department = make_department(&uow, "Engineering", "ENG", 100_000.0).await;
    let batch = vec![
        Employee::new(
            "EMP100",
            "Ada",
            "Lovelace",
            "ada@workforce.local",
            department.id,
            50_000.0,
            common::hire_date(),
        ),
        Employee::new(
            "EMP101",
            "Grace",
            "Hopper",
            "grace@workforce.local",
            department.id,
            60_000.0,
            common::hire_date(),
        ),
        Employee::new(
            "EMP102",
            "Edsger",
            "Dijkstra",
            "edsger@workforce.local",
            department.id,
            70_000.0,
            common::hire_date(),
        ),
    ];

    let repo = uow.employees().generic();
    let created = repo.add_range(&batch).await.unwrap();
    assert_eq!(created.len(), 3);
    assert!(
        created.iter().all(|e| e.id > 0 && e.created_by == "System"),
        "every row gets a storage id and stamped audit fields"
    );

    let mut revised = created.clone();
    for employee in &mut revised {
        employee.salary += 1_000.0;
    }
    revised[2].id = 9999;
    assert_eq!(
        repo.update_range(&revised).await.unwrap(),
        2,
        "only rows that exist count as updated"
    );
    let untouched = repo.get_by_id(created[2].id).await.unwrap().unwrap();
    assert_eq!(untouched.salary, 70_000.0);

    assert_eq!(
        repo.delete_range(&revised).await.unwrap(),
        2,
        "the missing id is skipped, not an error"
    );
    assert_eq!(repo.count(None).await.unwrap(), 1);
    assert!(repo.exists(created[2].id).await.unwrap());
}

// ---------------------------------------------------------------------------
// Test: bulk update and bulk delete report touched rows
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_bulk_operations_report_touched_rows(pool: SqlitePool) {
    let uow = uow(pool);
    let department = make_department(&uow, "Engineering", "ENG", 100_000.0).await;
    make_employee(&uow, department.id, "EMP100", "Ada", "Lovelace", 50_000.0).await;
    make_employee(&uow, department.id, "EMP101", "Grace", "Hopper", 60_000.0).await;
    make_employee(&uow, department.id, "EMP102", "Edsger", "Dijkstra", 70_000.0).await;

    let repo = uow.employees().generic();

    let raised = repo
        .bulk_update(&Filter::new().ge("salary", 60_000.0), |employee| {
            employee.salary += 1_000.0;
        })
        .await
        .unwrap();
    assert_eq!(raised, 2);

    let survivors = repo.find(&Filter::new().ge("salary", 61_000.0)).await.unwrap();
    assert_eq!(survivors.len(), 2);

    let deleted = repo
        .bulk_delete(&Filter::new().lt("salary", 61_000.0))
        .await
        .unwrap();
    assert_eq!(deleted, 1);
    assert_eq!(repo.count(None).await.unwrap(), 2);
}
