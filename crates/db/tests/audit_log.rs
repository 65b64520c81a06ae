//! Integration tests for the append-only audit log.

use chrono::{Duration, Utc};
use serde_json::json;
use sqlx::SqlitePool;
use workforce_core::audit::table_names;
use workforce_db::models::{AuditAction, AuditLogQuery, NewAuditLog};

mod common;
use common::{make_department, make_employee, uow};

// ---------------------------------------------------------------------------
// Test: append fills defaults from the context
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_append_defaults_to_context_actor(pool: SqlitePool) {
    let uow = uow(pool);
    uow.set_actor("auditor");

    let entry = uow
        .audit_logs()
        .append(
            &NewAuditLog::success(AuditAction::Update, table_names::EMPLOYEES)
                .with_record(42)
                .with_snapshots(Some(json!({"salary": 1})), Some(json!({"salary": 2}))),
        )
        .await
        .unwrap();

    assert!(entry.id > 0);
    assert_eq!(entry.performed_by, "auditor");
    assert_eq!(entry.created_by, "auditor");
    assert_eq!(entry.record_id, Some(42));
    assert_eq!(entry.old_values, Some(json!({"salary": 1})));
    assert!(entry.is_success);

    let explicit = uow
        .audit_logs()
        .append(
            &NewAuditLog {
                performed_by: Some("importer".to_string()),
                ..NewAuditLog::failure(AuditAction::Import, table_names::PROJECTS, "bad file")
            },
        )
        .await
        .unwrap();
    assert_eq!(explicit.performed_by, "importer");
    assert!(!explicit.is_success);
    assert_eq!(explicit.error_message.as_deref(), Some("bad file"));
}

// ---------------------------------------------------------------------------
// Test: batch append stores every entry
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_append_batch_stores_all(pool: SqlitePool) {
    let uow = uow(pool);
    let entries: Vec<NewAuditLog> = (0..3)
        .map(|i| NewAuditLog::success(AuditAction::Create, table_names::DEPARTMENTS).with_record(i))
        .collect();

    let stored = uow.audit_logs().append_batch(&entries).await.unwrap();
    assert_eq!(stored.len(), 3);
    assert!(uow
        .audit_logs()
        .append_batch(&[])
        .await
        .unwrap()
        .is_empty());

    let page = uow
        .audit_logs()
        .query(&AuditLogQuery::default())
        .await
        .unwrap();
    assert_eq!(page.total, 3);
}

// ---------------------------------------------------------------------------
// Test: queries filter and paginate, newest first
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_query_filters_and_paginates(pool: SqlitePool) {
    let uow = uow(pool);
    let department = make_department(&uow, "Engineering", "ENG", 100_000.0).await;
    let ada = make_employee(&uow, department.id, "EMP100", "Ada", "Lovelace", 50_000.0).await;

    let logs = uow.audit_logs();
    for i in 0..4 {
        logs.append(
            &NewAuditLog::success(AuditAction::Update, table_names::EMPLOYEES)
                .with_record(i)
                .with_employee(ada.id),
        )
        .await
        .unwrap();
    }
    logs.append(&NewAuditLog::success(AuditAction::Delete, table_names::PROJECTS))
        .await
        .unwrap();

    let updates = logs
        .query(&AuditLogQuery {
            action: Some(AuditAction::Update),
            limit: Some(2),
            ..AuditLogQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(updates.total, 4, "total ignores the page limit");
    assert_eq!(updates.items.len(), 2);
    assert!(
        updates.items[0].id > updates.items[1].id,
        "newest entries come first"
    );

    let by_table = logs
        .query(&AuditLogQuery {
            table_name: Some(table_names::PROJECTS.to_string()),
            ..AuditLogQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(by_table.total, 1);
    assert_eq!(by_table.items[0].action, AuditAction::Delete);

    let future = logs
        .query(&AuditLogQuery {
            from: Some(Utc::now() + Duration::hours(1)),
            ..AuditLogQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(future.total, 0);

    let by_employee = logs.find_by_employee(ada.id).await.unwrap();
    assert_eq!(by_employee.len(), 4);
    assert_eq!(
        logs.count(&AuditLogQuery {
            employee_id: Some(ada.id),
            ..AuditLogQuery::default()
        })
        .await
        .unwrap(),
        4
    );
}

// ---------------------------------------------------------------------------
// Test: deleting the employee keeps history, nulling the reference
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_employee_delete_preserves_history(pool: SqlitePool) {
    let uow = uow(pool);
    let department = make_department(&uow, "Engineering", "ENG", 100_000.0).await;
    let ada = make_employee(&uow, department.id, "EMP100", "Ada", "Lovelace", 50_000.0).await;
    uow.audit_logs()
        .append(
            &NewAuditLog::success(AuditAction::Login, table_names::EMPLOYEES)
                .with_employee(ada.id),
        )
        .await
        .unwrap();

    assert!(uow.employees().generic().delete_by_id(ada.id).await.unwrap());

    let page = uow
        .audit_logs()
        .query(&AuditLogQuery::default())
        .await
        .unwrap();
    assert_eq!(page.total, 1, "audit history survives the employee");
    assert_eq!(
        page.items[0].employee_id, None,
        "the employee reference is nulled, not cascaded"
    );
}
