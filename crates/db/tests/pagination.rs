//! Integration tests for filtered, ordered pagination.
//!
//! The total reported alongside a page is the count of the *filtered* set,
//! and pages past the end are empty rather than errors.

use sqlx::SqlitePool;
use workforce_db::query::{Filter, OrderBy};

mod common;
use common::{make_department, make_employee, uow};

async fn seed_staff(uow: &workforce_db::UnitOfWork) -> i64 {
    let department = make_department(uow, "Engineering", "ENG", 100_000.0).await;
    for i in 0..7 {
        make_employee(
            uow,
            department.id,
            &format!("EMP1{i:02}"),
            "Dev",
            &format!("Number{i}"),
            40_000.0 + f64::from(i) * 5_000.0,
        )
        .await;
    }
    department.id
}

// ---------------------------------------------------------------------------
// Test: pages cover the filtered set in order
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_pages_cover_filtered_set_in_order(pool: SqlitePool) {
    let uow = uow(pool);
    seed_staff(&uow).await;

    let repo = uow.employees().generic();
    let filter = Filter::new().ge("salary", 50_000.0);
    let order = OrderBy::asc("salary");

    let (first, total) = repo
        .get_paged(1, 2, Some(&filter), Some(&order))
        .await
        .unwrap();
    assert_eq!(total, 5, "total must count the filtered set, not the table");
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].salary, 50_000.0);
    assert_eq!(first[1].salary, 55_000.0);

    let (third, _) = repo
        .get_paged(3, 2, Some(&filter), Some(&order))
        .await
        .unwrap();
    assert_eq!(third.len(), 1, "last partial page carries the remainder");
    assert_eq!(third[0].salary, 70_000.0);
}

// ---------------------------------------------------------------------------
// Test: page past the end is empty, not an error
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_page_past_end_is_empty(pool: SqlitePool) {
    let uow = uow(pool);
    seed_staff(&uow).await;

    let repo = uow.employees().generic();
    let (items, total) = repo.get_paged(99, 5, None, None).await.unwrap();
    assert!(items.is_empty());
    assert_eq!(total, 7);
}

// ---------------------------------------------------------------------------
// Test: page numbers below one clamp to the first page
// ---------------------------------------------------------------------------

#[sqlx::test]
async fn test_page_below_one_clamps_to_first(pool: SqlitePool) {
    let uow = uow(pool);
    seed_staff(&uow).await;

    let repo = uow.employees().generic();
    let order = OrderBy::desc("salary");
    let (clamped, _) = repo.get_paged(0, 3, None, Some(&order)).await.unwrap();
    let (first, _) = repo.get_paged(1, 3, None, Some(&order)).await.unwrap();
    assert_eq!(clamped, first);
    assert_eq!(clamped[0].salary, 70_000.0);
}
