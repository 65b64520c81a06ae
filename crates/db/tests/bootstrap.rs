//! Integration tests for migration and health-check entry points.

use sqlx::SqlitePool;
use workforce_db::{health_check, run_migrations, UnitOfWork};

#[sqlx::test(migrations = false)]
async fn test_migrations_apply_and_are_idempotent(pool: SqlitePool) {
    run_migrations(&pool).await.unwrap();
    run_migrations(&pool).await.unwrap();
    health_check(&pool).await.unwrap();

    // The migrated schema is immediately usable.
    let uow = UnitOfWork::new(pool);
    let department = uow
        .departments()
        .generic()
        .add(&workforce_db::models::Department::new("Engineering", "ENG", 100_000.0))
        .await
        .unwrap();
    assert!(department.id > 0);
}
