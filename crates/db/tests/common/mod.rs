//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use sqlx::SqlitePool;
use workforce_db::models::{Department, Employee, Project};
use workforce_db::UnitOfWork;

pub fn uow(pool: SqlitePool) -> UnitOfWork {
    UnitOfWork::new(pool)
}

pub fn hire_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 10).unwrap()
}

pub async fn make_department(
    uow: &UnitOfWork,
    name: &str,
    code: &str,
    budget: f64,
) -> Department {
    uow.departments()
        .generic()
        .add(&Department::new(name, code, budget))
        .await
        .unwrap()
}

pub async fn make_employee(
    uow: &UnitOfWork,
    department_id: i64,
    number: &str,
    first: &str,
    last: &str,
    salary: f64,
) -> Employee {
    let email = format!("{first}.{last}@workforce.local").to_lowercase();
    uow.employees()
        .generic()
        .add(&Employee::new(
            number,
            first,
            last,
            email,
            department_id,
            salary,
            hire_date(),
        ))
        .await
        .unwrap()
}

pub async fn make_project(
    uow: &UnitOfWork,
    department_id: i64,
    name: &str,
    code: &str,
) -> Project {
    let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    uow.projects()
        .generic()
        .add(&Project::new(name, code, department_id, 10_000.0, start))
        .await
        .unwrap()
}
