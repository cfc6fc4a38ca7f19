//! Database repository shared by the department and employee operations.
//!
//! Uses prepared statements and one transaction per read-merge-write operation.

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteExecutor, SqlitePool};

use crate::errors::AppError;
use crate::models::{Department, DepartmentSummary, Employee, EmployeeStatus, Gender};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pub(super) pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

pub(super) const DEPARTMENT_COLUMNS: &str = "id, code, full_name, abbreviation, creation_date, \
     liquidation_date, parent_id, created_at, updated_at";

pub(super) const EMPLOYEE_SELECT: &str = r#"
    SELECT e.id, e.employee_number, e.full_name, e.gender, e.birth_date, e.hire_date,
           e.dismissal_date, e.department_id, e.position, e.phone, e.email, e.photo,
           e.status, e.created_at, e.updated_at,
           d.code AS department_code, d.full_name AS department_full_name,
           d.abbreviation AS department_abbreviation,
           d.liquidation_date AS department_liquidation_date
    FROM employees e
    LEFT JOIN departments d ON d.id = e.department_id"#;

// Lookups usable both on the pool and inside a transaction

pub(super) async fn fetch_department<'c, E>(
    executor: E,
    id: i64,
) -> Result<Option<Department>, AppError>
where
    E: SqliteExecutor<'c>,
{
    let sql = format!("SELECT {} FROM departments WHERE id = ?", DEPARTMENT_COLUMNS);
    let row = sqlx::query(&sql).bind(id).fetch_optional(executor).await?;
    row.as_ref().map(department_from_row).transpose()
}

pub(super) async fn fetch_all_departments<'c, E>(executor: E) -> Result<Vec<Department>, AppError>
where
    E: SqliteExecutor<'c>,
{
    let sql = format!("SELECT {} FROM departments ORDER BY code", DEPARTMENT_COLUMNS);
    let rows = sqlx::query(&sql).fetch_all(executor).await?;
    rows.iter().map(department_from_row).collect()
}

/// Fail with `NotFound` unless the department exists.
pub(super) async fn require_department<'c, E>(executor: E, id: i64) -> Result<(), AppError>
where
    E: SqliteExecutor<'c>,
{
    let row = sqlx::query("SELECT 1 FROM departments WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    match row {
        Some(_) => Ok(()),
        None => Err(AppError::department_not_found(id)),
    }
}

pub(super) async fn fetch_employee<'c, E>(executor: E, id: i64) -> Result<Option<Employee>, AppError>
where
    E: SqliteExecutor<'c>,
{
    let sql = format!("{} WHERE e.id = ?", EMPLOYEE_SELECT);
    let row = sqlx::query(&sql).bind(id).fetch_optional(executor).await?;
    row.as_ref().map(employee_from_row).transpose()
}

// Helper functions for row conversion

pub(super) fn department_from_row(row: &SqliteRow) -> Result<Department, AppError> {
    Ok(Department {
        id: row.try_get("id")?,
        code: row.try_get("code")?,
        full_name: row.try_get("full_name")?,
        abbreviation: row.try_get("abbreviation")?,
        creation_date: row.try_get("creation_date")?,
        liquidation_date: row.try_get("liquidation_date")?,
        parent_id: row.try_get("parent_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(super) fn employee_from_row(row: &SqliteRow) -> Result<Employee, AppError> {
    let gender: String = row.try_get("gender")?;
    let status: String = row.try_get("status")?;
    let department_id: i64 = row.try_get("department_id")?;
    let department_code: Option<String> = row.try_get("department_code")?;

    let department = match department_code {
        Some(code) => Some(DepartmentSummary {
            id: department_id,
            code,
            full_name: row.try_get("department_full_name")?,
            abbreviation: row.try_get("department_abbreviation")?,
            liquidation_date: row.try_get("department_liquidation_date")?,
        }),
        None => None,
    };

    Ok(Employee {
        id: row.try_get("id")?,
        employee_number: row.try_get("employee_number")?,
        full_name: row.try_get("full_name")?,
        gender: Gender::parse(&gender)
            .ok_or_else(|| AppError::Internal(format!("Unknown gender '{}' in store", gender)))?,
        birth_date: row.try_get("birth_date")?,
        hire_date: row.try_get("hire_date")?,
        dismissal_date: row.try_get("dismissal_date")?,
        department_id,
        department,
        position: row.try_get("position")?,
        phone: row.try_get("phone")?,
        email: row.try_get("email")?,
        photo: row.try_get("photo")?,
        status: EmployeeStatus::parse(&status)
            .ok_or_else(|| AppError::Internal(format!("Unknown status '{}' in store", status)))?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
