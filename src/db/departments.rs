//! Department operations.

use chrono::{NaiveDate, Utc};
use sqlx::Row;

use super::repository::{
    employee_from_row, fetch_all_departments, fetch_department, Repository, EMPLOYEE_SELECT,
};
use crate::calendar;
use crate::errors::AppError;
use crate::hierarchy::DepartmentIndex;
use crate::models::{
    Department, DepartmentChanges, DepartmentDetail, DepartmentNode, DepartmentView,
    EmployeeSummary, NewDepartment,
};

impl Repository {
    /// List all departments ordered by code.
    pub async fn list_departments(&self) -> Result<Vec<Department>, AppError> {
        fetch_all_departments(&self.pool).await
    }

    /// Get a department by ID.
    pub async fn get_department(&self, id: i64) -> Result<Option<Department>, AppError> {
        fetch_department(&self.pool, id).await
    }

    /// List all departments with parent and direct children attached.
    pub async fn list_department_views(&self) -> Result<Vec<DepartmentView>, AppError> {
        let departments = self.list_departments().await?;
        Ok(DepartmentIndex::new(&departments).views())
    }

    /// Root departments, each carrying its nested subtree.
    pub async fn department_hierarchy(&self) -> Result<Vec<DepartmentNode>, AppError> {
        let departments = self.list_departments().await?;
        Ok(DepartmentIndex::new(&departments).forest())
    }

    /// One department with parent and direct children attached.
    pub async fn department_view(&self, id: i64) -> Result<DepartmentView, AppError> {
        let departments = self.list_departments().await?;
        let index = DepartmentIndex::new(&departments);
        let department = index
            .get(id)
            .ok_or_else(|| AppError::department_not_found(id))?;
        Ok(index.view(department))
    }

    /// One department with relations and its employees.
    pub async fn department_detail(&self, id: i64) -> Result<DepartmentDetail, AppError> {
        let view = self.department_view(id).await?;

        let sql = format!(
            "{} WHERE e.department_id = ? ORDER BY e.employee_number",
            EMPLOYEE_SELECT
        );
        let rows = sqlx::query(&sql).bind(id).fetch_all(&self.pool).await?;
        let employees = rows
            .iter()
            .map(|row| employee_from_row(row).map(|e| e.summary()))
            .collect::<Result<Vec<EmployeeSummary>, AppError>>()?;

        Ok(DepartmentDetail { view, employees })
    }

    /// Create a new department. The creation date defaults to today.
    pub async fn create_department(
        &self,
        request: &NewDepartment,
    ) -> Result<DepartmentView, AppError> {
        let now = Utc::now();
        let creation_date = request.creation_date.unwrap_or_else(calendar::today);

        let mut tx = self.pool.begin().await?;

        if let Some(parent_id) = request.parent_id {
            if fetch_department(&mut *tx, parent_id).await?.is_none() {
                return Err(AppError::department_not_found(parent_id));
            }
        }

        let result = sqlx::query(
            "INSERT INTO departments (code, full_name, abbreviation, creation_date, liquidation_date, parent_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&request.code)
        .bind(&request.full_name)
        .bind(&request.abbreviation)
        .bind(creation_date)
        .bind(request.liquidation_date)
        .bind(request.parent_id)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let id = result.last_insert_rowid();
        tracing::info!(department_id = id, code = %request.code, "Department created");
        self.department_view(id).await
    }

    /// Partially update a department.
    ///
    /// `parent_id: Some(None)` detaches the department from its parent.
    pub async fn update_department(
        &self,
        id: i64,
        changes: &DepartmentChanges,
    ) -> Result<DepartmentView, AppError> {
        let mut tx = self.pool.begin().await?;

        let existing = fetch_department(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::department_not_found(id))?;

        let parent_id = match changes.parent_id {
            None => existing.parent_id,
            Some(None) => None,
            Some(Some(parent_id)) => {
                if parent_id == id {
                    return Err(AppError::Validation(
                        "A department cannot be its own parent".to_string(),
                    ));
                }
                let departments = fetch_all_departments(&mut *tx).await?;
                let index = DepartmentIndex::new(&departments);
                if index.get(parent_id).is_none() {
                    return Err(AppError::department_not_found(parent_id));
                }
                if index.is_in_subtree(id, parent_id) {
                    return Err(AppError::Validation(format!(
                        "Department {} is a descendant of department {} and cannot become its parent",
                        parent_id, id
                    )));
                }
                Some(parent_id)
            }
        };

        let code = changes.code.as_ref().unwrap_or(&existing.code);
        let full_name = changes.full_name.as_ref().unwrap_or(&existing.full_name);
        let abbreviation = changes
            .abbreviation
            .as_ref()
            .unwrap_or(&existing.abbreviation);
        let creation_date = changes.creation_date.or(existing.creation_date);
        let liquidation_date = changes.liquidation_date.or(existing.liquidation_date);

        sqlx::query(
            "UPDATE departments SET code = ?, full_name = ?, abbreviation = ?, creation_date = ?, liquidation_date = ?, parent_id = ?, updated_at = ? WHERE id = ?"
        )
        .bind(code)
        .bind(full_name)
        .bind(abbreviation)
        .bind(creation_date)
        .bind(liquidation_date)
        .bind(parent_id)
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(department_id = id, "Department updated");
        self.department_view(id).await
    }

    /// Stamp the liquidation date (today when not given).
    ///
    /// Employees and child departments keep their references.
    pub async fn liquidate_department(
        &self,
        id: i64,
        liquidation_date: Option<NaiveDate>,
    ) -> Result<DepartmentView, AppError> {
        let liquidation_date = liquidation_date.unwrap_or_else(calendar::today);

        let existing = self
            .get_department(id)
            .await?
            .ok_or_else(|| AppError::department_not_found(id))?;
        if existing.is_liquidated() {
            tracing::warn!(
                department_id = id,
                previous = ?existing.liquidation_date,
                "Department already liquidated, overwriting date"
            );
        }

        sqlx::query("UPDATE departments SET liquidation_date = ?, updated_at = ? WHERE id = ?")
            .bind(liquidation_date)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::info!(department_id = id, %liquidation_date, "Department liquidated");
        self.department_view(id).await
    }

    /// Delete a department that has no employees and no child departments.
    pub async fn delete_department(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        if fetch_department(&mut *tx, id).await?.is_none() {
            return Err(AppError::department_not_found(id));
        }

        let counts = sqlx::query(
            "SELECT (SELECT COUNT(*) FROM employees WHERE department_id = ?) AS employees, (SELECT COUNT(*) FROM departments WHERE parent_id = ?) AS children",
        )
        .bind(id)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        let employees: i64 = counts.try_get("employees")?;
        let children: i64 = counts.try_get("children")?;

        if employees > 0 || children > 0 {
            return Err(AppError::Conflict(format!(
                "Department {} still has {} employee(s) and {} child department(s); liquidate it instead",
                id, employees, children
            )));
        }

        sqlx::query("DELETE FROM departments WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(department_id = id, "Department deleted");
        Ok(())
    }
}
