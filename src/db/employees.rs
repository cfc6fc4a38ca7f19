//! Employee operations and lifecycle transitions.

use chrono::{DateTime, NaiveDate, Utc};

use super::repository::{
    employee_from_row, fetch_employee, require_department, Repository, EMPLOYEE_SELECT,
};
use crate::calendar;
use crate::errors::AppError;
use crate::models::{Employee, EmployeeChanges, EmployeeStatus, NewEmployee};

impl Repository {
    /// List all employees ordered by employee number.
    pub async fn list_employees(&self) -> Result<Vec<Employee>, AppError> {
        let sql = format!("{} ORDER BY e.employee_number", EMPLOYEE_SELECT);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(employee_from_row).collect()
    }

    /// List all employees ordered by hire date, as scanned by the movement report.
    pub async fn list_employees_by_hire_date(&self) -> Result<Vec<Employee>, AppError> {
        let sql = format!("{} ORDER BY e.hire_date, e.id", EMPLOYEE_SELECT);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(employee_from_row).collect()
    }

    /// Get an employee by ID.
    pub async fn get_employee(&self, id: i64) -> Result<Option<Employee>, AppError> {
        fetch_employee(&self.pool, id).await
    }

    async fn require_employee(&self, id: i64) -> Result<Employee, AppError> {
        self.get_employee(id)
            .await?
            .ok_or_else(|| AppError::employee_not_found(id))
    }

    /// Create a new employee in an existing department.
    pub async fn create_employee(&self, request: &NewEmployee) -> Result<Employee, AppError> {
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;

        require_department(&mut *tx, request.department_id).await?;

        let result = sqlx::query(
            "INSERT INTO employees (employee_number, full_name, gender, birth_date, hire_date, dismissal_date, department_id, position, phone, email, photo, status, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&request.employee_number)
        .bind(&request.full_name)
        .bind(request.gender.as_str())
        .bind(request.birth_date)
        .bind(request.hire_date)
        .bind(request.dismissal_date)
        .bind(request.department_id)
        .bind(&request.position)
        .bind(&request.phone)
        .bind(&request.email)
        .bind(&request.photo)
        .bind(request.status.as_str())
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        let id = result.last_insert_rowid();
        tracing::info!(
            employee_id = id,
            employee_number = %request.employee_number,
            department_id = request.department_id,
            "Employee created"
        );
        self.require_employee(id).await
    }

    /// Partially update an employee, re-resolving the department when it changes.
    pub async fn update_employee(
        &self,
        id: i64,
        changes: &EmployeeChanges,
    ) -> Result<Employee, AppError> {
        let mut tx = self.pool.begin().await?;

        let existing = fetch_employee(&mut *tx, id)
            .await?
            .ok_or_else(|| AppError::employee_not_found(id))?;

        if let Some(department_id) = changes.department_id {
            require_department(&mut *tx, department_id).await?;
        }

        let employee_number = changes
            .employee_number
            .as_ref()
            .unwrap_or(&existing.employee_number);
        let full_name = changes.full_name.as_ref().unwrap_or(&existing.full_name);
        let gender = changes.gender.unwrap_or(existing.gender);
        let birth_date = changes.birth_date.unwrap_or(existing.birth_date);
        let hire_date = changes.hire_date.unwrap_or(existing.hire_date);
        let dismissal_date = changes.dismissal_date.or(existing.dismissal_date);
        let department_id = changes.department_id.unwrap_or(existing.department_id);
        let position = changes.position.as_ref().unwrap_or(&existing.position);
        let phone = changes.phone.clone().or(existing.phone.clone());
        let email = changes.email.clone().or(existing.email.clone());
        let photo = changes.photo.clone().or(existing.photo.clone());
        let status = changes.status.unwrap_or(existing.status);

        sqlx::query(
            "UPDATE employees SET employee_number = ?, full_name = ?, gender = ?, birth_date = ?, hire_date = ?, dismissal_date = ?, department_id = ?, position = ?, phone = ?, email = ?, photo = ?, status = ?, updated_at = ? WHERE id = ?"
        )
        .bind(employee_number)
        .bind(full_name)
        .bind(gender.as_str())
        .bind(birth_date)
        .bind(hire_date)
        .bind(dismissal_date)
        .bind(department_id)
        .bind(position)
        .bind(&phone)
        .bind(&email)
        .bind(&photo)
        .bind(status.as_str())
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(employee_id = id, "Employee updated");
        self.require_employee(id).await
    }

    /// Hire (or re-hire) an employee into a department.
    ///
    /// Clears the dismissal date and resets the status to active. The hire
    /// date defaults to today.
    pub async fn hire_employee(
        &self,
        id: i64,
        department_id: i64,
        hire_date: Option<NaiveDate>,
    ) -> Result<Employee, AppError> {
        let hire_date = hire_date.unwrap_or_else(calendar::today);

        let mut tx = self.pool.begin().await?;

        if fetch_employee(&mut *tx, id).await?.is_none() {
            return Err(AppError::employee_not_found(id));
        }
        require_department(&mut *tx, department_id).await?;

        sqlx::query(
            "UPDATE employees SET department_id = ?, hire_date = ?, dismissal_date = NULL, status = ?, updated_at = ? WHERE id = ?",
        )
        .bind(department_id)
        .bind(hire_date)
        .bind(EmployeeStatus::Active.as_str())
        .bind(Utc::now())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(employee_id = id, department_id, %hire_date, "Employee hired");
        self.require_employee(id).await
    }

    /// Transfer an employee to another department.
    ///
    /// The hire date is kept. The modification timestamp is set to
    /// `transferred_at` when given so the movement report dates the transfer
    /// correctly, otherwise to now.
    pub async fn transfer_employee(
        &self,
        id: i64,
        new_department_id: i64,
        transferred_at: Option<DateTime<Utc>>,
    ) -> Result<Employee, AppError> {
        let transferred_at = transferred_at.unwrap_or_else(Utc::now);

        let mut tx = self.pool.begin().await?;

        if fetch_employee(&mut *tx, id).await?.is_none() {
            return Err(AppError::employee_not_found(id));
        }
        require_department(&mut *tx, new_department_id).await?;

        sqlx::query(
            "UPDATE employees SET department_id = ?, status = ?, updated_at = ? WHERE id = ?",
        )
        .bind(new_department_id)
        .bind(EmployeeStatus::Transferred.as_str())
        .bind(transferred_at)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            employee_id = id,
            department_id = new_department_id,
            %transferred_at,
            "Employee transferred"
        );
        self.require_employee(id).await
    }

    /// Dismiss an employee. The dismissal date defaults to today.
    pub async fn dismiss_employee(
        &self,
        id: i64,
        dismissal_date: Option<NaiveDate>,
    ) -> Result<Employee, AppError> {
        let dismissal_date = dismissal_date.unwrap_or_else(calendar::today);

        let result = sqlx::query(
            "UPDATE employees SET dismissal_date = ?, status = ?, updated_at = ? WHERE id = ?",
        )
        .bind(dismissal_date)
        .bind(EmployeeStatus::Dismissed.as_str())
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::employee_not_found(id));
        }

        tracing::info!(employee_id = id, %dismissal_date, "Employee dismissed");
        self.require_employee(id).await
    }

    /// Delete an employee record.
    pub async fn delete_employee(&self, id: i64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::employee_not_found(id));
        }

        tracing::info!(employee_id = id, "Employee deleted");
        Ok(())
    }
}
