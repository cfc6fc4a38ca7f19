//! Employee API endpoints.

use axum::{body::Bytes, extract::State};

use super::{optional_body, success, ApiJson, ApiPath, ApiResult};
use crate::calendar::{self, optional_date, optional_instant};
use crate::errors::AppError;
use crate::models::{
    CreateEmployeeRequest, DismissRequest, Employee, EmployeeDetail, HireRequest,
    TransferRequest, UpdateEmployeeRequest,
};
use crate::AppState;

/// GET /employees - List all employees with their department.
pub async fn list_employees(State(state): State<AppState>) -> ApiResult<Vec<Employee>> {
    success(state.repo.list_employees().await?)
}

/// GET /employees/{id} - Get an employee with age and years of work.
pub async fn get_employee(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<EmployeeDetail> {
    match state.repo.get_employee(id).await? {
        Some(employee) => success(employee.with_derived(calendar::today())),
        None => Err(AppError::employee_not_found(id)),
    }
}

/// POST /employees - Create a new employee.
pub async fn create_employee(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateEmployeeRequest>,
) -> ApiResult<Employee> {
    let employee = request.validate()?;
    success(state.repo.create_employee(&employee).await?)
}

/// PATCH /employees/{id} - Partially update an employee.
pub async fn update_employee(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateEmployeeRequest>,
) -> ApiResult<Employee> {
    let changes = request.validate()?;
    success(state.repo.update_employee(id, &changes).await?)
}

/// DELETE /employees/{id} - Delete an employee record.
pub async fn delete_employee(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<()> {
    state.repo.delete_employee(id).await?;
    success(())
}

/// POST /employees/{id}/hire - Hire an employee into a department.
pub async fn hire_employee(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<HireRequest>,
) -> ApiResult<Employee> {
    let hire_date = optional_date("hireDate", request.hire_date.as_deref())?;
    success(
        state
            .repo
            .hire_employee(id, request.department_id, hire_date)
            .await?,
    )
}

/// POST /employees/{id}/transfer - Move an employee to another department.
pub async fn transfer_employee(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<TransferRequest>,
) -> ApiResult<Employee> {
    let transferred_at = optional_instant("transferDate", request.transfer_date.as_deref())?;
    success(
        state
            .repo
            .transfer_employee(id, request.new_department_id, transferred_at)
            .await?,
    )
}

/// POST /employees/{id}/dismiss - Dismiss an employee.
pub async fn dismiss_employee(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    body: Bytes,
) -> ApiResult<Employee> {
    let request: DismissRequest = optional_body(&body)?;
    let dismissal_date = optional_date("dismissalDate", request.dismissal_date.as_deref())?;
    success(state.repo.dismiss_employee(id, dismissal_date).await?)
}
