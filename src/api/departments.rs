//! Department API endpoints.

use axum::{body::Bytes, extract::State};

use super::{optional_body, success, ApiJson, ApiPath, ApiResult};
use crate::calendar::optional_date;
use crate::models::{
    CreateDepartmentRequest, DepartmentDetail, DepartmentNode, DepartmentView, LiquidateRequest,
    UpdateDepartmentRequest,
};
use crate::AppState;

/// GET /departments - List all departments with parent and children.
pub async fn list_departments(State(state): State<AppState>) -> ApiResult<Vec<DepartmentView>> {
    success(state.repo.list_department_views().await?)
}

/// GET /departments/hierarchy - Nested tree of root departments.
pub async fn department_hierarchy(
    State(state): State<AppState>,
) -> ApiResult<Vec<DepartmentNode>> {
    success(state.repo.department_hierarchy().await?)
}

/// GET /departments/{id} - Get a department with relations and employees.
pub async fn get_department(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<DepartmentDetail> {
    success(state.repo.department_detail(id).await?)
}

/// POST /departments - Create a new department.
pub async fn create_department(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateDepartmentRequest>,
) -> ApiResult<DepartmentView> {
    let department = request.validate()?;
    success(state.repo.create_department(&department).await?)
}

/// PATCH /departments/{id} - Partially update a department.
pub async fn update_department(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateDepartmentRequest>,
) -> ApiResult<DepartmentView> {
    let changes = request.validate()?;
    success(state.repo.update_department(id, &changes).await?)
}

/// POST /departments/{id}/liquidate - Mark a department as liquidated.
pub async fn liquidate_department(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    body: Bytes,
) -> ApiResult<DepartmentView> {
    let request: LiquidateRequest = optional_body(&body)?;
    let liquidation_date = optional_date("liquidationDate", request.liquidation_date.as_deref())?;
    success(state.repo.liquidate_department(id, liquidation_date).await?)
}

/// DELETE /departments/{id} - Delete an empty department.
pub async fn delete_department(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<()> {
    state.repo.delete_department(id).await?;
    success(())
}
