//! Report API endpoints.

use axum::extract::State;

use super::{success, ApiQuery, ApiResult};
use crate::models::{MovementReportQuery, ReportEntry};
use crate::reports::{build_movement_report, ReportWindow};
use crate::AppState;

/// GET /reports/employee-movements - Hires, transfers and dismissals in a window.
pub async fn employee_movements(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<MovementReportQuery>,
) -> ApiResult<Vec<ReportEntry>> {
    let window = ReportWindow::from_query(&query)?;
    let employees = state.repo.list_employees_by_hire_date().await?;

    let entries = build_movement_report(&employees, &window);
    tracing::debug!(
        start = %window.start(),
        end = %window.end(),
        entries = entries.len(),
        "Movement report built"
    );
    success(entries)
}
