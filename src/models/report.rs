//! Movement report models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of lifecycle event reconstructed for the movement report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MovementAction {
    Hired,
    Transferred,
    Dismissed,
}

/// One line of the employee movement report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    pub employee_number: String,
    pub full_name: String,
    pub action: MovementAction,
    pub date: DateTime<Utc>,
    pub department: String,
    pub position: String,
}

/// Query string of `GET /reports/employee-movements`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementReportQuery {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}
