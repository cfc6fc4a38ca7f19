//! Department models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{double_option, require_text, EmployeeSummary};
use crate::calendar::optional_date;
use crate::errors::AppError;

/// Department codes are exactly this many characters.
pub const DEPARTMENT_CODE_LEN: usize = 4;

/// An organizational unit as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: i64,
    pub code: String,
    pub full_name: String,
    pub abbreviation: String,
    pub creation_date: Option<NaiveDate>,
    pub liquidation_date: Option<NaiveDate>,
    pub parent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Department {
    /// A liquidated department stays in the registry but is no longer active.
    pub fn is_liquidated(&self) -> bool {
        self.liquidation_date.is_some()
    }

    pub fn summary(&self) -> DepartmentSummary {
        DepartmentSummary {
            id: self.id,
            code: self.code.clone(),
            full_name: self.full_name.clone(),
            abbreviation: self.abbreviation.clone(),
            liquidation_date: self.liquidation_date,
        }
    }
}

/// Compact department reference attached to related records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentSummary {
    pub id: i64,
    pub code: String,
    pub full_name: String,
    pub abbreviation: String,
    pub liquidation_date: Option<NaiveDate>,
}

/// Department with its parent and direct children, as returned by list and update.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentView {
    #[serde(flatten)]
    pub department: Department,
    pub parent: Option<DepartmentSummary>,
    pub children: Vec<DepartmentSummary>,
}

/// Department with relations and its current employees.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentDetail {
    #[serde(flatten)]
    pub view: DepartmentView,
    pub employees: Vec<EmployeeSummary>,
}

/// Node of the nested department tree.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentNode {
    #[serde(flatten)]
    pub department: Department,
    pub children: Vec<DepartmentNode>,
}

/// Request body for creating a department.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentRequest {
    pub code: String,
    pub full_name: String,
    pub abbreviation: String,
    #[serde(default)]
    pub creation_date: Option<String>,
    #[serde(default)]
    pub liquidation_date: Option<String>,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

/// Request body for a partial department update.
///
/// `parentId` distinguishes an absent key (keep) from an explicit `null` (clear).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartmentRequest {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub creation_date: Option<String>,
    #[serde(default)]
    pub liquidation_date: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<i64>>,
}

/// Optional body of `POST /departments/{id}/liquidate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidateRequest {
    #[serde(default)]
    pub liquidation_date: Option<String>,
}

fn validate_code(code: &str) -> Result<String, AppError> {
    let code = code.trim();
    if code.chars().count() != DEPARTMENT_CODE_LEN {
        return Err(AppError::Validation(format!(
            "code must be exactly {} characters",
            DEPARTMENT_CODE_LEN
        )));
    }
    Ok(code.to_string())
}

/// Validated input for a new department.
#[derive(Debug, Clone)]
pub struct NewDepartment {
    pub code: String,
    pub full_name: String,
    pub abbreviation: String,
    pub creation_date: Option<NaiveDate>,
    pub liquidation_date: Option<NaiveDate>,
    pub parent_id: Option<i64>,
}

impl CreateDepartmentRequest {
    pub fn validate(&self) -> Result<NewDepartment, AppError> {
        Ok(NewDepartment {
            code: validate_code(&self.code)?,
            full_name: require_text("fullName", &self.full_name, 255)?,
            abbreviation: require_text("abbreviation", &self.abbreviation, 50)?,
            creation_date: optional_date("creationDate", self.creation_date.as_deref())?,
            liquidation_date: optional_date("liquidationDate", self.liquidation_date.as_deref())?,
            parent_id: self.parent_id,
        })
    }
}

/// Validated partial update of a department.
#[derive(Debug, Clone, Default)]
pub struct DepartmentChanges {
    pub code: Option<String>,
    pub full_name: Option<String>,
    pub abbreviation: Option<String>,
    pub creation_date: Option<NaiveDate>,
    pub liquidation_date: Option<NaiveDate>,
    pub parent_id: Option<Option<i64>>,
}

impl UpdateDepartmentRequest {
    pub fn validate(&self) -> Result<DepartmentChanges, AppError> {
        Ok(DepartmentChanges {
            code: self.code.as_deref().map(validate_code).transpose()?,
            full_name: self
                .full_name
                .as_deref()
                .map(|v| require_text("fullName", v, 255))
                .transpose()?,
            abbreviation: self
                .abbreviation
                .as_deref()
                .map(|v| require_text("abbreviation", v, 50))
                .transpose()?,
            creation_date: optional_date("creationDate", self.creation_date.as_deref())?,
            liquidation_date: optional_date("liquidationDate", self.liquidation_date.as_deref())?,
            parent_id: self.parent_id,
        })
    }
}
