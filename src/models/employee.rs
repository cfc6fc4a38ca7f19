//! Employee models and lifecycle enums.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{optional_text, require_text, DepartmentSummary};
use crate::calendar::{age_on, optional_date, require_date, years_of_work};
use crate::errors::AppError;

/// Gender as recorded in the personnel file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "M" => Some(Gender::Male),
            "F" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Position of an employee in the hire/transfer/dismiss lifecycle.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Transferred,
    Dismissed,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Transferred => "transferred",
            EmployeeStatus::Dismissed => "dismissed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(EmployeeStatus::Active),
            "transferred" => Some(EmployeeStatus::Transferred),
            "dismissed" => Some(EmployeeStatus::Dismissed),
            _ => None,
        }
    }
}

/// An employee record with its department attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub employee_number: String,
    pub full_name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub hire_date: NaiveDate,
    pub dismissal_date: Option<NaiveDate>,
    pub department_id: i64,
    /// `None` only when the referenced row is missing
    pub department: Option<DepartmentSummary>,
    pub position: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub photo: Option<String>,
    pub status: EmployeeStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// Attach age and tenure as of `today`.
    pub fn with_derived(self, today: NaiveDate) -> EmployeeDetail {
        EmployeeDetail {
            age: age_on(self.birth_date, today),
            years_of_work: years_of_work(self.hire_date, self.dismissal_date, today),
            employee: self,
        }
    }

    pub fn summary(&self) -> EmployeeSummary {
        EmployeeSummary {
            id: self.id,
            employee_number: self.employee_number.clone(),
            full_name: self.full_name.clone(),
            position: self.position.clone(),
            status: self.status,
        }
    }
}

/// Employee with the derived age and tenure, as returned by `GET /employees/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDetail {
    #[serde(flatten)]
    pub employee: Employee,
    pub age: i32,
    pub years_of_work: i32,
}

/// Compact employee reference listed under a department.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    pub id: i64,
    pub employee_number: String,
    pub full_name: String,
    pub position: String,
    pub status: EmployeeStatus,
}

/// Request body for creating an employee.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    pub employee_number: String,
    pub full_name: String,
    pub gender: Gender,
    pub birth_date: String,
    pub hire_date: String,
    #[serde(default)]
    pub dismissal_date: Option<String>,
    pub department_id: i64,
    pub position: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub status: Option<EmployeeStatus>,
}

/// Request body for a partial employee update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    #[serde(default)]
    pub employee_number: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub hire_date: Option<String>,
    #[serde(default)]
    pub dismissal_date: Option<String>,
    #[serde(default)]
    pub department_id: Option<i64>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub status: Option<EmployeeStatus>,
}

/// Body of `POST /employees/{id}/hire`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HireRequest {
    pub department_id: i64,
    #[serde(default)]
    pub hire_date: Option<String>,
}

/// Body of `POST /employees/{id}/transfer`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub new_department_id: i64,
    #[serde(default)]
    pub transfer_date: Option<String>,
}

/// Optional body of `POST /employees/{id}/dismiss`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DismissRequest {
    #[serde(default)]
    pub dismissal_date: Option<String>,
}

fn validate_email(value: Option<&str>) -> Result<Option<String>, AppError> {
    let Some(email) = optional_text("email", value, 255)? else {
        return Ok(None);
    };
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AppError::Validation("email must be a valid address".to_string()));
    }
    Ok(Some(email))
}

/// Validated input for a new employee.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub employee_number: String,
    pub full_name: String,
    pub gender: Gender,
    pub birth_date: NaiveDate,
    pub hire_date: NaiveDate,
    pub dismissal_date: Option<NaiveDate>,
    pub department_id: i64,
    pub position: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub photo: Option<String>,
    pub status: EmployeeStatus,
}

impl CreateEmployeeRequest {
    pub fn validate(&self) -> Result<NewEmployee, AppError> {
        Ok(NewEmployee {
            employee_number: require_text("employeeNumber", &self.employee_number, 50)?,
            full_name: require_text("fullName", &self.full_name, 255)?,
            gender: self.gender,
            birth_date: require_date("birthDate", &self.birth_date)?,
            hire_date: require_date("hireDate", &self.hire_date)?,
            dismissal_date: optional_date("dismissalDate", self.dismissal_date.as_deref())?,
            department_id: self.department_id,
            position: require_text("position", &self.position, 255)?,
            phone: optional_text("phone", self.phone.as_deref(), 50)?,
            email: validate_email(self.email.as_deref())?,
            photo: optional_text("photo", self.photo.as_deref(), usize::MAX)?,
            status: self.status.unwrap_or_default(),
        })
    }
}

/// Validated partial update of an employee.
#[derive(Debug, Clone, Default)]
pub struct EmployeeChanges {
    pub employee_number: Option<String>,
    pub full_name: Option<String>,
    pub gender: Option<Gender>,
    pub birth_date: Option<NaiveDate>,
    pub hire_date: Option<NaiveDate>,
    pub dismissal_date: Option<NaiveDate>,
    pub department_id: Option<i64>,
    pub position: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub photo: Option<String>,
    pub status: Option<EmployeeStatus>,
}

impl UpdateEmployeeRequest {
    pub fn validate(&self) -> Result<EmployeeChanges, AppError> {
        Ok(EmployeeChanges {
            employee_number: self
                .employee_number
                .as_deref()
                .map(|v| require_text("employeeNumber", v, 50))
                .transpose()?,
            full_name: self
                .full_name
                .as_deref()
                .map(|v| require_text("fullName", v, 255))
                .transpose()?,
            gender: self.gender,
            birth_date: optional_date("birthDate", self.birth_date.as_deref())?,
            hire_date: optional_date("hireDate", self.hire_date.as_deref())?,
            dismissal_date: optional_date("dismissalDate", self.dismissal_date.as_deref())?,
            department_id: self.department_id,
            position: self
                .position
                .as_deref()
                .map(|v| require_text("position", v, 255))
                .transpose()?,
            phone: optional_text("phone", self.phone.as_deref(), 50)?,
            email: validate_email(self.email.as_deref())?,
            photo: optional_text("photo", self.photo.as_deref(), usize::MAX)?,
            status: self.status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_values() {
        assert_eq!(serde_json::to_value(Gender::Female).unwrap(), "F");
        assert_eq!(
            serde_json::to_value(EmployeeStatus::Transferred).unwrap(),
            "transferred"
        );
        assert_eq!(Gender::parse(Gender::Male.as_str()), Some(Gender::Male));
        assert_eq!(EmployeeStatus::parse("fired"), None);
        assert_eq!(EmployeeStatus::default(), EmployeeStatus::Active);
    }

    fn create_request() -> CreateEmployeeRequest {
        serde_json::from_str(
            r#"{"employeeNumber":" E-001 ","fullName":"Anna Petrova","gender":"F",
                "birthDate":"1990-04-12","hireDate":"2020-01-15","departmentId":1,
                "position":"Engineer","email":"anna@example.com"}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_create_request_defaults() {
        let new = create_request().validate().unwrap();
        assert_eq!(new.employee_number, "E-001");
        assert_eq!(new.status, EmployeeStatus::Active);
        assert_eq!(new.dismissal_date, None);
        assert_eq!(new.hire_date, NaiveDate::from_ymd_opt(2020, 1, 15).unwrap());
    }

    #[test]
    fn test_create_request_rejects_bad_fields() {
        let mut request = create_request();
        request.birth_date = "15.04.1990".to_string();
        assert!(matches!(request.validate(), Err(AppError::Validation(msg)) if msg.contains("birthDate")));

        let mut request = create_request();
        request.email = Some("not-an-email".to_string());
        assert!(request.validate().is_err());

        let mut request = create_request();
        request.position = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email(Some("a@b.ru")).is_ok());
        assert_eq!(validate_email(Some("")).unwrap(), None);
        assert!(validate_email(Some("a@b")).is_err());
        assert!(validate_email(Some("@b.ru")).is_err());
        assert!(validate_email(Some("a b@c.ru")).is_err());
        assert!(validate_email(Some("a@b@c.ru")).is_err());
    }

    #[test]
    fn test_with_derived() {
        let request = create_request();
        let new = request.validate().unwrap();
        let employee = Employee {
            id: 1,
            employee_number: new.employee_number,
            full_name: new.full_name,
            gender: new.gender,
            birth_date: new.birth_date,
            hire_date: new.hire_date,
            dismissal_date: None,
            department_id: 1,
            department: None,
            position: new.position,
            phone: None,
            email: new.email,
            photo: None,
            status: new.status,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let detail = employee.with_derived(NaiveDate::from_ymd_opt(2024, 4, 11).unwrap());
        assert_eq!(detail.age, 33);
        assert_eq!(detail.years_of_work, 4);

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["yearsOfWork"], 4);
        assert_eq!(json["employeeNumber"], "E-001");
        assert_eq!(json["birthDate"], "1990-04-12");
    }

    #[test]
    fn test_create_request_rejects_unknown_gender() {
        let result = serde_json::from_str::<CreateEmployeeRequest>(
            r#"{"employeeNumber":"E1","fullName":"A","gender":"X","birthDate":"1990-01-01",
                "hireDate":"2020-01-01","departmentId":1,"position":"Engineer"}"#,
        );
        assert!(result.is_err());
    }
}
