//! Employee movement report.
//!
//! There is no event log: hires, transfers and dismissals are reconstructed
//! from each employee's hire date, dismissal date, status and last
//! modification timestamp.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};

use crate::calendar::{parse_instant, start_of_day};
use crate::errors::AppError;
use crate::models::{Employee, EmployeeStatus, MovementAction, MovementReportQuery, ReportEntry};

/// Department label used when an employee's department row is missing.
pub const UNSPECIFIED_DEPARTMENT: &str = "Не указано";

/// Minimum gap between hire and last modification for a transferred
/// employee's timestamp to count as the transfer rather than the initial save.
pub const TRANSFER_THRESHOLD_HOURS: i64 = 24;

/// Inclusive reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl ReportWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, AppError> {
        if start > end {
            return Err(AppError::Validation(
                "startDate must be before endDate".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Validate the raw query parameters of the report endpoint.
    pub fn from_query(query: &MovementReportQuery) -> Result<Self, AppError> {
        let (Some(start), Some(end)) = (
            query.start_date.as_deref().filter(|s| !s.trim().is_empty()),
            query.end_date.as_deref().filter(|s| !s.trim().is_empty()),
        ) else {
            return Err(AppError::Validation(
                "startDate and endDate are required".to_string(),
            ));
        };

        match (parse_instant(start), parse_instant(end)) {
            (Some(start), Some(end)) => Self::new(start, end),
            _ => Err(AppError::Validation("Invalid date format".to_string())),
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// Whether the employee's last modification marks a transfer.
fn is_transfer(employee: &Employee, hired_at: DateTime<Utc>) -> bool {
    employee.status == EmployeeStatus::Transferred
        && employee.updated_at - hired_at > Duration::hours(TRANSFER_THRESHOLD_HOURS)
}

/// Candidate events for one employee, before de-duplication.
fn employee_events(employee: &Employee, window: &ReportWindow) -> Vec<(MovementAction, DateTime<Utc>)> {
    let hired_at = start_of_day(employee.hire_date);
    let modified_at = employee.updated_at;
    let transferred = is_transfer(employee, hired_at);
    let hire_in_window = window.contains(hired_at);
    let modified_in_window = window.contains(modified_at);

    let mut events = Vec::with_capacity(2);

    if hire_in_window {
        // A transfer inside the same window supersedes the hire
        if transferred && modified_in_window {
            events.push((MovementAction::Transferred, modified_at));
        } else {
            events.push((MovementAction::Hired, hired_at));
        }
    } else if transferred && modified_in_window {
        // Hired before the window, transferred during it
        events.push((MovementAction::Transferred, modified_at));
    }

    if let Some(dismissal_date) = employee.dismissal_date {
        let dismissed_at = start_of_day(dismissal_date);
        if window.contains(dismissed_at) {
            events.push((MovementAction::Dismissed, dismissed_at));
        }
    }

    events
}

/// Build the movement report for `window`.
///
/// Entries are de-duplicated on (employee number, instant, action) and sorted
/// by instant; entries with equal instants keep the order of `employees`.
pub fn build_movement_report(employees: &[Employee], window: &ReportWindow) -> Vec<ReportEntry> {
    let mut seen: HashSet<(String, DateTime<Utc>, MovementAction)> = HashSet::new();
    let mut report = Vec::new();

    for employee in employees {
        let department = employee
            .department
            .as_ref()
            .map(|d| d.full_name.clone())
            .unwrap_or_else(|| UNSPECIFIED_DEPARTMENT.to_string());

        for (action, date) in employee_events(employee, window) {
            if !seen.insert((employee.employee_number.clone(), date, action)) {
                continue;
            }
            report.push(ReportEntry {
                employee_number: employee.employee_number.clone(),
                full_name: employee.full_name.clone(),
                action,
                date,
                department: department.clone(),
                position: employee.position.clone(),
            });
        }
    }

    report.sort_by_key(|entry| entry.date);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DepartmentSummary, Gender};
    use chrono::{NaiveDate, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn instant(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn window(start: (i32, u32, u32), end: (i32, u32, u32)) -> ReportWindow {
        ReportWindow::new(
            instant(start.0, start.1, start.2, 0),
            instant(end.0, end.1, end.2, 0),
        )
        .unwrap()
    }

    fn employee(number: &str, hire_date: NaiveDate) -> Employee {
        Employee {
            id: 1,
            employee_number: number.to_string(),
            full_name: format!("Employee {}", number),
            gender: Gender::Female,
            birth_date: date(1990, 5, 5),
            hire_date,
            dismissal_date: None,
            department_id: 1,
            department: Some(DepartmentSummary {
                id: 1,
                code: "0001".to_string(),
                full_name: "Production".to_string(),
                abbreviation: "PRD".to_string(),
                liquidation_date: None,
            }),
            position: "Engineer".to_string(),
            phone: None,
            email: None,
            photo: None,
            status: EmployeeStatus::Active,
            created_at: start_of_day(hire_date),
            updated_at: start_of_day(hire_date),
        }
    }

    fn transferred(mut e: Employee, at: DateTime<Utc>) -> Employee {
        e.status = EmployeeStatus::Transferred;
        e.updated_at = at;
        e
    }

    #[test]
    fn test_hire_in_window() {
        let e = transferred(employee("E1", date(2023, 1, 10)), instant(2023, 6, 1, 0));
        let report = build_movement_report(&[e], &window((2023, 1, 1), (2023, 1, 31)));

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].action, MovementAction::Hired);
        assert_eq!(report[0].date, instant(2023, 1, 10, 0));
        assert_eq!(report[0].department, "Production");
    }

    #[test]
    fn test_transfer_after_hire_window() {
        let e = transferred(employee("E1", date(2023, 1, 10)), instant(2023, 6, 1, 0));
        let report = build_movement_report(&[e], &window((2023, 6, 1), (2023, 6, 2)));

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].action, MovementAction::Transferred);
        assert_eq!(report[0].date, instant(2023, 6, 1, 0));
    }

    #[test]
    fn test_transfer_supersedes_hire_in_same_window() {
        let e = transferred(employee("E1", date(2023, 1, 10)), instant(2023, 6, 1, 0));
        let report = build_movement_report(&[e], &window((2023, 1, 1), (2023, 12, 31)));

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].action, MovementAction::Transferred);
        assert_eq!(report[0].date, instant(2023, 6, 1, 0));
    }

    #[test]
    fn test_transfer_within_threshold_reads_as_hire() {
        let e = transferred(employee("E1", date(2023, 1, 10)), instant(2023, 1, 10, 20));
        let report = build_movement_report(&[e], &window((2023, 1, 1), (2023, 1, 31)));

        assert_eq!(report.len(), 1);
        assert_eq!(report[0].action, MovementAction::Hired);
    }

    #[test]
    fn test_transfer_exactly_at_threshold_is_not_a_transfer() {
        let e = transferred(employee("E1", date(2023, 1, 10)), instant(2023, 1, 11, 0));
        let report = build_movement_report(&[e], &window((2023, 1, 11), (2023, 1, 12)));
        assert!(report.is_empty());
    }

    #[test]
    fn test_active_employee_modified_in_window_is_not_reported() {
        let mut e = employee("E1", date(2020, 1, 10));
        e.updated_at = instant(2023, 6, 1, 0);
        let report = build_movement_report(&[e], &window((2023, 1, 1), (2023, 12, 31)));
        assert!(report.is_empty());
    }

    #[test]
    fn test_dismissal_regardless_of_hire_window() {
        let mut e = employee("E2", date(2019, 4, 1));
        e.status = EmployeeStatus::Dismissed;
        e.dismissal_date = Some(date(2023, 3, 15));
        e.updated_at = instant(2023, 3, 15, 9);

        let report = build_movement_report(&[e], &window((2023, 3, 1), (2023, 3, 31)));
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].action, MovementAction::Dismissed);
        assert_eq!(report[0].date, instant(2023, 3, 15, 0));
    }

    #[test]
    fn test_hire_and_dismissal_in_same_window() {
        let mut e = employee("E3", date(2023, 2, 1));
        e.status = EmployeeStatus::Dismissed;
        e.dismissal_date = Some(date(2023, 2, 20));

        let report = build_movement_report(&[e], &window((2023, 1, 1), (2023, 12, 31)));
        let actions: Vec<MovementAction> = report.iter().map(|r| r.action).collect();
        assert_eq!(actions, vec![MovementAction::Hired, MovementAction::Dismissed]);
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let e = employee("E4", date(2023, 5, 31));
        let report = build_movement_report(&[e], &window((2023, 5, 1), (2023, 5, 31)));
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_duplicate_events_collapse() {
        let e = employee("E5", date(2023, 1, 10));
        let same = e.clone();
        let report = build_movement_report(&[e, same], &window((2023, 1, 1), (2023, 1, 31)));
        assert_eq!(report.len(), 1);
    }

    #[test]
    fn test_same_instant_different_employees_kept() {
        let a = employee("A1", date(2023, 1, 10));
        let b = employee("B1", date(2023, 1, 10));
        let report = build_movement_report(&[a, b], &window((2023, 1, 1), (2023, 1, 31)));
        let numbers: Vec<&str> = report.iter().map(|r| r.employee_number.as_str()).collect();
        assert_eq!(numbers, vec!["A1", "B1"]);
    }

    #[test]
    fn test_report_sorted_by_date() {
        let mut late = employee("L1", date(2023, 1, 5));
        late.status = EmployeeStatus::Dismissed;
        late.dismissal_date = Some(date(2023, 8, 1));
        let early = transferred(employee("T1", date(2022, 1, 5)), instant(2023, 4, 2, 12));
        let middle = employee("M1", date(2023, 3, 3));

        let report = build_movement_report(
            &[late, early, middle],
            &window((2023, 1, 1), (2023, 12, 31)),
        );
        assert_eq!(report.len(), 4);
        assert!(report.windows(2).all(|pair| pair[0].date <= pair[1].date));
        assert_eq!(report[0].employee_number, "L1");
        assert_eq!(report[3].action, MovementAction::Dismissed);
    }

    #[test]
    fn test_missing_department_uses_placeholder() {
        let mut e = employee("E6", date(2023, 1, 10));
        e.department = None;
        let report = build_movement_report(&[e], &window((2023, 1, 1), (2023, 1, 31)));
        assert_eq!(report[0].department, UNSPECIFIED_DEPARTMENT);
    }

    #[test]
    fn test_window_from_query() {
        let query = MovementReportQuery {
            start_date: Some("2023-01-01".to_string()),
            end_date: Some("2023-01-31".to_string()),
        };
        let window = ReportWindow::from_query(&query).unwrap();
        assert_eq!(window.start(), instant(2023, 1, 1, 0));
        assert_eq!(window.end(), instant(2023, 1, 31, 0));
    }

    #[test]
    fn test_window_rejects_bad_queries() {
        let missing = MovementReportQuery {
            start_date: Some("2023-01-01".to_string()),
            end_date: None,
        };
        assert!(matches!(
            ReportWindow::from_query(&missing),
            Err(AppError::Validation(msg)) if msg.contains("required")
        ));

        let invalid = MovementReportQuery {
            start_date: Some("2023-01-01".to_string()),
            end_date: Some("tomorrow".to_string()),
        };
        assert!(matches!(
            ReportWindow::from_query(&invalid),
            Err(AppError::Validation(msg)) if msg.contains("Invalid")
        ));

        let inverted = MovementReportQuery {
            start_date: Some("2023-02-01".to_string()),
            end_date: Some("2023-01-01".to_string()),
        };
        assert!(ReportWindow::from_query(&inverted).is_err());
    }
}
