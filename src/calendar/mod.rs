//! Calendar helpers: ISO date parsing and whole-year arithmetic.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::errors::AppError;

/// Today's date in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Midnight UTC at the start of `date`.
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Parse an ISO-8601 instant.
///
/// Accepts RFC 3339 (`2023-01-10T08:00:00Z`), a zone-less date-time read as UTC,
/// or a bare date meaning midnight UTC.
pub fn parse_instant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(start_of_day)
}

/// Parse an ISO-8601 calendar date. A full instant is truncated to its UTC date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| parse_instant(trimmed).map(|dt| dt.date_naive()))
}

/// Parse a date-valued request field, naming the field in the validation error.
pub fn require_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    parse_date(value)
        .ok_or_else(|| AppError::Validation(format!("{} must be an ISO-8601 date", field)))
}

/// Parse an optional date-valued request field.
pub fn optional_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    value.map(|v| require_date(field, v)).transpose()
}

/// Parse an optional instant-valued request field.
pub fn optional_instant(
    field: &str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, AppError> {
    value
        .map(|v| {
            parse_instant(v).ok_or_else(|| {
                AppError::Validation(format!("{} must be an ISO-8601 date", field))
            })
        })
        .transpose()
}

/// Number of full years elapsed from `start` to `end`.
///
/// The year difference is reduced by one when the anniversary of `start`
/// has not yet been reached in `end`'s year. A 29 February start therefore
/// only completes a year on 1 March in non-leap years.
pub fn whole_years_between(start: NaiveDate, end: NaiveDate) -> i32 {
    let mut years = end.year() - start.year();
    if (end.month(), end.day()) < (start.month(), start.day()) {
        years -= 1;
    }
    years
}

/// Age in whole years on `today`.
pub fn age_on(birth_date: NaiveDate, today: NaiveDate) -> i32 {
    whole_years_between(birth_date, today)
}

/// Tenure in whole years, counted up to the dismissal date or `today` while employed.
pub fn years_of_work(hire_date: NaiveDate, dismissal_date: Option<NaiveDate>, today: NaiveDate) -> i32 {
    whole_years_between(hire_date, dismissal_date.unwrap_or(today))
}
