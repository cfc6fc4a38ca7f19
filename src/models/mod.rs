//! Data models for the staff registry.
//!
//! Field names serialize in camelCase to match the browser client.

mod department;
mod employee;
mod report;

pub use department::*;
pub use employee::*;
pub use report::*;

use serde::{Deserialize, Deserializer};

use crate::errors::AppError;

/// Deserialize a field that may be absent, `null`, or set.
///
/// Combined with `#[serde(default)]`: absent gives `None`, `null` gives `Some(None)`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Trimmed, non-empty text field no longer than `max_chars`.
pub(crate) fn require_text(field: &str, value: &str, max_chars: usize) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    if value.chars().count() > max_chars {
        return Err(AppError::Validation(format!(
            "{} must be at most {} characters",
            field, max_chars
        )));
    }
    Ok(value.to_string())
}

/// Optional free-text field; blank input is stored as absent.
pub(crate) fn optional_text(
    field: &str,
    value: Option<&str>,
    max_chars: usize,
) -> Result<Option<String>, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => require_text(field, v, max_chars).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("fullName", "  Ivanov  ", 10).unwrap(), "Ivanov");
        assert!(require_text("fullName", "", 10).is_err());
        assert!(require_text("fullName", "abcdefghijk", 10).is_err());
    }

    #[test]
    fn test_optional_text_blank_is_none() {
        assert_eq!(optional_text("phone", Some("  "), 50).unwrap(), None);
        assert_eq!(optional_text("phone", None, 50).unwrap(), None);
        assert_eq!(
            optional_text("phone", Some("+7 900"), 50).unwrap(),
            Some("+7 900".to_string())
        );
    }
}
