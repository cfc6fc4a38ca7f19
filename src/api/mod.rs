//! REST API module.
//!
//! Contains all API routes and handlers. Successful responses carry the bare
//! JSON payload; failures, including extractor rejections, carry the
//! `{statusCode, code, message}` body built by `AppError`.

mod departments;
mod employees;
mod reports;

pub use departments::*;
pub use employees::*;
pub use reports::*;

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::errors::AppError;

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(data))
}

/// JSON body extractor that rejects with the JSON error body.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path extractor that rejects with the JSON error body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Query string extractor that rejects with the JSON error body.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Decode a body that clients may omit entirely.
///
/// An empty or whitespace-only body yields `T::default()`.
pub(crate) fn optional_body<T>(body: &Bytes) -> Result<T, AppError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DismissRequest;

    #[test]
    fn test_optional_body() {
        let empty: DismissRequest = optional_body(&Bytes::new()).unwrap();
        assert!(empty.dismissal_date.is_none());

        let blank: DismissRequest = optional_body(&Bytes::from_static(b" \n")).unwrap();
        assert!(blank.dismissal_date.is_none());

        let given: DismissRequest =
            optional_body(&Bytes::from_static(br#"{"dismissalDate":"2024-03-01"}"#)).unwrap();
        assert_eq!(given.dismissal_date.as_deref(), Some("2024-03-01"));

        let broken = optional_body::<DismissRequest>(&Bytes::from_static(b"{oops"));
        assert!(matches!(broken, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_success_is_bare_payload() {
        let Ok(Json(data)) = success(vec![1, 2]) else {
            panic!("success() returned an error");
        };
        assert_eq!(serde_json::to_value(data).unwrap(), serde_json::json!([1, 2]));
    }
}
