//! # Request Extraction Helpers
//!
//! Routes accept `Result<Json<T>, JsonRejection>` so that body decoding
//! failures map onto the structured [`AppError::Malformed`] response
//! instead of axum's default plain-text rejection.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// Request types that carry semantic checks beyond deserialization.
pub trait Validate {
    /// Return a description of the first violated rule, if any.
    fn validate(&self) -> Result<(), String>;
}

/// Unwrap a JSON body and run its semantic validation.
pub fn extract_validated_json<T: Validate>(
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let Json(value) = body.map_err(|e| AppError::Malformed(e.body_text()))?;
    value.validate().map_err(AppError::Malformed)?;
    Ok(value)
}
