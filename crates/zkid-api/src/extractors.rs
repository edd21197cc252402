//! # Request Extraction
//!
//! Handlers take `Result<Json<T>, JsonRejection>` and pass it through
//! [`extract_json`] so that malformed bodies produce the API's own
//! `{ error }` shape instead of Axum's plain-text rejection.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::AppError;

/// Extract a JSON body, mapping rejections to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}
