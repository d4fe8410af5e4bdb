//! Maps the three error categories of §7 onto HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::http::dto::ErrorResponse;

pub enum AppError {
    /// Bad input: unknown schedule reference, malformed body. No state mutated.
    BadRequest(String),
    /// Fatal construction failure: sink couldn't connect, schema couldn't bind.
    SinkConnectFailed(String),
    /// Unknown generator id.
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::SinkConnectFailed(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
