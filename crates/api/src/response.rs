//! API response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Standard success envelope: `{message, status, data}`.
///
/// Errors never pass through here; `AppError` renders its own
/// `{message, code}` body.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Human-readable outcome.
    pub message: String,
    /// HTTP status code echoed in the body.
    pub status: u16,
    /// The payload.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 response.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            status: StatusCode::OK.as_u16(),
            data,
        }
    }

    /// 201 response.
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            status: StatusCode::CREATED.as_u16(),
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
