//! Error types for artlog.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Stable machine-readable codes for invalid-request and conflict errors.
///
/// These are part of the API contract; clients branch on them.
pub mod codes {
    #![allow(missing_docs)]

    pub const INVALID_EXHIBITION_NAME: &str = "INVALID_EXHIBITION_NAME";
    pub const INVALID_EXHIBITION_PERIOD: &str = "INVALID_EXHIBITION_PERIOD";
    pub const INVALID_EXHIBITION_PLACE: &str = "INVALID_EXHIBITION_PLACE";
    pub const INVALID_EXHIBITION_ADDRESS: &str = "INVALID_EXHIBITION_ADDRESS";
    pub const INVALID_EXHIBITION_INQUIRY: &str = "INVALID_EXHIBITION_INQUIRY";
    pub const INVALID_EXHIBITION_FEE: &str = "INVALID_EXHIBITION_FEE";
    pub const INVALID_EXHIBITION_COORDINATE: &str = "INVALID_EXHIBITION_COORDINATE";
    pub const INVALID_URL_FORMAT: &str = "INVALID_URL_FORMAT";

    pub const INVALID_REVIEW_TITLE_LENGTH: &str = "INVALID_REVIEW_TITLE_LENGTH";
    pub const INVALID_REVIEW_CONTENT_LENGTH: &str = "INVALID_REVIEW_CONTENT_LENGTH";
    pub const INVALID_REVIEW_DATE: &str = "INVALID_REVIEW_DATE";
    pub const INVALID_REVIEW_PHOTO_COUNT: &str = "INVALID_REVIEW_PHOTO_COUNT";
    pub const INVALID_REVIEW_PHOTO_PATH: &str = "INVALID_REVIEW_PHOTO_PATH";

    pub const INVALID_COMMENT_CONTENT_LENGTH: &str = "INVALID_COMMENT_CONTENT_LENGTH";
    pub const INVALID_COMMENT_PARENT: &str = "INVALID_COMMENT_PARENT";

    pub const INVALID_COMMENT_SORT_TYPE: &str = "INVALID_COMMENT_SORT_TYPE";
    pub const INVALID_EXHIBITION_SORT_TYPE: &str = "INVALID_EXHIBITION_SORT_TYPE";
    pub const INVALID_REVIEW_SORT_TYPE: &str = "INVALID_REVIEW_SORT_TYPE";
    pub const INVALID_SORT_DIRECTION: &str = "INVALID_SORT_DIRECTION";

    pub const INVALID_FILTER: &str = "INVALID_FILTER";
    pub const INVALID_SEARCH_QUERY: &str = "INVALID_SEARCH_QUERY";
    pub const INVALID_DISTANCE: &str = "INVALID_DISTANCE";

    pub const INVALID_EMAIL_FORMAT: &str = "INVALID_EMAIL_FORMAT";
    pub const INVALID_NICKNAME_LENGTH: &str = "INVALID_NICKNAME_LENGTH";
    pub const INVALID_PASSWORD_LENGTH: &str = "INVALID_PASSWORD_LENGTH";

    pub const DUPLICATE_EMAIL: &str = "DUPLICATE_EMAIL";
    pub const DUPLICATE_NICKNAME: &str = "DUPLICATE_NICKNAME";
    pub const DUPLICATE_LIKE: &str = "DUPLICATE_LIKE";
}

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // === Client Errors ===
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Exhibition not found: {0}")]
    ExhibitionNotFound(String),

    #[error("Review not found: {0}")]
    ReviewNotFound(String),

    #[error("Comment not found: {0}")]
    CommentNotFound(String),

    /// Field validation, sort key, or filter failure. Carries a stable code
    /// from [`codes`].
    #[error("{message}")]
    Invalid {
        /// Machine-readable code, see [`codes`].
        code: &'static str,
        /// Human-readable description.
        message: String,
    },

    /// Uniqueness violation, proactive or surfaced by a storage constraint.
    #[error("{message}")]
    AlreadyExists {
        /// Machine-readable code, see [`codes`].
        code: &'static str,
        /// Human-readable description.
        message: String,
    },

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    // === Server Errors ===
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Build an invalid-request error with a stable code.
    pub fn invalid(code: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            code,
            message: message.into(),
        }
    }

    /// Build an already-exists error with a stable code.
    pub fn already_exists(code: &'static str, message: impl Into<String>) -> Self {
        Self::AlreadyExists {
            code,
            message: message.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            // 4xx Client Errors
            Self::NotFound(_)
            | Self::UserNotFound(_)
            | Self::ExhibitionNotFound(_)
            | Self::ReviewNotFound(_)
            | Self::CommentNotFound(_) => StatusCode::NOT_FOUND,
            Self::Invalid { .. } => StatusCode::BAD_REQUEST,
            Self::AlreadyExists { .. } => StatusCode::CONFLICT,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,

            // 5xx Server Errors
            Self::Database(_) | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::ExhibitionNotFound(_) => "EXHIBITION_NOT_FOUND",
            Self::ReviewNotFound(_) => "REVIEW_NOT_FOUND",
            Self::CommentNotFound(_) => "COMMENT_NOT_FOUND",
            Self::Invalid { code, .. } | Self::AlreadyExists { code, .. } => code,
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        // Server errors are logged with full context; the client only sees a
        // generic description.
        let message = if self.is_server_error() {
            tracing::error!(error = %self, code = code, "Server error occurred");
            "Internal server error".to_string()
        } else {
            tracing::debug!(error = %self, code = code, "Client error occurred");
            self.to_string()
        };

        let body = Json(json!({
            "message": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Invalid {
            code: "VALIDATION_ERROR",
            message: err.to_string(),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::ExhibitionNotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::invalid(codes::INVALID_REVIEW_DATE, "future date").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::already_exists(codes::DUPLICATE_LIKE, "dup").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::Database("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_carries_stable_code() {
        let err = AppError::invalid(codes::INVALID_COMMENT_SORT_TYPE, "bogus is not a sort key");
        assert_eq!(err.error_code(), "INVALID_COMMENT_SORT_TYPE");
        assert_eq!(err.to_string(), "bogus is not a sort key");
    }

    #[test]
    fn test_server_error_flag() {
        assert!(AppError::Internal("x".into()).is_server_error());
        assert!(!AppError::Unauthorized.is_server_error());
    }
}
