/// Error types for the blog service
///
/// Every failure surfaces as an `AppError`, which renders the single JSON
/// error body shared by all endpoints:
/// `{"success": false, "error": "...", "status": 400, "detail": null}`.
use actix_web::{error::ResponseError, http::StatusCode, HttpRequest, HttpResponse};
use once_cell::sync::OnceCell;
use thiserror::Error;

use crate::db::StoreError;

/// Result type for blog-service operations
pub type Result<T> = std::result::Result<T, AppError>;

static PRODUCTION_MODE: OnceCell<bool> = OnceCell::new();

/// Switch error rendering to production mode (no detail, masked 5xx messages).
/// Only the first call has an effect.
pub fn set_production_mode(enabled: bool) {
    let _ = PRODUCTION_MODE.set(enabled);
}

fn is_production() -> bool {
    PRODUCTION_MODE.get().copied().unwrap_or(false)
}

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Input failed validation
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    /// Media file could not be written or read
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Storage(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let production = is_production();

        let (message, detail) = if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
            if production {
                ("Internal Server Error".to_string(), None)
            } else {
                (self.to_string(), Some(format!("{:?}", self)))
            }
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
            (self.to_string(), None)
        };

        HttpResponse::build(status).json(serde_json::json!({
            "success": false,
            "error": message,
            "status": status.as_u16(),
            "detail": detail,
        }))
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::MissingReference(what) => AppError::NotFound(format!("{what} not found")),
            StoreError::Database(e) => AppError::Database(e.to_string()),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        AppError::BadRequest(format!("Invalid multipart payload: {err}"))
    }
}

impl From<crypto_core::PasswordError> for AppError {
    fn from(err: crypto_core::PasswordError) -> Self {
        match err {
            crypto_core::PasswordError::TooShort => AppError::Validation(err.to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Route JSON body extraction failures through `AppError`
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    AppError::BadRequest(format!("Invalid JSON body: {err}")).into()
}

/// Malformed path ids are reported as missing resources
pub fn path_error_handler(
    _err: actix_web::error::PathError,
    _req: &HttpRequest,
) -> actix_web::Error {
    AppError::NotFound("Resource not found".to_string()).into()
}
