use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-level error recovered at the request boundary.
///
/// Every variant maps to an HTTP status and a stable machine-readable
/// `code` so clients can branch without parsing messages. Service crates
/// convert their domain errors into this type; nothing below the handler
/// layer returns an unstructured fault.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Bad request: {message}")]
    BadRequest { code: &'static str, message: String },

    #[error("Unauthorized: {message}")]
    Unauthorized { code: &'static str, message: String },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {message}")]
    NotFound { code: &'static str, message: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad gateway: {message}")]
    BadGateway { code: &'static str, message: String },

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound {
            code: "NotFound",
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::ValidationError(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "ValidationError".to_string(),
                err.to_string(),
            ),
            AppError::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, code.to_string(), message)
            }
            AppError::Unauthorized { code, message } => {
                (StatusCode::UNAUTHORIZED, code.to_string(), message)
            }
            AppError::Forbidden(message) => {
                (StatusCode::FORBIDDEN, "Forbidden".to_string(), message)
            }
            AppError::NotFound { code, message } => {
                (StatusCode::NOT_FOUND, code.to_string(), message)
            }
            AppError::Conflict(message) => (StatusCode::CONFLICT, "Conflict".to_string(), message),
            AppError::BadGateway { code, message } => {
                (StatusCode::BAD_GATEWAY, code.to_string(), message)
            }
            AppError::InternalError(err) => {
                tracing::error!(error = ?err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "InternalError".to_string(),
                    "Internal server error".to_string(),
                )
            }
            AppError::ConfigError(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "ConfigError".to_string(),
                err.to_string(),
            ),
        };

        (
            status,
            Json(ErrorBody {
                error: message,
                code,
            }),
        )
            .into_response()
    }
}
