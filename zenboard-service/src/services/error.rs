use thiserror::Error;
use zenboard_core::error::AppError;

use super::login::OrchestrationError;
use super::session_store::SessionError;
use super::token::AuthError;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already registered")]
    EmailAlreadyRegistered,

    #[error("Principal not found")]
    PrincipalNotFound,

    #[error("Principal is not awaiting review")]
    NotPendingReview,

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Internal(e) => AppError::InternalError(e),
            ServiceError::InvalidCredentials => AppError::Unauthorized {
                code: "InvalidCredentials",
                message: "Invalid credentials".to_string(),
            },
            ServiceError::EmailAlreadyRegistered => {
                AppError::Conflict("Email already registered".to_string())
            }
            ServiceError::PrincipalNotFound => AppError::NotFound {
                code: "NotFound",
                message: "Principal not found".to_string(),
            },
            ServiceError::NotPendingReview => {
                AppError::Conflict("Principal is not awaiting review".to_string())
            }
            ServiceError::Validation(msg) => AppError::BadRequest {
                code: "BadRequest",
                message: msg,
            },
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        AppError::Unauthorized {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

impl From<OrchestrationError> for AppError {
    fn from(err: OrchestrationError) -> Self {
        match err {
            OrchestrationError::Upstream(e) => AppError::BadGateway {
                code: "UpstreamError",
                message: e.to_string(),
            },
            OrchestrationError::Identity(msg) => AppError::BadRequest {
                code: "IdentityError",
                message: msg,
            },
            OrchestrationError::Session(SessionError::NotFound) => AppError::NotFound {
                code: "SessionNotFound",
                message: "Login session not found".to_string(),
            },
            OrchestrationError::Session(SessionError::AlreadyTerminal) => AppError::BadRequest {
                code: "SessionAlreadyTerminal",
                message: "Login session is already completed or expired".to_string(),
            },
            OrchestrationError::Internal(e) => AppError::InternalError(e),
        }
    }
}
