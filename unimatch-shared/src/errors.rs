use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::types::ApiErrorResponse;

/// Application error codes following the pattern E{service}{sequence}
///
/// Ranges:
/// - E0xxx: Shared/infrastructure errors
/// - E1xxx: Intake errors
/// - E2xxx: Matching errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Shared (E0xxx)
    InternalError,
    ValidationError,
    NotFound,
    BadRequest,
    ServiceUnavailable,

    // Intake (E1xxx)
    MissingField,

    // Matching (E2xxx)
    EmbeddingUnavailable,
    ParticipantNotFound,
    InvalidThreshold,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            // Shared
            Self::InternalError => "E0001",
            Self::ValidationError => "E0002",
            Self::NotFound => "E0003",
            Self::BadRequest => "E0004",
            Self::ServiceUnavailable => "E0005",

            // Intake
            Self::MissingField => "E1001",

            // Matching
            Self::EmbeddingUnavailable => "E2001",
            Self::ParticipantNotFound => "E2002",
            Self::InvalidThreshold => "E2003",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::ValidationError | Self::BadRequest | Self::MissingField
            | Self::InvalidThreshold => StatusCode::BAD_REQUEST,
            Self::NotFound | Self::ParticipantNotFound => StatusCode::NOT_FOUND,
            Self::EmbeddingUnavailable => StatusCode::BAD_GATEWAY,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Known {
        code: ErrorCode,
        message: String,
    },

    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("database pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Known {
            code,
            message: message.into(),
        }
    }

    /// Code this error renders with. Infrastructure failures map onto the
    /// shared E0xxx range.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            AppError::Known { code, .. } => *code,
            AppError::Database(diesel::result::Error::NotFound) => ErrorCode::NotFound,
            AppError::Validation(_) => ErrorCode::ValidationError,
            AppError::Pool(_) => ErrorCode::ServiceUnavailable,
            AppError::Internal(_) | AppError::Database(_) => ErrorCode::InternalError,
        }
    }

    /// HTTP status this error renders with.
    pub fn status_code(&self) -> StatusCode {
        self.error_code().status_code()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.error_code();
        let message = match &self {
            AppError::Known { message, .. } | AppError::Validation(message) => message.clone(),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal server error");
                "internal server error".to_string()
            }
            AppError::Database(diesel::result::Error::NotFound) => "resource not found".to_string(),
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                "database error".to_string()
            }
            AppError::Pool(err) => {
                tracing::error!(error = %err, "database pool error");
                "database unavailable".to_string()
            }
        };

        let status = code.status_code();
        let error_response = ApiErrorResponse::new(code.code(), message);

        (status, Json(error_response)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
