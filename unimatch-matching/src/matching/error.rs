use thiserror::Error;
use unimatch_shared::errors::{AppError, ErrorCode};

use crate::embedding::EmbeddingError;

#[derive(Debug, Error)]
pub enum MatchError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("database pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("min_score must be within 0..=100, got {0}")]
    InvalidThreshold(f64),
}

impl From<MatchError> for AppError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::Embedding(e) => {
                tracing::error!(error = %e, "embedding oracle failed");
                AppError::new(ErrorCode::EmbeddingUnavailable, e.to_string())
            }
            MatchError::Database(e) => AppError::Database(e),
            MatchError::Pool(e) => AppError::Pool(e),
            MatchError::InvalidThreshold(value) => AppError::new(
                ErrorCode::InvalidThreshold,
                format!("min_score must be within 0..=100, got {value}"),
            ),
        }
    }
}

