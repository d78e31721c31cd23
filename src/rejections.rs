use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{integrity::IntegrityError, names, validation::Invalid};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] Invalid),

    #[error("{0}")]
    Conflict(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("{}", names::BAD_CREDENTIALS)]
    Unauthorized,

    #[error("{}", names::MALFORMED_BODY)]
    MalformedBody,

    /// The cause has already been logged; only the generic message reaches the client.
    #[error("{0}")]
    Internal(&'static str),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) | AppError::MalformedBody => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

/// Converts lower-level failures into [`AppError`], logging anything that
/// turns into a 500.
pub trait ResultExt<T> {
    fn reject(self, message: &'static str) -> Result<T, AppError>;
}

impl<T> ResultExt<T> for color_eyre::Result<T> {
    fn reject(self, message: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            tracing::error!("{message}: {e:?}");
            AppError::Internal(message)
        })
    }
}

impl<T> ResultExt<T> for Result<T, IntegrityError> {
    fn reject(self, message: &'static str) -> Result<T, AppError> {
        self.map_err(|e| match e {
            IntegrityError::Missing(what) => AppError::NotFound(what),
            IntegrityError::Duplicate(what) => AppError::Conflict(what),
            IntegrityError::Storage(e) => {
                tracing::error!("{message}: {e:?}");
                AppError::Internal(message)
            }
        })
    }
}
