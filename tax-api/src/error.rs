//! Error types for the tax API

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tax_core::RepositoryError;
use tax_core::calculations::ResolveError;
use thiserror::Error;

use crate::boundary::{Fault, fault_response};

#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or inconsistent input; the message is sent to the client.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    UnsupportedMediaType(String),

    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message).into_response(),
            ApiError::UnsupportedMediaType(message) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, message).into_response()
            }
            ApiError::Storage(e) => {
                tracing::error!(error = %e, "storage fault");
                fault_response(Fault::Storage)
            }
            ApiError::Internal(e) => {
                tracing::error!(error = ?e, "unexpected fault");
                fault_response(Fault::Unexpected)
            }
        }
    }
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NoMatchingRecord => ApiError::NotFound(
                "No tax record found for that municipality and date.".to_string(),
            ),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::UnsupportedMediaType(rejection.body_text())
            }
            _ => ApiError::Validation(rejection.body_text()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}
