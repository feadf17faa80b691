use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[derive(Serialize)]
struct ErrBody {
    status: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, msg) = match &self {
            ApiError::BadRequest(s) => (StatusCode::BAD_REQUEST, s),
            ApiError::NotFound(s) => (StatusCode::NOT_FOUND, s),
            ApiError::Conflict(s) => (StatusCode::CONFLICT, s),
            ApiError::Internal(s) => (StatusCode::INTERNAL_SERVER_ERROR, s),
        };
        (
            code,
            Json(ErrBody {
                status: "error",
                message: msg.clone(),
            }),
        )
            .into_response()
    }
}

impl From<String> for ApiError {
    fn from(s: String) -> Self {
        ApiError::Internal(s)
    }
}

// Conversion from domain errors to the web error envelope
impl From<crate::errors::ZentheraError> for ApiError {
    fn from(err: crate::errors::ZentheraError) -> Self {
        use crate::errors::ZentheraError;
        match err {
            ZentheraError::Config { message } => ApiError::BadRequest(message),
            ZentheraError::Validation { field, message } => {
                ApiError::BadRequest(format!("Validation error for {field}: {message}"))
            }
            ZentheraError::NotFound { resource, id } => {
                ApiError::NotFound(format!("Resource '{resource}' with ID '{id}' not found"))
            }
            ZentheraError::LockPoisoned { resource } => {
                ApiError::Internal(format!("Lock for {resource} poisoned"))
            }
            ZentheraError::Serialization { context, source } => {
                ApiError::BadRequest(format!("Serialization {context} failed: {source}"))
            }
            ZentheraError::Io { operation, source } => {
                ApiError::Internal(format!("I/O {operation} failed: {source}"))
            }
            ZentheraError::Internal { message } => ApiError::Internal(message),
        }
    }
}
