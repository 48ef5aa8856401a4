use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::users::repo::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// An integrity constraint rejected the write (in practice the unique email).
    /// The store message is passed through to the client.
    #[error("Database error: {0}")]
    DuplicateEmail(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateEmail(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn user_not_found(user_id: uuid::Uuid) -> Self {
        AppError::NotFound(format!("User with id {user_id} not found"))
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::IntegrityViolation(msg) => AppError::DuplicateEmail(msg),
            other => AppError::Internal(other.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            AppError::Internal(e) => {
                error!(error = ?e, "internal error");
                "Internal server error".to_string()
            }
            AppError::DuplicateEmail(_) => {
                warn!(error = %self, "integrity constraint violated");
                self.to_string()
            }
            other => other.to_string(),
        };
        let body = Json(json!({ "detail": detail }));
        if status == StatusCode::UNAUTHORIZED {
            (status, [(header::WWW_AUTHENTICATE, "Bearer")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}
