use crate::domain::accounts::AccountStoreError;
use crate::domain::auth::TokenError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Authentication failed: {0}")]
    AuthError(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Token expired")]
    ExpiredToken,
    #[error("Stale token")]
    StaleToken,
    #[error("Upload error: {0}")]
    UploadError(String),
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Internal server error: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::UploadError(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AuthError(_)
            | AppError::Unauthorized(_)
            | AppError::InvalidToken(_)
            | AppError::ExpiredToken
            | AppError::StaleToken => StatusCode::UNAUTHORIZED,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(msg)
            | AppError::Conflict(msg)
            | AppError::NotFound(msg)
            | AppError::AuthError(msg)
            | AppError::Unauthorized(msg)
            | AppError::InvalidToken(msg)
            | AppError::UploadError(msg) => msg.clone(),
            AppError::ExpiredToken => "Refresh token has expired".to_string(),
            AppError::StaleToken => {
                "Refresh token is no longer active, please log in again".to_string()
            }
            AppError::DatabaseError(_) => "Database error".to_string(),
            AppError::InternalServerError(_) => "Internal server error".to_string(),
        }
    }
}

impl From<AccountStoreError> for AppError {
    fn from(err: AccountStoreError) -> Self {
        match err {
            AccountStoreError::Conflict(msg) => AppError::Conflict(msg),
            AccountStoreError::Other(e) => AppError::InternalServerError(e),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => {
                AppError::InvalidToken("Invalid or malformed refresh token".to_string())
            }
            TokenError::Expired => AppError::ExpiredToken,
        }
    }
}

/// Error envelope, mirrors `ApiResponse` with `data` always null
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub status: u16,
    #[schema(value_type = Option<Object>)]
    pub data: Option<serde_json::Value>,
    pub message: String,
    /// Diagnostic cause, only present in debug builds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            data: None,
            message: message.into(),
            detail: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::DatabaseError(e) => tracing::error!("Database error: {:?}", e),
            AppError::InternalServerError(e) => tracing::error!("Internal server error: {:?}", e),
            _ => tracing::debug!("Request rejected: {}", self),
        }

        let mut body = ErrorResponse::new(status, self.public_message());
        if cfg!(debug_assertions) {
            body.detail = Some(self.to_string());
        }

        (status, Json(body)).into_response()
    }
}
