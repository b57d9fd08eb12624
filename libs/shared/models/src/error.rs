use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("not authorized")]
    MissingToken,

    #[error("unauthorized")]
    InvalidOrExpiredToken,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingToken | AppError::InvalidOrExpiredToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::BadRequest(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client.
    pub fn message(&self) -> String {
        match self {
            AppError::MissingToken => "not authorized".to_string(),
            AppError::InvalidOrExpiredToken => "unauthorized".to_string(),
            AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::AlreadyExists(msg)
            | AppError::BadRequest(msg)
            | AppError::ValidationError(msg) => msg.clone(),
            AppError::StoreUnavailable(_) => "database unavailable".to_string(),
            AppError::Internal(_) => "internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("Error: {}: {}", status, self);
        } else {
            tracing::warn!("Error: {}: {}", status, self);
        }

        let body = Json(json!({
            "message": self.message()
        }));

        (status, body).into_response()
    }
}
