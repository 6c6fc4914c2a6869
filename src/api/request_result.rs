use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::error;
use validator::ValidationErrors;

use crate::policy::PermissionDenied;

pub type RequestResult = Result<RequestSuccess, RequestError>;

/// Successful handler outcome. Bodies are already rendered JSON.
#[derive(Debug)]
pub enum RequestSuccess {
    Ok(Value),
    Created(Value),
    NoContent,
}

impl IntoResponse for RequestSuccess {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(body) => (StatusCode::OK, Json(body)).into_response(),
            Self::Created(body) => (StatusCode::CREATED, Json(body)).into_response(),
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// Every way a handler can fail. Client errors carry a `detail` message,
/// validation failures carry the per-field errors instead.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("{0}")]
    Forbidden(String),
    /// Missing, or outside the principal's visible scope
    #[error("Not found.")]
    NotFound,
    #[error("Validation failed")]
    Validation(#[from] ValidationErrors),
    #[error("{0}")]
    BadRequest(String),
    #[error("Authentication credentials were not provided or are invalid.")]
    Unauthorized,
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    /// Failure that is neither the client's nor the database's fault; the
    /// message is logged, never sent
    #[error("{0}")]
    Internal(String),
}

impl RequestError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PermissionDenied> for RequestError {
    fn from(denied: PermissionDenied) -> Self {
        Self::Forbidden(denied.reason.to_string())
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            Self::Validation(errors) => json!(errors),
            Self::Database(e) => {
                error!("Database error while handling request: {e}");
                json!({ "detail": "Internal server error" })
            }
            Self::Internal(message) => {
                error!("Internal error while handling request: {message}");
                json!({ "detail": "Internal server error" })
            }
            other => json!({ "detail": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
