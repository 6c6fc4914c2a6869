use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use validator::ValidationErrors;

/// Rejection of [`crate::api::validated_json::ValidatedJson`].
#[derive(Debug, thiserror::Error)]
pub enum JsonError {
    #[error("Invalid JSON body: {0}")]
    InvalidJson(#[from] JsonRejection),
    #[error("Validation error")]
    ValidationError(ValidationErrors),
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidJson(rejection) => {
                let status = match rejection.status() {
                    StatusCode::UNSUPPORTED_MEDIA_TYPE => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    _ => StatusCode::BAD_REQUEST,
                };

                (status, Json(json!({ "detail": rejection.body_text() }))).into_response()
            }
            Self::ValidationError(errors) => {
                (StatusCode::BAD_REQUEST, Json(json!(errors))).into_response()
            }
        }
    }
}
