use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde_json::json;
use tracing::{debug, error};

use crate::auth::{jwt, principal::Principal};
use crate::config::Config;
use crate::database::models::user;

/// Authenticated user extracted from the `Authorization: Bearer <jwt>` header.
///
/// The user row is loaded on every request, so deleted users lose access
/// immediately even while their token is still valid.
///
/// # Example
/// ```rust,ignore
/// pub async fn me(current_user: CurrentUser) -> RequestResult {
///     Ok(RequestSuccess::Ok(json!({ "email": current_user.email })))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: user::Model,
}

impl CurrentUser {
    #[must_use]
    pub fn principal(&self) -> Principal {
        Principal::from(&self.user)
    }
}

impl std::ops::Deref for CurrentUser {
    type Target = user::Model;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing, malformed or expired token, or a token for an unknown user
    #[error("Authentication credentials were not provided or are invalid.")]
    Unauthorized,
    #[error("Internal server error")]
    DatabaseError(#[from] sea_orm::DbErr),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::DatabaseError(e) => {
                error!("Failed to load current user: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    Config: FromRef<S>,
    DatabaseConnection: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or(AuthError::Unauthorized)?;

        let config = Config::from_ref(state);
        let claims = jwt::verify_token(&config.jwt, token).map_err(|e| {
            debug!("Rejected bearer token: {e}");
            AuthError::Unauthorized
        })?;
        let user_id = claims.user_id().ok_or(AuthError::Unauthorized)?;

        let db = DatabaseConnection::from_ref(state);
        let user = user::Entity::find_by_id(user_id)
            .one(&db)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        Ok(Self { user })
    }
}
