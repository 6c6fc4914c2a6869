use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_macros::FromRef;
use sea_orm::DatabaseConnection;
use thiserror::Error;

use crate::{config::Config, environment::Environment};

/// Shared application state handed to every handler.
///
/// Extractors pull the pieces they need (`State<DatabaseConnection>`,
/// `Config` for token checks and pagination) through `FromRef`.
#[derive(Clone, Debug, FromRef)]
pub struct App {
    pub config: Config,
    pub environment: Environment,
    pub db: DatabaseConnection,
}

#[derive(Debug, Error)]
pub enum ReadinessError {
    #[error("Database connection error")]
    DatabaseError(#[from] sea_orm::DbErr),
}

impl IntoResponse for ReadinessError {
    fn into_response(self) -> Response {
        (StatusCode::SERVICE_UNAVAILABLE, self.to_string()).into_response()
    }
}
