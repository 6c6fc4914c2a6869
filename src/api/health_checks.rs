use axum::extract::State;
use sea_orm::DatabaseConnection;

use crate::app::ReadinessError;

/// Process is up. Served even while migrations are still running.
pub async fn liveness() -> &'static str {
    "OK"
}

/// Ready for traffic: the database answers.
///
/// # Errors
/// 503 when the database cannot be reached.
pub async fn readiness(State(db): State<DatabaseConnection>) -> Result<&'static str, ReadinessError> {
    db.ping().await?;

    Ok("OK")
}
