use sea_orm::{DbErr, SqlErr};

use crate::api::request_result::RequestError;

/// Turn a unique-index violation into a 400 with `message`; any other database
/// error passes through untouched.
///
/// Works for both Postgres and SQLite since it relies on the driver-level
/// error classification rather than message text.
pub fn unique_violation_as(message: &'static str) -> impl Fn(DbErr) -> RequestError {
    move |db_err: DbErr| match db_err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => RequestError::bad_request(message),
        _ => RequestError::Database(db_err),
    }
}
