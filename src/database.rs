use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tokio::sync::oneshot;
use tracing::debug;

use crate::config::DatabaseConfig;
use crate::database::migrations::Migrator;

pub mod migrations;
pub mod models;
pub mod repository;

/// Connect, then run pending migrations on a background task.
///
/// The receiver resolves once migrations finish so the caller can keep
/// answering liveness probes in the meantime.
///
/// # Errors
/// Returns the connection error if the database is unreachable.
pub async fn setup_database(
    db_config: &DatabaseConfig,
) -> Result<(DatabaseConnection, oneshot::Receiver<Result<(), DbErr>>), DbErr> {
    let connection = setup_database_connection(db_config).await?;
    let migrations_connection = connection.clone();

    let (sender, receiver) = oneshot::channel();

    tokio::spawn(async move {
        let migration_result = Migrator::up(&migrations_connection, None).await;
        let _ = sender.send(migration_result);
    });

    Ok((connection, receiver))
}

/// # Errors
/// Returns the connection error if the database is unreachable.
pub async fn setup_database_connection(
    db_config: &DatabaseConfig,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(db_config.url.clone());

    options.sqlx_logging(false);
    options.max_connections(db_config.pool_size);

    debug!("Connecting to database at: {}", &db_config.url);

    sea_orm::Database::connect(options).await
}
