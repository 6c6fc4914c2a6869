use std::{io, net::SocketAddr};

use axum::{routing::get, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    api::health_checks::liveness, app::App, config::Config, database::setup_database,
    environment::Environment, router::router,
};

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("Database setup failed: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("Migration task ended without reporting a result")]
    MigrationsAborted,
    #[error("Server error: {0}")]
    Io(#[from] io::Error),
}

/// Boot the HTTP server.
///
/// A liveness-only listener answers while migrations run in the background;
/// the full router replaces it once the schema is current.
///
/// # Errors
/// Fails when the database is unreachable, migrations fail, or the port
/// cannot be bound.
pub async fn handle_serve_command(
    environment: Environment,
    config: Config,
) -> Result<(), ServeError> {
    let port = config.server.port;

    let liveness_server_task = tokio::spawn(start_liveness_server(port));

    let setup = async {
        let (db, migrations) = setup_database(&config.database).await?;
        migrations.await.map_err(|_| ServeError::MigrationsAborted)??;
        Ok::<_, ServeError>(db)
    }
    .await;

    liveness_server_task.abort();
    let _ = liveness_server_task.await;

    let db = setup?;
    info!("✅ Database is ready!");

    let app = App {
        config,
        environment,
        db,
    };

    start_server(router(app), port).await
}

async fn start_liveness_server(port: u16) -> Result<(), io::Error> {
    let listener = TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port))).await?;

    axum::serve(listener, Router::new().route("/liveness", get(liveness))).await
}

async fn start_server(router: Router, port: u16) -> Result<(), ServeError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;

    info!("🌐 Server starting on http://{}", addr);
    axum::serve(listener, router).await?;

    Ok(())
}
