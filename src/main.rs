//! estudiantes-api server entry point.
//!
//! Loads configuration, opens the configured store and serves the REST API.

use std::sync::Arc;

use anyhow::Context;

use estudiantes_api::api;
use estudiantes_api::app_state::AppState;
use estudiantes_api::config::{AppConfig, StorageBackend};
use estudiantes_api::persistence::{MemoryStore, PostgresStore, StudentStore};
use estudiantes_api::service::StudentService;
use estudiantes_api::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::from_env()?;
    telemetry::init(config.log_format);
    tracing::info!(addr = %config.listen_addr, backend = ?config.storage_backend, "starting estudiantes-api");

    // Build persistence layer
    let store: Arc<dyn StudentStore> = match config.storage_backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::Postgres => {
            let store = PostgresStore::connect(&config)
                .await
                .context("connecting to PostgreSQL")?;
            if config.database_run_migrations {
                store.migrate().await.context("running migrations")?;
                tracing::info!("migrations applied");
            }
            Arc::new(store)
        }
    };

    // Build service layer
    let student_service = Arc::new(StudentService::new(store));

    // Build application state
    let app_state = AppState {
        student_service,
        page_size: config.page_size,
    };

    let app = api::build_app(app_state, config.request_timeout);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
