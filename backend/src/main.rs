//! Employee Registry - Main Entry Point

use std::net::SocketAddr;
use std::sync::Arc;

use employee_registry_backend::{
    api::{self, AppState},
    config::Config,
    db,
    error::Result,
    repository::PgEmployeeRepository,
    storage, telemetry,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    let _otel_guard =
        telemetry::init_tracing(config.otel_endpoint.as_deref(), &config.otel_service_name)?;
    tracing::info!(?config, "Starting Employee Registry");

    let db_pool = db::create_pool(&config.database_url, config.database_max_connections).await?;
    tracing::info!("Connected to database");

    db::run_migrations(&db_pool).await?;
    tracing::info!("Database migrations complete");

    // One audit client for the whole process; its table is created here if missing.
    let audit_store = storage::create_audit_store(&config).await?;

    let repository = Arc::new(PgEmployeeRepository::new(db_pool));
    let state = Arc::new(AppState::new(config.clone(), repository, audit_store));

    let app = api::routes::create_router(state);

    let addr: SocketAddr = config.bind_address.parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
