use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use docvault_core::CoreConfig;

/// Main entry point for the DocVault server
///
/// Resolves configuration once, opens the database and storage root, and serves the REST API
/// (with Swagger UI at `/swagger-ui`) until interrupted.
///
/// # Environment Variables
/// - `DOCVAULT_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `DOCVAULT_DATABASE_PATH`: SQLite database file (default: "docvault.db")
/// - `DOCVAULT_STORAGE_ROOT`: Directory uploaded files are written to (default: "docs")
/// - `DOCVAULT_MAX_UPLOAD_BYTES`: Upload size limit in bytes (default: 10 MiB)
/// - `DOCVAULT_DELETE_FILES`: Remove files when their document is deleted (default: false)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - any configuration value is invalid,
/// - the database or storage root cannot be opened,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("docvault=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = CoreConfig::from_env()?;
    let rest_addr = std::env::var("DOCVAULT_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    tracing::info!(
        database = %cfg.database_path().display(),
        storage_root = %cfg.storage_root().display(),
        max_upload_bytes = cfg.max_upload_bytes(),
        delete_files = cfg.delete_files(),
        "++ Loaded configuration"
    );

    let app = router(AppState::open(&cfg)?);

    tracing::info!("++ Starting DocVault REST on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- DocVault REST stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {:?}", e);
        std::future::pending::<()>().await;
    }
}
