//! # SalesDesk Sales API
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sales API Server                                 │
//! │                                                                         │
//! │  Client ───► HTTP/JSON (8080) ───► SaleService ───► SQLite             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::info;

use sales_api::{telemetry, ApiConfig};
use salesdesk_db::Database;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ApiConfig::load()?;
    telemetry::init(config.log_format);

    info!("Starting SalesDesk Sales API...");
    info!(
        addr = %config.bind_addr(),
        database = %config.database_path,
        "Configuration loaded"
    );

    let db = Database::new(config.db_config()).await?;
    let app = sales_api::app(db.clone());

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
