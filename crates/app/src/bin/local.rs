// Lingodesk API - Local Development Server

use std::net::SocketAddr;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use lingodesk_app::{body_limit, body_limit_layer, build_cors_layer, create_app};
use lingodesk_common::Config;
use sqlx::PgPool;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.rust_log)),
        )
        .pretty()
        .init();

    info!("Starting Lingodesk API local development server");

    let pool = PgPool::connect(&config.database_url).await.map_err(|e| {
        error!(error = %e, "Failed to connect to database");
        anyhow::anyhow!("Database connection failed: {}", e)
    })?;

    info!("Database connection established");

    let app = create_app(config.clone(), pool).await.map_err(|e| {
        error!(error = %e, "Failed to create application");
        e
    })?;

    // Outermost last: trace -> cors -> body limit -> app
    let app = app
        .layer(body_limit_layer(body_limit(config.max_file_size_bytes())))
        .layer(build_cors_layer(&config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(%addr, "Server listening");
    info!("Health check available at http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
