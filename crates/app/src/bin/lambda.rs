//! Lingodesk API - AWS Lambda Runtime

use lambda_http::{run, Error};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;
use tracing::info;

use lingodesk_app::{body_limit, body_limit_layer, build_cors_layer, create_app};
use lingodesk_common::Config;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .without_time()
        .init();

    info!("Initializing Lingodesk API Lambda");

    let config =
        Config::from_env().map_err(|e| Error::from(format!("Configuration error: {}", e)))?;

    let pool = PgPool::connect(&config.database_url)
        .await
        .map_err(|e| Error::from(format!("Database error: {}", e)))?;

    info!("Database connection established");

    let app = create_app(config.clone(), pool)
        .await
        .map_err(|e| Error::from(format!("App initialization error: {}", e)))?;

    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config.cors_allowed_origins))
        .layer(body_limit_layer(body_limit(config.max_file_size_bytes())));

    info!("Lingodesk API Lambda ready to serve requests");

    run(app).await
}
