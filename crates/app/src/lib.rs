//! Lingodesk application composition root
//!
//! Wires the Postgres-backed ports into the domain services and composes
//! the domain routers into a single application.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::Router;
use lingodesk_auth::{AuthBackend, AuthConfig};
use lingodesk_common::{AdminBootstrap, Config};
use lingodesk_email::{EmailConfig, EmailService, EmailServiceFactory};
use lingodesk_projects::{
    EmailNotificationDispatcher, FirstAvailable, LocalFileStore, ProjectLifecycleService,
    ProjectsRepositories, ProjectsState,
};
use lingodesk_users::{UserDirectory, UserService, UsersRepositories, UsersState};
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

/// Room for multipart boundaries and text fields on top of the file itself
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Create the main application router with all routes
pub async fn create_app(config: Config, pool: PgPool) -> Result<Router, anyhow::Error> {
    let auth = AuthBackend::new(pool.clone(), AuthConfig::from(&config));

    let users_repos = UsersRepositories::new(pool.clone());
    let directory: Arc<dyn UserDirectory> = Arc::new(users_repos.users);

    let email_config = EmailConfig::from_env()?;
    let email: Arc<dyn EmailService> = EmailServiceFactory::create(email_config).await?;

    let projects_repos = ProjectsRepositories::new(pool);
    let service = ProjectLifecycleService::new(
        Arc::new(projects_repos.projects),
        Arc::new(LocalFileStore::new(&config.upload_dir)),
        Arc::clone(&directory),
        Arc::new(FirstAvailable::new(Arc::clone(&directory))),
        Arc::new(EmailNotificationDispatcher::new(Arc::clone(&directory), email)),
        config.max_file_size_bytes(),
    );

    let users = UserService::new(directory);
    bootstrap_admin(&users, config.admin_bootstrap.as_ref()).await?;

    let users_state = UsersState {
        users,
        auth: auth.clone(),
    };
    let projects_state = ProjectsState { service, auth };

    tracing::info!(
        upload_dir = %config.upload_dir,
        max_file_size_mb = config.max_file_size_mb,
        "Application composed"
    );

    Ok(build_router(
        users_state,
        projects_state,
        body_limit(config.max_file_size_bytes()),
    ))
}

/// Make sure the configured administrator account exists
pub async fn bootstrap_admin(
    users: &UserService,
    admin: Option<&AdminBootstrap>,
) -> Result<(), anyhow::Error> {
    let Some(admin) = admin else {
        tracing::debug!("No bootstrap administrator configured");
        return Ok(());
    };
    let user = users
        .ensure_administrator(&admin.name, &admin.email, &admin.password)
        .await?;
    tracing::info!(user_id = %user.id, email = %user.email, "Bootstrap administrator ready");
    Ok(())
}

/// Compose the domain routers behind the shared body limit
pub fn build_router(users: UsersState, projects: ProjectsState, body_limit: usize) -> Router {
    Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { concat!("Lingodesk API v", env!("CARGO_PKG_VERSION")) }),
        )
        .merge(lingodesk_users::routes().with_state(users))
        .merge(lingodesk_projects::routes().with_state(projects))
        .layer(DefaultBodyLimit::max(body_limit))
}

/// Largest accepted request body for a given file-size ceiling
pub fn body_limit(max_file_size_bytes: usize) -> usize {
    max_file_size_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES)
}

/// Transport-level body limit, enforced before any extractor runs
pub fn body_limit_layer(limit: usize) -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(limit)
}

/// CORS for the configured origins; permissive when none are configured
pub fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        tracing::warn!("CORS_ALLOWED_ORIGINS not set, allowing any origin");
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(3600))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
