//! Route definitions for Projects domain API

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{files, lifecycle, projects};
use super::middleware::ProjectsState;

/// Create project CRUD routes
fn project_routes() -> Router<ProjectsState> {
    Router::new()
        .route(
            "/v1/projects",
            get(projects::list_projects).post(projects::create_project),
        )
        .route("/v1/projects/{id}", get(projects::get_project))
}

/// Create lifecycle routes
fn lifecycle_routes() -> Router<ProjectsState> {
    Router::new()
        .route("/v1/projects/{id}/status", put(lifecycle::update_status))
        .route("/v1/projects/{id}/assign", put(lifecycle::assign_translator))
        .route("/v1/projects/{id}/accept", post(lifecycle::accept_translation))
        .route("/v1/projects/{id}/reject", post(lifecycle::reject_translation))
        .route("/v1/projects/{id}/close", post(lifecycle::close_project))
}

/// Create file transfer routes
fn file_routes() -> Router<ProjectsState> {
    Router::new()
        .route("/v1/projects/{id}/upload", post(files::upload_translation))
        .route(
            "/v1/projects/{id}/download/original",
            get(files::download_original),
        )
        .route(
            "/v1/projects/{id}/download/translation",
            get(files::download_translation),
        )
}

/// Create all Projects domain API routes
pub fn routes() -> Router<ProjectsState> {
    Router::new()
        .merge(project_routes())
        .merge(lifecycle_routes())
        .merge(file_routes())
}
