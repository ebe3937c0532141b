//! Route definitions for Users domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;
use super::middleware::UsersState;

/// Create all Users domain API routes
pub fn routes() -> Router<UsersState> {
    Router::new()
        .route(
            "/v1/users",
            post(handlers::register).get(handlers::list_users),
        )
        .route("/v1/auth/login", post(handlers::login))
        .route("/v1/users/me", get(handlers::get_me))
        .route("/v1/users/{name}", get(handlers::get_user_by_name))
        .route("/v1/translators", get(handlers::list_translators))
}
