//! User API handlers
//!
//! - POST /v1/users - Register a customer or translator
//! - POST /v1/auth/login - Exchange email and password for an access token
//! - GET /v1/users - All users (administrators)
//! - GET /v1/users/me - Current user
//! - GET /v1/users/{name} - Lookup by display name (administrators)
//! - GET /v1/translators?language= - Translator directory lookup (administrators)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use lingodesk_auth::{issue_access_token, AdminUser, AuthUser};
use lingodesk_common::{Error, Result, UserRole, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::UsersState;
use crate::domain::entities::User;

/// Lifetime of access tokens handed out at registration and login
const ACCESS_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

/// User response DTO
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub languages: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            languages: user.languages,
            created_at: user.created_at,
        }
    }
}

/// Request for registering a user
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    pub role: UserRole,

    pub password: String,

    #[serde(default)]
    pub languages: Vec<String>,
}

/// Request for logging in
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 320))]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// A user together with a fresh access token
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub expires_in: u64,
}

impl SessionResponse {
    fn issue(state: &UsersState, user: User) -> Result<Self> {
        let access_token = issue_access_token(
            user.id,
            Some(&user.email),
            state.auth.config(),
            ACCESS_TOKEN_TTL_SECS,
        )
        .map_err(|_| Error::Internal("Failed to issue access token".to_string()))?;

        Ok(Self {
            user: user.into(),
            access_token,
            expires_in: ACCESS_TOKEN_TTL_SECS,
        })
    }
}

/// Query parameters for the translator directory
#[derive(Debug, Deserialize)]
pub struct TranslatorQuery {
    pub language: String,
}

/// POST /v1/users
pub async fn register(
    State(state): State<UsersState>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let user = state
        .users
        .register_with_role(req.role, &req.name, &req.email, &req.password, &req.languages)
        .await?;

    Ok((StatusCode::CREATED, Json(SessionResponse::issue(&state, user)?)))
}

/// POST /v1/auth/login
pub async fn login(
    State(state): State<UsersState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<SessionResponse>> {
    let user = state.users.authenticate(&req.email, &req.password).await?;
    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(SessionResponse::issue(&state, user)?))
}

/// GET /v1/users
pub async fn list_users(
    AdminUser(_ctx): AdminUser,
    State(state): State<UsersState>,
) -> Result<Json<Vec<UserResponse>>> {
    let users = state.users.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /v1/users/{name}
pub async fn get_user_by_name(
    AdminUser(_ctx): AdminUser,
    State(state): State<UsersState>,
    Path(name): Path<String>,
) -> Result<Json<UserResponse>> {
    let user = state.users.get_user_by_name(&name).await?;
    Ok(Json(user.into()))
}

/// GET /v1/users/me
pub async fn get_me(
    AuthUser(ctx): AuthUser,
    State(state): State<UsersState>,
) -> Result<Json<UserResponse>> {
    let user = state.users.get_user(ctx.user.id).await?;
    Ok(Json(user.into()))
}

/// GET /v1/translators?language=
pub async fn list_translators(
    AdminUser(_ctx): AdminUser,
    State(state): State<UsersState>,
    Query(query): Query<TranslatorQuery>,
) -> Result<Json<Vec<UserResponse>>> {
    let translators = state.users.translators_for(&query.language).await?;
    Ok(Json(translators.into_iter().map(UserResponse::from).collect()))
}
