//! Project lifecycle API handlers
//!
//! - PUT /v1/projects/{id}/status - Guarded transition to a named state
//! - PUT /v1/projects/{id}/assign - Assign a translator (administrators)
//! - POST /v1/projects/{id}/accept - Approve the translation (owning customer)
//! - POST /v1/projects/{id}/reject - Reject with feedback (owning customer)
//! - POST /v1/projects/{id}/close - Close the project (administrators)

use axum::{
    extract::{Path, State},
    Json,
};
use lingodesk_auth::{AdminUser, AuthUser};
use lingodesk_common::{Result, UserRole, ValidatedJson};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::projects::ProjectResponse;
use crate::api::middleware::ProjectsState;
use crate::domain::entities::MAX_DESCRIPTION_LEN;

// `validator` length bounds are `u64`
const MAX_FEEDBACK_LEN: u64 = MAX_DESCRIPTION_LEN as u64;

/// Request for a guarded state transition
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    #[validate(length(min = 1, max = 32))]
    pub state: String,
}

/// Request for assigning a translator
#[derive(Debug, Deserialize, Validate)]
pub struct AssignTranslatorRequest {
    pub translator_id: Uuid,
}

/// Request for rejecting a translation
#[derive(Debug, Deserialize, Validate)]
pub struct RejectRequest {
    #[validate(length(max = MAX_FEEDBACK_LEN))]
    pub feedback: String,
}

/// PUT /v1/projects/{id}/status
pub async fn update_status(
    AuthUser(ctx): AuthUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateStatusRequest>,
) -> Result<Json<ProjectResponse>> {
    let project = state
        .service
        .update_status(id, &req.state, &ctx.actor())
        .await?;
    Ok(Json(project.into()))
}

/// PUT /v1/projects/{id}/assign
pub async fn assign_translator(
    AdminUser(ctx): AdminUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<AssignTranslatorRequest>,
) -> Result<Json<ProjectResponse>> {
    let project = state
        .service
        .assign_translator_as(&ctx.actor(), id, req.translator_id)
        .await?;
    Ok(Json(project.into()))
}

/// POST /v1/projects/{id}/accept
pub async fn accept_translation(
    AuthUser(ctx): AuthUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectResponse>> {
    ctx.require_role(&[UserRole::Customer])?;
    let project = state.service.accept_translation_as(&ctx.actor(), id).await?;
    Ok(Json(project.into()))
}

/// POST /v1/projects/{id}/reject
pub async fn reject_translation(
    AuthUser(ctx): AuthUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<RejectRequest>,
) -> Result<Json<ProjectResponse>> {
    ctx.require_role(&[UserRole::Customer])?;
    let project = state
        .service
        .reject_translation_as(&ctx.actor(), id, &req.feedback)
        .await?;
    Ok(Json(project.into()))
}

/// POST /v1/projects/{id}/close
pub async fn close_project(
    AdminUser(ctx): AdminUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectResponse>> {
    let project = state.service.close_project_as(&ctx.actor(), id).await?;
    Ok(Json(project.into()))
}
