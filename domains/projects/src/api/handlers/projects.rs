//! Project API handlers
//!
//! - POST /v1/projects - Create a project from a multipart form (customers)
//! - GET /v1/projects - Administrators see all projects, others their own
//! - GET /v1/projects/{id} - A single project (participants, administrators)

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use lingodesk_auth::AuthUser;
use lingodesk_common::{Error, Result, UserRole};
use serde::Serialize;
use uuid::Uuid;

use super::files::read_form;
use crate::api::middleware::ProjectsState;
use crate::domain::entities::Project;
use crate::domain::state::ProjectState;
use crate::storage::filename_of;

/// Project response DTO
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub translator_id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub language: String,
    pub state: ProjectState,
    pub original_filename: String,
    pub translated_filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Project> for ProjectResponse {
    fn from(p: Project) -> Self {
        Self {
            id: p.id,
            customer_id: p.customer_id,
            translator_id: p.translator_id,
            original_filename: filename_of(&p.original_file).to_string(),
            translated_filename: p
                .translated_file
                .as_deref()
                .map(|f| filename_of(f).to_string()),
            name: p.name,
            description: p.description,
            language: p.language,
            state: p.state,
            feedback: p.feedback,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// POST /v1/projects
pub async fn create_project(
    AuthUser(ctx): AuthUser,
    State(state): State<ProjectsState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ProjectResponse>)> {
    ctx.require_role(&[UserRole::Customer])?;

    let mut form = read_form(multipart).await?;
    let file = form
        .file
        .take()
        .ok_or_else(|| Error::Validation("Missing required 'file' field".to_string()))?;

    let project = state
        .service
        .create_project(
            ctx.user.id,
            form.text("name"),
            form.text("description"),
            form.text("language"),
            file,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(project.into())))
}

/// GET /v1/projects
pub async fn list_projects(
    AuthUser(ctx): AuthUser,
    State(state): State<ProjectsState>,
) -> Result<Json<Vec<ProjectResponse>>> {
    let projects = state.service.list_projects_for(&ctx.actor()).await?;
    Ok(Json(projects.into_iter().map(ProjectResponse::from).collect()))
}

/// GET /v1/projects/{id}
pub async fn get_project(
    AuthUser(ctx): AuthUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectResponse>> {
    let project = state.service.get_project_as(&ctx.actor(), id).await?;
    Ok(Json(project.into()))
}
