//! File transfer API handlers
//!
//! - POST /v1/projects/{id}/upload - Upload the translated file (assigned translator)
//! - GET /v1/projects/{id}/download/original - Source document
//! - GET /v1/projects/{id}/download/translation - Translated document

use std::collections::HashMap;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use lingodesk_auth::AuthUser;
use lingodesk_common::{Error, Result, UserRole};
use uuid::Uuid;

use super::projects::ProjectResponse;
use crate::api::middleware::ProjectsState;
use crate::storage::{StoredFile, UploadedFile};

/// Text fields and the `file` part of a multipart form
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl UploadForm {
    /// Text of a field, empty when absent
    pub fn text(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or_default()
    }
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> Error {
    Error::Validation(format!("Invalid multipart body: {}", err))
}

/// Read every part of a multipart form; the part named `file` becomes the upload
pub async fn read_form(mut multipart: Multipart) -> Result<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(multipart_error)?;
            form.file = Some(UploadedFile::new(filename, bytes.to_vec()));
        } else if !name.is_empty() {
            let text = field.text().await.map_err(multipart_error)?;
            form.fields.insert(name, text);
        }
    }

    Ok(form)
}

fn attachment(file: StoredFile) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file.filename),
            ),
        ],
        file.bytes,
    )
        .into_response()
}

/// POST /v1/projects/{id}/upload
pub async fn upload_translation(
    AuthUser(ctx): AuthUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ProjectResponse>> {
    ctx.require_role(&[UserRole::Translator])?;

    let file = read_form(multipart)
        .await?
        .file
        .ok_or_else(|| Error::Validation("Missing required 'file' field".to_string()))?;

    let project = state
        .service
        .save_translated_file_as(&ctx.actor(), id, file)
        .await?;
    Ok(Json(project.into()))
}

/// GET /v1/projects/{id}/download/original
pub async fn download_original(
    AuthUser(ctx): AuthUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let file = state.service.get_original_file_as(&ctx.actor(), id).await?;
    Ok(attachment(file))
}

/// GET /v1/projects/{id}/download/translation
pub async fn download_translation(
    AuthUser(ctx): AuthUser,
    State(state): State<ProjectsState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let file = state
        .service
        .get_translated_file_as(&ctx.actor(), id)
        .await?;
    Ok(attachment(file))
}
