//! Project repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lingodesk_common::{Error, RepositoryError, Result};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::transactions::{upsert_feedback_tx, FeedbackRow};
use super::{stale_write, ProjectStore, UserColumn};
use crate::domain::entities::{Feedback, Project};
use crate::domain::state::ProjectState;

const PROJECT_COLUMNS: &str = r#"
    id, customer_id, translator_id, name, description, language,
    original_file, translated_file, state, created_at, updated_at
"#;

#[derive(Debug, sqlx::FromRow)]
struct ProjectRow {
    id: Uuid,
    customer_id: Uuid,
    translator_id: Option<Uuid>,
    name: String,
    description: String,
    language: String,
    original_file: String,
    translated_file: Option<String>,
    state: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = Error;

    fn try_from(row: ProjectRow) -> Result<Self> {
        let state = ProjectState::from_stored(&row.state)?;
        let project = Project {
            id: row.id,
            customer_id: row.customer_id,
            translator_id: row.translator_id,
            name: row.name,
            description: row.description,
            language: row.language,
            original_file: row.original_file,
            translated_file: row.translated_file,
            state,
            feedback: None,
            created_at: row.created_at,
            updated_at: row.updated_at,
        };
        project.validate()?;
        Ok(project)
    }
}

#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Turn a conditional write that matched nothing into `NotFound` or `Conflict`
    async fn cas_miss(&self, id: Uuid, expected: ProjectState) -> Error {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await;

        match exists {
            Ok(true) => stale_write(id, expected),
            Ok(false) => Error::NotFound(format!("Project {} not found", id)),
            Err(e) => e.into(),
        }
    }

    async fn finish_cas(
        &self,
        row: Option<ProjectRow>,
        id: Uuid,
        expected: ProjectState,
    ) -> Result<Project> {
        match row {
            Some(row) => Project::try_from(row),
            None => Err(self.cas_miss(id, expected).await),
        }
    }
}

async fn reject_tx(
    transaction: &mut Transaction<'_, Postgres>,
    id: Uuid,
    expected: ProjectState,
    feedback: &str,
) -> std::result::Result<Option<ProjectRow>, RepositoryError> {
    let row = sqlx::query_as::<_, ProjectRow>(&format!(
        r#"
        UPDATE projects SET state = $3, updated_at = NOW()
        WHERE id = $1 AND state = $2
        RETURNING {PROJECT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(expected.as_str())
    .bind(ProjectState::Rejected.as_str())
    .fetch_optional(&mut **transaction)
    .await?;

    if row.is_some() {
        upsert_feedback_tx(transaction, id, feedback).await?;
    }
    Ok(row)
}

#[async_trait]
impl ProjectStore for ProjectRepository {
    async fn create(&self, project: &Project) -> Result<Project> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            INSERT INTO projects (
                id, customer_id, translator_id, name, description, language,
                original_file, translated_file, state, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(project.id)
        .bind(project.customer_id)
        .bind(project.translator_id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(&project.language)
        .bind(&project.original_file)
        .bind(&project.translated_file)
        .bind(project.state.as_str())
        .bind(project.created_at)
        .bind(project.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| Error::from(RepositoryError::from_sqlx(e)))?;

        Project::try_from(row)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Project::try_from).transpose()
    }

    async fn get_all(&self) -> Result<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at DESC, id"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Project::try_from).collect()
    }

    async fn get_by_user(&self, user_id: Uuid, column: UserColumn) -> Result<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE {} = $1 ORDER BY created_at DESC, id",
            column.column()
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Project::try_from).collect()
    }

    async fn transition_state(
        &self,
        id: Uuid,
        expected: ProjectState,
        next: ProjectState,
    ) -> Result<Project> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            UPDATE projects
            SET state = $3,
                translated_file = CASE WHEN $3 = 'ASSIGNED' THEN NULL ELSE translated_file END,
                updated_at = NOW()
            WHERE id = $1 AND state = $2
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(expected.as_str())
        .bind(next.as_str())
        .fetch_optional(&self.pool)
        .await?;

        self.finish_cas(row, id, expected).await
    }

    async fn assign_translator(
        &self,
        id: Uuid,
        expected: ProjectState,
        translator_id: Uuid,
    ) -> Result<Project> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            UPDATE projects
            SET state = $3, translator_id = $4, translated_file = NULL, updated_at = NOW()
            WHERE id = $1 AND state = $2
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(expected.as_str())
        .bind(ProjectState::Assigned.as_str())
        .bind(translator_id)
        .fetch_optional(&self.pool)
        .await?;

        self.finish_cas(row, id, expected).await
    }

    async fn save_translated_file(
        &self,
        id: Uuid,
        expected: ProjectState,
        file_ref: &str,
    ) -> Result<Project> {
        let row = sqlx::query_as::<_, ProjectRow>(&format!(
            r#"
            UPDATE projects SET state = $3, translated_file = $4, updated_at = NOW()
            WHERE id = $1 AND state = $2
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(expected.as_str())
        .bind(ProjectState::Completed.as_str())
        .bind(file_ref)
        .fetch_optional(&self.pool)
        .await?;

        self.finish_cas(row, id, expected).await
    }

    async fn reject_with_feedback(
        &self,
        id: Uuid,
        expected: ProjectState,
        feedback: &str,
    ) -> Result<Project> {
        let mut tx = self.pool.begin().await?;
        let row = reject_tx(&mut tx, id, expected, feedback).await?;
        tx.commit().await?;

        let mut project = self.finish_cas(row, id, expected).await?;
        project.feedback = Some(feedback.to_string());
        Ok(project)
    }

    async fn get_feedback(&self, project_id: Uuid) -> Result<Option<Feedback>> {
        let row = sqlx::query_as::<_, FeedbackRow>(
            "SELECT project_id, text, created_at FROM feedbacks WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Feedback::from))
    }
}
