//! Transactional free functions for the Projects domain

use chrono::{DateTime, Utc};
use lingodesk_common::RepositoryError;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::domain::entities::Feedback;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct FeedbackRow {
    project_id: Uuid,
    text: String,
    created_at: DateTime<Utc>,
}

impl From<FeedbackRow> for Feedback {
    fn from(row: FeedbackRow) -> Self {
        Feedback {
            project_id: row.project_id,
            text: row.text,
            created_at: row.created_at,
        }
    }
}

/// Insert the first feedback for a project within an existing transaction.
pub async fn save_feedback_tx(
    transaction: &mut Transaction<'_, Postgres>,
    project_id: Uuid,
    text: &str,
) -> std::result::Result<Feedback, RepositoryError> {
    let row = sqlx::query_as::<_, FeedbackRow>(
        r#"
        INSERT INTO feedbacks (project_id, text, created_at)
        VALUES ($1, $2, NOW())
        RETURNING project_id, text, created_at
        "#,
    )
    .bind(project_id)
    .bind(text)
    .fetch_one(&mut **transaction)
    .await
    .map_err(RepositoryError::from_sqlx)?;
    Ok(row.into())
}

/// Replace the feedback text for a project within an existing transaction.
///
/// Returns `RepositoryError::NotFound` if the project has no feedback yet.
pub async fn update_feedback_tx(
    transaction: &mut Transaction<'_, Postgres>,
    project_id: Uuid,
    text: &str,
) -> std::result::Result<Feedback, RepositoryError> {
    let row = sqlx::query_as::<_, FeedbackRow>(
        r#"
        UPDATE feedbacks
        SET text = $2, created_at = NOW()
        WHERE project_id = $1
        RETURNING project_id, text, created_at
        "#,
    )
    .bind(project_id)
    .bind(text)
    .fetch_optional(&mut **transaction)
    .await?;
    row.map(Feedback::from).ok_or(RepositoryError::NotFound)
}

/// Update the feedback if one exists, otherwise insert it.
pub async fn upsert_feedback_tx(
    transaction: &mut Transaction<'_, Postgres>,
    project_id: Uuid,
    text: &str,
) -> std::result::Result<Feedback, RepositoryError> {
    match update_feedback_tx(transaction, project_id, text).await {
        Err(RepositoryError::NotFound) => save_feedback_tx(transaction, project_id, text).await,
        other => other,
    }
}
