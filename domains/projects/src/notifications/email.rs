//! Email delivery of project notifications

use std::sync::Arc;

use async_trait::async_trait;
use lingodesk_common::{Error, Result};
use lingodesk_email::{EmailService, ProjectEmailKind};
use lingodesk_users::UserDirectory;

use super::NotificationDispatcher;
use crate::domain::events::ProjectNotification;

/// Resolves the recipient in the user directory and sends a templated email
pub struct EmailNotificationDispatcher {
    directory: Arc<dyn UserDirectory>,
    email: Arc<dyn EmailService>,
}

impl EmailNotificationDispatcher {
    pub fn new(directory: Arc<dyn UserDirectory>, email: Arc<dyn EmailService>) -> Self {
        Self { directory, email }
    }
}

fn email_kind(notification: &ProjectNotification) -> ProjectEmailKind {
    match notification {
        ProjectNotification::TranslatorAssigned { .. } => ProjectEmailKind::TranslatorAssigned,
        ProjectNotification::ClosedWithoutTranslator { .. } => {
            ProjectEmailKind::ClosedWithoutTranslator
        }
        ProjectNotification::TranslationSubmitted { .. } => ProjectEmailKind::TranslationAvailable,
        ProjectNotification::TranslationAccepted { .. } => ProjectEmailKind::TranslationAccepted,
        ProjectNotification::TranslationRejected { feedback, .. } => {
            ProjectEmailKind::TranslationRejected {
                feedback: feedback.clone(),
            }
        }
        ProjectNotification::ProjectClosed { .. } => ProjectEmailKind::ProjectClosed,
    }
}

#[async_trait]
impl NotificationDispatcher for EmailNotificationDispatcher {
    async fn dispatch(&self, notification: &ProjectNotification) -> Result<()> {
        let recipient_id = notification.recipient();
        let recipient = self
            .directory
            .get_user_by_id(recipient_id)
            .await?
            .ok_or_else(|| {
                Error::NotFound(format!("Notification recipient {} not found", recipient_id))
            })?;
        let project = notification.project();

        let receipt = self
            .email
            .send_project_email(
                &recipient.email,
                &recipient.name,
                project.id,
                &project.name,
                &project.language,
                &email_kind(notification),
            )
            .await
            .map_err(|e| Error::Internal(format!("Email delivery failed: {}", e)))?;

        tracing::info!(
            project_id = %project.id,
            recipient_id = %recipient_id,
            notification = notification.name(),
            message_id = %receipt.message_id,
            "Project notification sent"
        );
        Ok(())
    }
}
