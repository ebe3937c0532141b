//! Project notifications emitted after a lifecycle write succeeds

use serde::Serialize;
use uuid::Uuid;

use super::entities::Project;

/// The slice of a project a notification needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub name: String,
    pub language: String,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            name: project.name.clone(),
            language: project.language.clone(),
        }
    }
}

/// Domain events consumed by a `NotificationDispatcher`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProjectNotification {
    TranslatorAssigned {
        project: ProjectSummary,
        translator_id: Uuid,
    },
    ClosedWithoutTranslator {
        project: ProjectSummary,
        customer_id: Uuid,
    },
    TranslationSubmitted {
        project: ProjectSummary,
        customer_id: Uuid,
    },
    TranslationAccepted {
        project: ProjectSummary,
        translator_id: Uuid,
    },
    TranslationRejected {
        project: ProjectSummary,
        translator_id: Uuid,
        feedback: String,
    },
    ProjectClosed {
        project: ProjectSummary,
        translator_id: Uuid,
    },
}

impl ProjectNotification {
    /// User the notification is addressed to
    pub fn recipient(&self) -> Uuid {
        match self {
            Self::TranslatorAssigned { translator_id, .. }
            | Self::TranslationAccepted { translator_id, .. }
            | Self::TranslationRejected { translator_id, .. }
            | Self::ProjectClosed { translator_id, .. } => *translator_id,
            Self::ClosedWithoutTranslator { customer_id, .. }
            | Self::TranslationSubmitted { customer_id, .. } => *customer_id,
        }
    }

    pub fn project(&self) -> &ProjectSummary {
        match self {
            Self::TranslatorAssigned { project, .. }
            | Self::ClosedWithoutTranslator { project, .. }
            | Self::TranslationSubmitted { project, .. }
            | Self::TranslationAccepted { project, .. }
            | Self::TranslationRejected { project, .. }
            | Self::ProjectClosed { project, .. } => project,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::TranslatorAssigned { .. } => "translator_assigned",
            Self::ClosedWithoutTranslator { .. } => "closed_without_translator",
            Self::TranslationSubmitted { .. } => "translation_submitted",
            Self::TranslationAccepted { .. } => "translation_accepted",
            Self::TranslationRejected { .. } => "translation_rejected",
            Self::ProjectClosed { .. } => "project_closed",
        }
    }
}
