//! Domain entities for the Projects domain
//!
//! The `Project` entity owns the pure transition rules; persistence,
//! storage and notification happen in the lifecycle service.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use lingodesk_common::{Error, Result, StateError};

use crate::domain::state::{ProjectEvent, ProjectState, ProjectStateMachine};

/// Maximum project name length
pub const MAX_NAME_LEN: usize = 200;

/// Maximum description length
pub const MAX_DESCRIPTION_LEN: usize = 5000;

/// Validated display metadata and target language of a new project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDetails {
    pub name: String,
    pub description: String,
    pub language: String,
}

impl ProjectDetails {
    pub fn new(name: &str, description: &str, language: &str) -> Result<Self> {
        let name = required("name", name)?;
        if name.chars().count() > MAX_NAME_LEN {
            return Err(Error::Validation(format!(
                "Project name must be at most {} characters",
                MAX_NAME_LEN
            )));
        }
        let description = required("description", description)?;
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(Error::Validation(format!(
                "Project description must be at most {} characters",
                MAX_DESCRIPTION_LEN
            )));
        }
        let language = required("language", language)?.to_lowercase();

        Ok(Self {
            name,
            description,
            language,
        })
    }
}

fn required(field: &str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

/// Rejection feedback for a project; at most one live row per project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub project_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Project entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub translator_id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub language: String,
    pub original_file: String,
    pub translated_file: Option<String>,
    pub state: ProjectState,
    /// Attached for REJECTED projects when listed; never persisted on the row
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a project in CREATED holding an already stored source file
    pub fn new(id: Uuid, customer_id: Uuid, details: ProjectDetails, original_file: String) -> Self {
        let now = Utc::now();
        Project {
            id,
            customer_id,
            translator_id: None,
            name: details.name,
            description: details.description,
            language: details.language,
            original_file,
            translated_file: None,
            state: ProjectState::Created,
            feedback: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate invariants that must hold for any stored project
    pub fn validate(&self) -> Result<()> {
        let needs_translator = !matches!(self.state, ProjectState::Created | ProjectState::Closed);
        if needs_translator && self.translator_id.is_none() {
            return Err(Error::CorruptRecord(format!(
                "project {} is {} without a translator",
                self.id, self.state
            )));
        }
        if self.translated_file.is_some()
            && matches!(self.state, ProjectState::Created | ProjectState::Assigned)
        {
            return Err(Error::CorruptRecord(format!(
                "project {} has a translation before completion",
                self.id
            )));
        }
        Ok(())
    }

    /// Assign a translator (creation-time auto-assignment or reassignment)
    pub fn assign_translator(&mut self, translator_id: Uuid) -> Result<()> {
        self.apply(ProjectEvent::TranslatorAssigned)?;
        self.translator_id = Some(translator_id);
        Ok(())
    }

    /// Close at creation because nobody translates the language
    pub fn close_without_translator(&mut self) -> Result<()> {
        self.apply(ProjectEvent::NoTranslatorAvailable)
    }

    /// Record the translator's submitted file
    pub fn submit_translation(&mut self, translated_file: String) -> Result<()> {
        self.apply(ProjectEvent::TranslationSubmitted)?;
        self.translated_file = Some(translated_file);
        self.feedback = None;
        Ok(())
    }

    pub fn accept(&mut self) -> Result<()> {
        self.apply(ProjectEvent::Accept)
    }

    pub fn reject(&mut self, feedback: String) -> Result<()> {
        self.apply(ProjectEvent::Reject)?;
        self.feedback = Some(feedback);
        Ok(())
    }

    pub fn close(&mut self) -> Result<()> {
        self.apply(ProjectEvent::Close)
    }

    /// Move to `target` through the guarded transition table
    pub fn request_transition(&mut self, target: ProjectState) -> Result<()> {
        ProjectStateMachine::check_target(self.state, target).map_err(|e| self.map_error(e))?;
        self.set_state(target);
        Ok(())
    }

    /// Check if an event applies without applying it
    #[mutants::skip] // Delegates to ProjectStateMachine::can_transition()
    pub fn can_apply(&self, event: ProjectEvent) -> bool {
        ProjectStateMachine::can_transition(self.state, event)
    }

    /// Fail with the event's error kind unless it applies to the current state
    pub fn ensure_can_apply(&self, event: ProjectEvent) -> Result<()> {
        ProjectStateMachine::transition(self.state, event)
            .map(|_| ())
            .map_err(|e| self.map_error(e))
    }

    fn apply(&mut self, event: ProjectEvent) -> Result<()> {
        let next =
            ProjectStateMachine::transition(self.state, event).map_err(|e| self.map_error(e))?;
        self.set_state(next);
        Ok(())
    }

    fn set_state(&mut self, next: ProjectState) {
        // A rejected translation does not survive reassignment
        if next == ProjectState::Assigned {
            self.translated_file = None;
        }
        self.state = next;
        self.updated_at = Utc::now();
    }

    fn map_error(&self, err: StateError) -> Error {
        match err {
            StateError::InvalidTransition { from, to, .. } => Error::InvalidTransition { from, to },
            StateError::InvalidState { state, event } => Error::InvalidState(format!(
                "project {} is {}; '{}' is not allowed",
                self.id, state, event
            )),
            StateError::TerminalState(_) => Error::AlreadyClosed(self.id.to_string()),
        }
    }
}
