//! In-memory project store for tests and local wiring

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use lingodesk_common::{Error, Result};
use uuid::Uuid;

use super::{stale_write, ProjectStore, UserColumn};
use crate::domain::entities::{Feedback, Project};
use crate::domain::state::ProjectState;

#[derive(Debug, Default)]
struct Tables {
    projects: Vec<Project>,
    feedbacks: HashMap<Uuid, Feedback>,
    /// Every successful state write, in order
    history: Vec<(Uuid, ProjectState)>,
}

/// Project store held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectStore {
    tables: Arc<Mutex<Tables>>,
    fail_feedback_reads: Arc<AtomicBool>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// States written for `id`, starting with the state it was created in
    pub fn state_history(&self, id: Uuid) -> Vec<ProjectState> {
        self.lock()
            .history
            .iter()
            .filter(|(pid, _)| *pid == id)
            .map(|(_, state)| *state)
            .collect()
    }

    /// Overwrite a stored state, simulating a concurrent writer
    pub fn force_state(&self, id: Uuid, state: ProjectState) {
        if let Some(project) = self.lock().projects.iter_mut().find(|p| p.id == id) {
            project.state = state;
        }
    }

    /// Drop the feedback row for a project
    pub fn remove_feedback(&self, id: Uuid) {
        self.lock().feedbacks.remove(&id);
    }

    /// Make every feedback lookup fail with a storage error
    pub fn fail_feedback_reads(&self) {
        self.fail_feedback_reads.store(true, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.lock().projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().projects.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply `write` when `id` is still in `expected`, refusing rows that break invariants
    fn compare_and_swap<F>(
        &self,
        id: Uuid,
        expected: ProjectState,
        feedback: Option<Feedback>,
        write: F,
    ) -> Result<Project>
    where
        F: FnOnce(&mut Project),
    {
        let mut guard = self.lock();
        let tables = &mut *guard;
        let project = tables
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::NotFound(format!("Project {} not found", id)))?;
        if project.state != expected {
            return Err(stale_write(id, expected));
        }

        let mut candidate = project.clone();
        write(&mut candidate);
        candidate.updated_at = Utc::now();
        candidate.validate()?;

        *project = candidate.clone();
        if let Some(feedback) = feedback {
            tables.feedbacks.insert(id, feedback);
        }
        tables.history.push((id, candidate.state));
        Ok(candidate)
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn create(&self, project: &Project) -> Result<Project> {
        let mut tables = self.lock();
        if tables.projects.iter().any(|p| p.id == project.id) {
            return Err(Error::Conflict(format!(
                "Project {} already exists",
                project.id
            )));
        }
        let mut stored = project.clone();
        stored.feedback = None;
        stored.validate()?;
        tables.projects.push(stored.clone());
        tables.history.push((stored.id, stored.state));
        Ok(stored)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Project>> {
        Ok(self.lock().projects.iter().find(|p| p.id == id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Project>> {
        Ok(self.lock().projects.clone())
    }

    async fn get_by_user(&self, user_id: Uuid, column: UserColumn) -> Result<Vec<Project>> {
        Ok(self
            .lock()
            .projects
            .iter()
            .filter(|p| match column {
                UserColumn::Customer => p.customer_id == user_id,
                UserColumn::Translator => p.translator_id == Some(user_id),
            })
            .cloned()
            .collect())
    }

    async fn transition_state(
        &self,
        id: Uuid,
        expected: ProjectState,
        next: ProjectState,
    ) -> Result<Project> {
        self.compare_and_swap(id, expected, None, |p| {
            if next == ProjectState::Assigned {
                p.translated_file = None;
            }
            p.state = next;
        })
    }

    async fn assign_translator(
        &self,
        id: Uuid,
        expected: ProjectState,
        translator_id: Uuid,
    ) -> Result<Project> {
        self.compare_and_swap(id, expected, None, |p| {
            p.state = ProjectState::Assigned;
            p.translator_id = Some(translator_id);
            p.translated_file = None;
        })
    }

    async fn save_translated_file(
        &self,
        id: Uuid,
        expected: ProjectState,
        file_ref: &str,
    ) -> Result<Project> {
        self.compare_and_swap(id, expected, None, |p| {
            p.state = ProjectState::Completed;
            p.translated_file = Some(file_ref.to_string());
        })
    }

    async fn reject_with_feedback(
        &self,
        id: Uuid,
        expected: ProjectState,
        feedback: &str,
    ) -> Result<Project> {
        let row = Feedback {
            project_id: id,
            text: feedback.to_string(),
            created_at: Utc::now(),
        };
        let mut project =
            self.compare_and_swap(id, expected, Some(row), |p| p.state = ProjectState::Rejected)?;
        project.feedback = Some(feedback.to_string());
        Ok(project)
    }

    async fn get_feedback(&self, project_id: Uuid) -> Result<Option<Feedback>> {
        if self.fail_feedback_reads.load(Ordering::SeqCst) {
            return Err(Error::Internal("feedback store unavailable".to_string()));
        }
        Ok(self.lock().feedbacks.get(&project_id).cloned())
    }
}
