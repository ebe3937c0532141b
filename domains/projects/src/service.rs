//! Project lifecycle service
//!
//! Every state change of a project goes through here. Each operation loads
//! the project, checks the entity's preconditions, writes with a
//! compare-and-swap on the loaded state and only then emits its notification.

use std::sync::Arc;

use lingodesk_common::{Actor, Error, Result, UserRole};
use lingodesk_users::UserDirectory;
use uuid::Uuid;

use crate::domain::assignment::AssignmentPolicy;
use crate::domain::authorization::{authorize_transition, ensure_can_view};
use crate::domain::entities::{Project, ProjectDetails};
use crate::domain::events::{ProjectNotification, ProjectSummary};
use crate::domain::state::{ProjectEvent, ProjectState};
use crate::notifications::NotificationDispatcher;
use crate::repository::{ProjectStore, UserColumn};
use crate::storage::{file_key, filename_of, FileKind, FileStore, StoredFile, UploadedFile};

#[derive(Clone)]
pub struct ProjectLifecycleService {
    store: Arc<dyn ProjectStore>,
    files: Arc<dyn FileStore>,
    directory: Arc<dyn UserDirectory>,
    assignment: Arc<dyn AssignmentPolicy>,
    notifier: Arc<dyn NotificationDispatcher>,
    max_file_size_bytes: usize,
}

impl ProjectLifecycleService {
    pub fn new(
        store: Arc<dyn ProjectStore>,
        files: Arc<dyn FileStore>,
        directory: Arc<dyn UserDirectory>,
        assignment: Arc<dyn AssignmentPolicy>,
        notifier: Arc<dyn NotificationDispatcher>,
        max_file_size_bytes: usize,
    ) -> Self {
        Self {
            store,
            files,
            directory,
            assignment,
            notifier,
            max_file_size_bytes,
        }
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_bytes
    }

    // -- Creation ---------------------------------------------------------

    /// Store the source file, persist the project and run translator assignment
    pub async fn create_project(
        &self,
        customer_id: Uuid,
        name: &str,
        description: &str,
        language: &str,
        source_file: UploadedFile,
    ) -> Result<Project> {
        let details = ProjectDetails::new(name, description, language)?;
        source_file.validate(self.max_file_size_bytes)?;

        let id = Uuid::new_v4();
        let key = file_key(id, FileKind::Original, &source_file.filename)?;
        let reference = self.files.put(&key, &source_file.bytes).await?;

        let project = self
            .store
            .create(&Project::new(id, customer_id, details, reference))
            .await?;
        tracing::info!(
            project_id = %project.id,
            customer_id = %customer_id,
            language = %project.language,
            size = source_file.size(),
            "Project created"
        );

        match self.assignment.select_translator(&project.language).await? {
            Some(translator) => {
                let mut assigned = project;
                assigned.assign_translator(translator.id)?;
                let saved = self
                    .store
                    .assign_translator(id, ProjectState::Created, translator.id)
                    .await?;
                tracing::info!(
                    project_id = %id,
                    translator_id = %translator.id,
                    "Translator assigned"
                );
                self.notify(ProjectNotification::TranslatorAssigned {
                    project: ProjectSummary::from(&saved),
                    translator_id: translator.id,
                })
                .await;
                Ok(saved)
            }
            None => {
                let mut closed = project;
                closed.close_without_translator()?;
                let saved = self
                    .store
                    .transition_state(id, ProjectState::Created, ProjectState::Closed)
                    .await?;
                tracing::info!(
                    project_id = %id,
                    language = %saved.language,
                    "No translator available; project closed"
                );
                self.notify(ProjectNotification::ClosedWithoutTranslator {
                    project: ProjectSummary::from(&saved),
                    customer_id: saved.customer_id,
                })
                .await;
                Ok(saved)
            }
        }
    }

    // -- Generic transition -----------------------------------------------

    /// Move a project to `target_state` through the guarded table
    pub async fn update_status(
        &self,
        project_id: Uuid,
        target_state: &str,
        actor: &Actor,
    ) -> Result<Project> {
        let target: ProjectState = target_state.parse()?;
        let project = self.load(project_id).await?;
        let expected = project.state;

        let mut next = project.clone();
        next.request_transition(target)?;
        authorize_transition(actor, &project, target)?;

        let saved = self
            .store
            .transition_state(project_id, expected, target)
            .await?;
        tracing::info!(
            project_id = %project_id,
            actor_id = %actor.id,
            from = %expected,
            to = %target,
            "Project status updated"
        );
        Ok(saved)
    }

    // -- Specialized operations -------------------------------------------

    pub async fn accept_translation(&self, project_id: Uuid) -> Result<Project> {
        let project = self.load(project_id).await?;
        self.accept(project).await
    }

    /// Accept on behalf of `actor`, who must own the project
    pub async fn accept_translation_as(&self, actor: &Actor, project_id: Uuid) -> Result<Project> {
        let project = self.load(project_id).await?;
        authorize_transition(actor, &project, ProjectState::Approved)?;
        self.accept(project).await
    }

    async fn accept(&self, mut project: Project) -> Result<Project> {
        let expected = project.state;
        project.accept()?;
        let saved = self
            .store
            .transition_state(project.id, expected, ProjectState::Approved)
            .await?;
        tracing::info!(project_id = %saved.id, "Translation accepted");

        if let Some(translator_id) = saved.translator_id {
            self.notify(ProjectNotification::TranslationAccepted {
                project: ProjectSummary::from(&saved),
                translator_id,
            })
            .await;
        }
        Ok(saved)
    }

    pub async fn reject_translation(&self, project_id: Uuid, feedback: &str) -> Result<Project> {
        let feedback = validate_feedback(feedback)?;
        let project = self.load(project_id).await?;
        self.reject(project, feedback).await
    }

    /// Reject on behalf of `actor`, who must own the project
    pub async fn reject_translation_as(
        &self,
        actor: &Actor,
        project_id: Uuid,
        feedback: &str,
    ) -> Result<Project> {
        let feedback = validate_feedback(feedback)?;
        let project = self.load(project_id).await?;
        authorize_transition(actor, &project, ProjectState::Rejected)?;
        self.reject(project, feedback).await
    }

    async fn reject(&self, mut project: Project, feedback: String) -> Result<Project> {
        let expected = project.state;
        project.reject(feedback.clone())?;
        let saved = self
            .store
            .reject_with_feedback(project.id, expected, &feedback)
            .await?;
        tracing::info!(project_id = %saved.id, "Translation rejected");

        if let Some(translator_id) = saved.translator_id {
            self.notify(ProjectNotification::TranslationRejected {
                project: ProjectSummary::from(&saved),
                translator_id,
                feedback,
            })
            .await;
        }
        Ok(saved)
    }

    pub async fn close_project(&self, project_id: Uuid) -> Result<Project> {
        let project = self.load(project_id).await?;
        self.close(project).await
    }

    /// Close on behalf of `actor`, who must be an administrator
    pub async fn close_project_as(&self, actor: &Actor, project_id: Uuid) -> Result<Project> {
        let project = self.load(project_id).await?;
        authorize_transition(actor, &project, ProjectState::Closed)?;
        self.close(project).await
    }

    async fn close(&self, mut project: Project) -> Result<Project> {
        let expected = project.state;
        project.close()?;
        let saved = self
            .store
            .transition_state(project.id, expected, ProjectState::Closed)
            .await?;
        tracing::info!(project_id = %saved.id, from = %expected, "Project closed");

        if let Some(translator_id) = saved.translator_id {
            self.notify(ProjectNotification::ProjectClosed {
                project: ProjectSummary::from(&saved),
                translator_id,
            })
            .await;
        }
        Ok(saved)
    }

    pub async fn save_translated_file(
        &self,
        project_id: Uuid,
        file: UploadedFile,
    ) -> Result<Project> {
        let project = self.load(project_id).await?;
        self.submit(project, file).await
    }

    /// Upload on behalf of `actor`, who must be the assigned translator
    pub async fn save_translated_file_as(
        &self,
        actor: &Actor,
        project_id: Uuid,
        file: UploadedFile,
    ) -> Result<Project> {
        let project = self.load(project_id).await?;
        authorize_transition(actor, &project, ProjectState::Completed)?;
        self.submit(project, file).await
    }

    async fn submit(&self, mut project: Project, file: UploadedFile) -> Result<Project> {
        project.ensure_can_apply(ProjectEvent::TranslationSubmitted)?;
        file.validate(self.max_file_size_bytes)?;

        let expected = project.state;
        let key = file_key(project.id, FileKind::Translated, &file.filename)?;
        let reference = self.files.put(&key, &file.bytes).await?;
        project.submit_translation(reference.clone())?;

        let saved = self
            .store
            .save_translated_file(project.id, expected, &reference)
            .await?;
        tracing::info!(
            project_id = %saved.id,
            size = file.size(),
            "Translated file saved"
        );

        self.notify(ProjectNotification::TranslationSubmitted {
            project: ProjectSummary::from(&saved),
            customer_id: saved.customer_id,
        })
        .await;
        Ok(saved)
    }

    /// Assign `translator_id` to a CREATED or REJECTED project
    pub async fn assign_translator_to_project(
        &self,
        project_id: Uuid,
        translator_id: Uuid,
    ) -> Result<Project> {
        let translator = self
            .directory
            .get_user_by_id(translator_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Translator {} not found", translator_id)))?;
        if translator.role != UserRole::Translator {
            return Err(Error::Validation(format!(
                "User {} is a {}, not a translator",
                translator_id, translator.role
            )));
        }

        let mut project = self.load(project_id).await?;
        let expected = project.state;
        project.assign_translator(translator_id)?;
        if !translator.translates(&project.language) {
            tracing::warn!(
                project_id = %project_id,
                translator_id = %translator_id,
                language = %project.language,
                "Assigning translator outside their languages"
            );
        }

        let saved = self
            .store
            .assign_translator(project_id, expected, translator_id)
            .await?;
        tracing::info!(
            project_id = %project_id,
            translator_id = %translator_id,
            "Translator assigned"
        );

        self.notify(ProjectNotification::TranslatorAssigned {
            project: ProjectSummary::from(&saved),
            translator_id,
        })
        .await;
        Ok(saved)
    }

    /// Assign on behalf of `actor`, who must be an administrator
    pub async fn assign_translator_as(
        &self,
        actor: &Actor,
        project_id: Uuid,
        translator_id: Uuid,
    ) -> Result<Project> {
        if !actor.is_admin() {
            return Err(Error::Forbidden(
                "Only administrators can assign translators".to_string(),
            ));
        }
        self.assign_translator_to_project(project_id, translator_id)
            .await
    }

    // -- Reads ------------------------------------------------------------

    /// Projects a customer owns or a translator works on, with feedback attached
    pub async fn get_projects_by_user(&self, user_id: Uuid, role: UserRole) -> Result<Vec<Project>> {
        let column = UserColumn::for_role(role)?;
        let projects = self.store.get_by_user(user_id, column).await?;
        Ok(self.check_feedbacks(projects).await)
    }

    pub async fn get_project(&self, project_id: Uuid) -> Result<Project> {
        let project = self.load(project_id).await?;
        Ok(self.with_feedback(project).await)
    }

    pub async fn get_all_projects(&self) -> Result<Vec<Project>> {
        let projects = self.store.get_all().await?;
        Ok(self.check_feedbacks(projects).await)
    }

    /// Attach the latest feedback to REJECTED projects; lookup failures leave it empty
    pub async fn check_feedbacks(&self, projects: Vec<Project>) -> Vec<Project> {
        let mut checked = Vec::with_capacity(projects.len());
        for project in projects {
            checked.push(self.with_feedback(project).await);
        }
        checked
    }

    async fn with_feedback(&self, mut project: Project) -> Project {
        if project.state != ProjectState::Rejected {
            return project;
        }
        project.feedback = match self.store.get_feedback(project.id).await {
            Ok(found) => found.map(|f| f.text),
            Err(e) => {
                tracing::warn!(
                    project_id = %project.id,
                    error = %e,
                    "Failed to load feedback"
                );
                None
            }
        };
        project
    }

    pub async fn get_original_file(&self, project_id: Uuid) -> Result<StoredFile> {
        let project = self.load(project_id).await?;
        self.read_file(&project.original_file).await
    }

    pub async fn get_translated_file(&self, project_id: Uuid) -> Result<StoredFile> {
        let project = self.load(project_id).await?;
        let reference = project.translated_file.ok_or_else(|| {
            Error::NotFound(format!("Project {} has no translation yet", project_id))
        })?;
        self.read_file(&reference).await
    }

    async fn read_file(&self, reference: &str) -> Result<StoredFile> {
        let bytes = self.files.get(reference).await?;
        Ok(StoredFile {
            filename: filename_of(reference).to_string(),
            bytes,
        })
    }

    // -- Reads on behalf of a caller --------------------------------------

    /// Administrators see everything; others see their own projects
    pub async fn list_projects_for(&self, actor: &Actor) -> Result<Vec<Project>> {
        if actor.is_admin() {
            self.get_all_projects().await
        } else {
            self.get_projects_by_user(actor.id, actor.role).await
        }
    }

    pub async fn get_project_as(&self, actor: &Actor, project_id: Uuid) -> Result<Project> {
        let project = self.load(project_id).await?;
        ensure_can_view(actor, &project)?;
        Ok(self.with_feedback(project).await)
    }

    pub async fn get_original_file_as(&self, actor: &Actor, project_id: Uuid) -> Result<StoredFile> {
        let project = self.load(project_id).await?;
        ensure_can_view(actor, &project)?;
        self.read_file(&project.original_file).await
    }

    pub async fn get_translated_file_as(
        &self,
        actor: &Actor,
        project_id: Uuid,
    ) -> Result<StoredFile> {
        let project = self.load(project_id).await?;
        ensure_can_view(actor, &project)?;
        let reference = project.translated_file.ok_or_else(|| {
            Error::NotFound(format!("Project {} has no translation yet", project_id))
        })?;
        self.read_file(&reference).await
    }

    // -- Helpers ----------------------------------------------------------

    async fn load(&self, project_id: Uuid) -> Result<Project> {
        self.store
            .get_by_id(project_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("Project {} not found", project_id)))
    }

    async fn notify(&self, notification: ProjectNotification) {
        if let Err(e) = self.notifier.dispatch(&notification).await {
            tracing::error!(
                project_id = %notification.project().id,
                notification = notification.name(),
                error = %e,
                "Failed to dispatch project notification"
            );
        }
    }
}

fn validate_feedback(feedback: &str) -> Result<String> {
    let feedback = feedback.trim();
    if feedback.is_empty() {
        return Err(Error::Validation(
            "Feedback is required when rejecting a translation".to_string(),
        ));
    }
    Ok(feedback.to_string())
}
