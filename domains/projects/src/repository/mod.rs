//! Repository implementations for the Projects domain
//!
//! Every state write is conditional on the state the caller loaded, so two
//! requests racing on one project cannot both succeed.

pub mod mock;
pub mod projects;
pub mod transactions;

use async_trait::async_trait;
use lingodesk_common::{Error, Result, UserRole};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{Feedback, Project};
use crate::domain::state::ProjectState;

pub use mock::InMemoryProjectStore;
pub use projects::ProjectRepository;

/// Project column a user is matched against when listing their projects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserColumn {
    Customer,
    Translator,
}

impl UserColumn {
    /// Administrators own no projects and are rejected
    pub fn for_role(role: UserRole) -> Result<Self> {
        match role {
            UserRole::Customer => Ok(UserColumn::Customer),
            UserRole::Translator => Ok(UserColumn::Translator),
            UserRole::Administrator => Err(Error::Validation(
                "Administrators have no projects of their own".to_string(),
            )),
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            UserColumn::Customer => "customer_id",
            UserColumn::Translator => "translator_id",
        }
    }
}

/// Persistence port for projects and their feedback
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn create(&self, project: &Project) -> Result<Project>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Project>>;

    async fn get_all(&self) -> Result<Vec<Project>>;

    async fn get_by_user(&self, user_id: Uuid, column: UserColumn) -> Result<Vec<Project>>;

    /// Move `id` from `expected` to `next`
    async fn transition_state(
        &self,
        id: Uuid,
        expected: ProjectState,
        next: ProjectState,
    ) -> Result<Project>;

    /// Set the translator and move `id` from `expected` to ASSIGNED
    async fn assign_translator(
        &self,
        id: Uuid,
        expected: ProjectState,
        translator_id: Uuid,
    ) -> Result<Project>;

    /// Record the translation reference and move `id` from `expected` to COMPLETED
    async fn save_translated_file(
        &self,
        id: Uuid,
        expected: ProjectState,
        file_ref: &str,
    ) -> Result<Project>;

    /// Move `id` from `expected` to REJECTED and upsert its feedback, atomically
    async fn reject_with_feedback(
        &self,
        id: Uuid,
        expected: ProjectState,
        feedback: &str,
    ) -> Result<Project>;

    async fn get_feedback(&self, project_id: Uuid) -> Result<Option<Feedback>>;
}

/// Error for a conditional write that matched no row
pub(crate) fn stale_write(id: Uuid, expected: ProjectState) -> Error {
    Error::Conflict(format!(
        "project {} is no longer {}; reload and retry",
        id, expected
    ))
}

/// Combined repository access for the Projects domain
#[derive(Clone)]
pub struct ProjectsRepositories {
    pub projects: ProjectRepository,
}

impl ProjectsRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            projects: ProjectRepository::new(pool),
        }
    }
}
