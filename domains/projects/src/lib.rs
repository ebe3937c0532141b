//! Projects domain: translation projects, their lifecycle, files and
//! notifications

pub mod api;
pub mod domain;
pub mod notifications;
pub mod repository;
pub mod service;
pub mod storage;

pub use domain::assignment::{AssignmentPolicy, FirstAvailable};
pub use domain::entities::{Feedback, Project, ProjectDetails};
pub use domain::events::{ProjectNotification, ProjectSummary};
pub use domain::state::{ProjectEvent, ProjectState, ProjectStateMachine};
pub use notifications::{EmailNotificationDispatcher, NotificationDispatcher, RecordingDispatcher};
pub use repository::{
    InMemoryProjectStore, ProjectRepository, ProjectStore, ProjectsRepositories, UserColumn,
};
pub use service::ProjectLifecycleService;
pub use storage::{FileStore, InMemoryFileStore, LocalFileStore, StoredFile, UploadedFile};

pub use api::routes;
pub use api::ProjectsState;
