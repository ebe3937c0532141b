//! Projects domain state and auth backend integration

use axum::extract::FromRef;
use lingodesk_auth::AuthBackend;

use crate::service::ProjectLifecycleService;

/// Application state for the Projects domain
#[derive(Clone)]
pub struct ProjectsState {
    pub service: ProjectLifecycleService,
    pub auth: AuthBackend,
}

impl FromRef<ProjectsState> for AuthBackend {
    fn from_ref(state: &ProjectsState) -> Self {
        state.auth.clone()
    }
}
