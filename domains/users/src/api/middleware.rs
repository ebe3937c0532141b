//! Users domain state and auth backend integration

use axum::extract::FromRef;
use lingodesk_auth::AuthBackend;

use crate::service::UserService;

/// Application state for the Users domain
#[derive(Clone)]
pub struct UsersState {
    pub users: UserService,
    pub auth: AuthBackend,
}

impl FromRef<UsersState> for AuthBackend {
    fn from_ref(state: &UsersState) -> Self {
        state.auth.clone()
    }
}
