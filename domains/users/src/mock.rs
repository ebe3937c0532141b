//! In-memory user directory for tests and local wiring

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use lingodesk_common::{Error, Result};
use uuid::Uuid;

use crate::domain::directory::UserDirectory;
use crate::domain::entities::User;

/// User directory held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<Mutex<Vec<User>>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the directory with existing users
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users.into_iter().collect())),
        }
    }

    /// Add a user without the duplicate-email check
    pub fn insert(&self, user: User) {
        self.lock().push(user);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<User>> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.lock().iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.lock().iter().find(|u| u.email == email).cloned())
    }

    async fn find_users_by_name(&self, name: &str) -> Result<Vec<User>> {
        let mut users: Vec<User> = self
            .lock()
            .iter()
            .filter(|u| u.name == name)
            .cloned()
            .collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let mut users = self.lock().clone();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(users)
    }

    async fn get_translators_by_language(&self, language: &str) -> Result<Vec<User>> {
        let mut translators: Vec<User> = self
            .lock()
            .iter()
            .filter(|u| u.translates(language))
            .cloned()
            .collect();
        translators.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(translators)
    }

    async fn create_user(&self, user: &User) -> Result<User> {
        let mut users = self.lock();
        if users.iter().any(|u| u.email == user.email) {
            return Err(Error::Conflict(format!(
                "A user with email {} already exists",
                user.email
            )));
        }
        users.push(user.clone());
        Ok(user.clone())
    }
}
