//! User directory port
//!
//! The projects domain consults the directory to find translators and to
//! resolve notification recipients; registration writes through it.

use async_trait::async_trait;
use lingodesk_common::Result;
use uuid::Uuid;

use super::entities::User;

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn get_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Users with exactly this display name, oldest account first
    async fn find_users_by_name(&self, name: &str) -> Result<Vec<User>>;

    /// Every user, oldest account first
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Translators working in `language`, oldest account first (ties by id)
    async fn get_translators_by_language(&self, language: &str) -> Result<Vec<User>>;

    /// Persist a new user with its languages; duplicate emails are a `Conflict`
    async fn create_user(&self, user: &User) -> Result<User>;
}
