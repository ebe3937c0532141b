//! User registration, login and lookup

use std::sync::Arc;

use lingodesk_auth::{hash_password, validate_password_strength, verify_password};
use lingodesk_common::{Error, Result, UserRole};
use uuid::Uuid;

use crate::domain::directory::UserDirectory;
use crate::domain::entities::{normalize_email, validate_name, User};

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct UserService {
    directory: Arc<dyn UserDirectory>,
}

impl UserService {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    pub async fn register_customer(&self, name: &str, email: &str, password: &str) -> Result<User> {
        let user = User::new_customer(name, email)?;
        self.register(user, password).await
    }

    pub async fn register_translator(
        &self,
        name: &str,
        email: &str,
        password: &str,
        languages: &[String],
    ) -> Result<User> {
        let user = User::new_translator(name, email, languages)?;
        self.register(user, password).await
    }

    /// Self-service registration; administrators come from [`Self::ensure_administrator`]
    pub async fn register_with_role(
        &self,
        role: UserRole,
        name: &str,
        email: &str,
        password: &str,
        languages: &[String],
    ) -> Result<User> {
        match role {
            UserRole::Customer => self.register_customer(name, email, password).await,
            UserRole::Translator => {
                self.register_translator(name, email, password, languages)
                    .await
            }
            UserRole::Administrator => Err(Error::Forbidden(
                "Administrators cannot self-register".to_string(),
            )),
        }
    }

    /// Provision the administrator account named in deployment config
    ///
    /// Idempotent: an existing administrator with this email is returned as-is.
    /// The email belonging to a non-administrator is a `Conflict`.
    pub async fn ensure_administrator(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User> {
        let user = User::new_administrator(name, email)?;
        if let Some(existing) = self.directory.find_user_by_email(&user.email).await? {
            if existing.role != UserRole::Administrator {
                return Err(Error::Conflict(format!(
                    "{} is registered as {}, not as an administrator",
                    existing.email, existing.role
                )));
            }
            tracing::debug!(user_id = %existing.id, "Administrator already provisioned");
            return Ok(existing);
        }

        let created = self.register(user, password).await?;
        tracing::info!(user_id = %created.id, "Administrator provisioned");
        Ok(created)
    }

    async fn register(&self, user: User, password: &str) -> Result<User> {
        validate_password_strength(password)?;
        if self
            .directory
            .find_user_by_email(&user.email)
            .await?
            .is_some()
        {
            return Err(Error::Conflict(format!(
                "A user with email {} already exists",
                user.email
            )));
        }

        let user = user.with_password_hash(hash_password(password)?);
        let created = self.directory.create_user(&user).await?;
        tracing::info!(user_id = %created.id, role = %created.role, "User registered");
        Ok(created)
    }

    /// Check credentials; every failure looks the same to the caller
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User> {
        let invalid = || Error::Authentication(INVALID_CREDENTIALS.to_string());

        let email = normalize_email(email).map_err(|_| invalid())?;
        let user = self
            .directory
            .find_user_by_email(&email)
            .await?
            .ok_or_else(invalid)?;
        let Some(hash) = user.password_hash.as_deref() else {
            tracing::warn!(user_id = %user.id, "Login attempt on account without a password");
            return Err(invalid());
        };

        if !verify_password(password, hash)? {
            tracing::info!(user_id = %user.id, "Login rejected");
            return Err(invalid());
        }
        Ok(user)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User> {
        self.directory
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("User {} not found", id)))
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = normalize_email(email)?;
        self.directory.find_user_by_email(&email).await
    }

    /// Oldest user with exactly this name
    pub async fn get_user_by_name(&self, name: &str) -> Result<User> {
        let name = validate_name(name)?;
        self.directory
            .find_users_by_name(&name)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("User '{}' not found", name)))
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.directory.list_users().await
    }

    pub async fn translators_for(&self, language: &str) -> Result<Vec<User>> {
        let language = language.trim().to_lowercase();
        if language.is_empty() {
            return Err(Error::Validation("language is required".to_string()));
        }
        self.directory.get_translators_by_language(&language).await
    }
}
