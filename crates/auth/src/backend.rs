//! Concrete authentication backend
//!
//! Wraps `PgPool` + `AuthConfig` and owns the identity lookup. Uses runtime
//! `sqlx::query_as` (not macros) over the `users` table owned by the users
//! domain.

use sqlx::PgPool;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::context::AuthContext;
use crate::error::AuthError;
use crate::types::{AuthIdentity, AuthIdentityRow};

/// Concrete authentication backend.
///
/// Domain states expose this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthBackend {
    pool: PgPool,
    config: AuthConfig,
}

impl AuthBackend {
    pub fn new(pool: PgPool, config: AuthConfig) -> Self {
        Self { pool, config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Find user identity by ID
    pub(crate) async fn find_user(&self, id: Uuid) -> Result<Option<AuthIdentity>, AuthError> {
        let row: Option<AuthIdentityRow> = sqlx::query_as(
            r#"
            SELECT id, email, name, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %id, "Failed to load user");
            AuthError::UserLoadError
        })?;

        row.map(AuthIdentity::try_from)
            .transpose()
            .map_err(|e| {
                tracing::error!(error = %e, user_id = %id, "Corrupt user identity");
                AuthError::UserLoadError
            })
    }

    /// Validate a bearer token and resolve the caller's identity.
    ///
    /// Users are created through registration; a valid token for an
    /// unknown user is rejected rather than provisioned.
    pub(crate) async fn authenticate_jwt(&self, token: &str) -> Result<AuthContext, AuthError> {
        let claims = crate::jwt::validate_access_token(token, &self.config)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidUserId)?;

        let user = self
            .find_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        tracing::debug!(user_id = %user.id, role = %user.role, "Authenticated request");

        Ok(AuthContext::new(user))
    }
}
