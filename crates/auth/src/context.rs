//! Authorization context for authenticated users

use lingodesk_common::{Actor, Error, UserRole};

use crate::types::AuthIdentity;

/// Represents an authenticated user context
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: AuthIdentity,
}

impl AuthContext {
    pub fn new(user: AuthIdentity) -> Self {
        Self { user }
    }

    /// The caller as seen by the domain services
    pub fn actor(&self) -> Actor {
        Actor::new(self.user.id, self.user.role)
    }

    pub fn role(&self) -> UserRole {
        self.user.role
    }

    #[mutants::skip] // Delegates to Actor::is_admin()
    pub fn is_admin(&self) -> bool {
        self.actor().is_admin()
    }

    /// Reject the request unless the caller holds one of `roles`
    pub fn require_role(&self, roles: &[UserRole]) -> Result<(), Error> {
        if roles.contains(&self.user.role) {
            Ok(())
        } else {
            Err(Error::Forbidden(format!(
                "{} is not permitted to perform this operation",
                self.user.role
            )))
        }
    }
}
