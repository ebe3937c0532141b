//! Auth read-model types
//!
//! Lightweight view of the `users` rows owned by the users domain,
//! carrying only what authentication and authorization need.

use chrono::{DateTime, Utc};
use lingodesk_common::UserRole;
use uuid::Uuid;

/// Lightweight identity for authenticated users.
#[derive(Debug, Clone)]
pub struct AuthIdentity {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// Raw identity row; `role` is stored as text
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AuthIdentityRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AuthIdentityRow> for AuthIdentity {
    type Error = lingodesk_common::Error;

    fn try_from(row: AuthIdentityRow) -> Result<Self, Self::Error> {
        let role = row.role.parse::<UserRole>().map_err(|_| {
            lingodesk_common::Error::CorruptRecord(format!(
                "user {} has unknown role {}",
                row.id, row.role
            ))
        })?;
        Ok(Self {
            id: row.id,
            email: row.email,
            name: row.name,
            role,
            created_at: row.created_at,
        })
    }
}
