//! User roles and the authenticated actor
//!
//! Roles are persisted and serialized as upper-case text
//! (`CUSTOMER`, `TRANSLATOR`, `ADMINISTRATOR`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::Error;

/// Role of a marketplace user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Customer,
    Translator,
    Administrator,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Customer => "CUSTOMER",
            UserRole::Translator => "TRANSLATOR",
            UserRole::Administrator => "ADMINISTRATOR",
        }
    }

    /// Roles that may register themselves through the public API
    pub fn can_self_register(&self) -> bool {
        !matches!(self, UserRole::Administrator)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CUSTOMER" => Ok(UserRole::Customer),
            "TRANSLATOR" => Ok(UserRole::Translator),
            "ADMINISTRATOR" => Ok(UserRole::Administrator),
            other => Err(Error::Validation(format!("Unknown role: {}", other))),
        }
    }
}

/// The authenticated caller of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub role: UserRole,
}

impl Actor {
    pub fn new(id: Uuid, role: UserRole) -> Self {
        Self { id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Administrator
    }

    /// True when the actor has `role` and is the user `owner`
    pub fn is(&self, role: UserRole, owner: Option<Uuid>) -> bool {
        self.role == role && owner == Some(self.id)
    }
}
