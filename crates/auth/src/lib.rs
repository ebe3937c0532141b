//! Authentication middleware for Lingodesk API
//!
//! Provides JWT validation and axum extractors that work with any
//! domain state implementing `FromRef<S>` for `AuthBackend`.
//! An authenticated request resolves to an [`AuthContext`] whose
//! [`Actor`](lingodesk_common::Actor) is handed to the domain services.

mod backend;
mod claims;
mod config;
mod context;
mod error;
mod extractors;
mod jwt;
mod password;
mod types;

pub use backend::AuthBackend;
pub use claims::AccessClaims;
pub use config::AuthConfig;
pub use context::AuthContext;
pub use error::AuthError;
pub use extractors::{AdminUser, AuthUser};
pub use jwt::issue_access_token;
pub use password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LEN,
};
pub use types::AuthIdentity;
