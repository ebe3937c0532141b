//! Shared utilities, configuration, and error handling for Lingodesk
//!
//! This crate provides common functionality used across the Lingodesk workspace:
//! - Configuration management following 12-factor principles
//! - The error taxonomy and its HTTP mapping
//! - User roles and the authenticated actor

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod role;
pub mod state;

pub use config::{AdminBootstrap, Config};
pub use db::RepositoryError;
pub use error::{Error, Result};
pub use extractors::ValidatedJson;
pub use role::{Actor, UserRole};
pub use state::StateError;
