//! Projects API handlers

pub mod files;
pub mod lifecycle;
pub mod projects;

pub use projects::ProjectResponse;
