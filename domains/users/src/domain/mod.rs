//! Domain layer for users

pub mod directory;
pub mod entities;
