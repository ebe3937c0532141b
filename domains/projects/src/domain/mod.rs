//! Domain logic for the Projects domain

pub mod assignment;
pub mod authorization;
pub mod entities;
pub mod events;
pub mod state;
