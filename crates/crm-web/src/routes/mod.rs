//! Route handlers.

pub mod entities;
pub mod health;
pub mod links;
