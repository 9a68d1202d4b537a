//! Domain layer types and invariants.

pub mod categories;
pub mod engagement;
pub mod entities;
pub mod error;
pub mod moderation;
pub mod posts;
pub mod users;
