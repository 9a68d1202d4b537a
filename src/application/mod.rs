//! Application services layer.

pub mod analytics;
pub mod blog;
pub mod categorize;
pub mod compose;
pub mod error;
pub mod notifications;
pub mod repos;
