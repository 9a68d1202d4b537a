//! Gazzetta is a small blog service: posts with comments and tags over
//! SQLite, plus the analytics endpoints layered on top.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
