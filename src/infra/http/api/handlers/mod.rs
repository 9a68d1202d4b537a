//! API handlers organized by resource.
//!
//! Shared query structs and error conversions live here; each submodule
//! holds the handlers for one surface.

mod analytics;
mod categories;
mod health;
mod notifications;
mod posts;

pub use analytics::*;
pub use categories::*;
pub use health::*;
pub use notifications::*;
pub use posts::*;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub term: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NotificationsQuery {
    pub limit: Option<u32>,
}

// ----- Shared error conversions -----

use axum::http::StatusCode;

use crate::application::error::AppError;
use crate::application::repos::RepoError;
use crate::domain::error::DomainError;

use super::error::{ApiError, codes};

pub(crate) fn app_to_api(err: AppError) -> ApiError {
    match err {
        AppError::Domain(DomainError::Validation { message }) => ApiError::bad_request(message),
        AppError::Domain(DomainError::Moderation { message }) => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::CONTENT_REJECTED,
            message,
            None,
        ),
        AppError::UnknownAuthor { user_id } => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::UNKNOWN_AUTHOR,
            "author does not exist",
            Some(format!("user_id {user_id}")),
        ),
        AppError::NotFound => ApiError::not_found("resource not found"),
        AppError::Repo(repo) => repo_to_api(repo),
        AppError::Infra(err) => {
            let status = AppError::Infra(err).status_code();
            ApiError::new(status, codes::INTERNAL, "internal error", None)
        }
        AppError::Unexpected(message) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::INTERNAL,
            "internal error",
            Some(message),
        ),
    }
}

pub(crate) fn repo_to_api(err: RepoError) -> ApiError {
    match err {
        RepoError::Duplicate { constraint } => ApiError::new(
            StatusCode::CONFLICT,
            codes::DUPLICATE,
            "Duplicate record",
            Some(constraint),
        ),
        RepoError::NotFound => ApiError::not_found("resource not found"),
        RepoError::InvalidInput { message } => ApiError::new(
            StatusCode::BAD_REQUEST,
            codes::INVALID_REQUEST,
            "Invalid input",
            Some(message),
        ),
        RepoError::Integrity { message } => ApiError::new(
            StatusCode::CONFLICT,
            codes::INTEGRITY,
            "Integrity constraint violated",
            Some(message),
        ),
        RepoError::Timeout => ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::DB_TIMEOUT,
            "Database timeout",
            None,
        ),
        RepoError::Persistence(msg) => ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::INTERNAL,
            "Persistence error",
            Some(msg),
        ),
    }
}
