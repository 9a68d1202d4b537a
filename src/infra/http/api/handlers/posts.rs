//! Post read and write handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::compose::ComposePostCommand;

use super::{SearchQuery, app_to_api};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::{CreatePostRequest, ListEnvelope, SearchEnvelope};
use crate::infra::http::api::state::ApiState;

pub async fn list_posts(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let posts = state.blog.list_posts().await.map_err(app_to_api)?;

    Ok(Json(ListEnvelope::new(posts)))
}

/// Reading a post counts as a view, so the returned detail carries the
/// updated total.
pub async fn get_post(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    require_positive(id, "post id")?;

    let post = state.blog.read_post(id).await.map_err(app_to_api)?;

    Ok(Json(post))
}

pub async fn create_post(
    State(state): State<ApiState>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = ComposePostCommand {
        title: payload.title,
        content: payload.content,
        user_id: payload.user_id,
        tags: payload.tags,
    };

    let record = state
        .composer
        .create_post(command)
        .await
        .map_err(app_to_api)?;

    state.analytics.invalidate(record.id);

    // Echo the fully resolved post back without bumping its view count.
    let post = state
        .blog
        .post_detail(record.id)
        .await
        .map_err(app_to_api)?;

    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn posts_by_user(
    State(state): State<ApiState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    require_positive(user_id, "user id")?;

    let posts = state
        .blog
        .posts_by_user(user_id)
        .await
        .map_err(app_to_api)?;

    Ok(Json(ListEnvelope::new(posts)))
}

pub async fn search_posts(
    State(state): State<ApiState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let term = query.term.unwrap_or_default();
    let term = term.trim();
    if term.is_empty() {
        return Err(ApiError::bad_request("search term is required"));
    }

    let posts = state.blog.search(term).await.map_err(app_to_api)?;

    Ok(Json(SearchEnvelope::new(term.to_string(), posts)))
}

pub(crate) fn require_positive(id: i64, label: &str) -> Result<(), ApiError> {
    if id <= 0 {
        return Err(ApiError::bad_request(format!("{label} must be positive")));
    }
    Ok(())
}
