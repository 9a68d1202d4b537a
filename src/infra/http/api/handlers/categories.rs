//! Category lookup and corpus stats handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

use super::app_to_api;
use super::posts::require_positive;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

pub async fn post_category(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    require_positive(id, "post id")?;

    let category = state
        .categories
        .post_category(id)
        .await
        .map_err(app_to_api)?;

    Ok(Json(category))
}

pub async fn category_stats(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state.categories.category_stats().await.map_err(app_to_api)?;

    Ok(Json(report))
}
