//! Per-post metrics and per-author stats handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

use super::app_to_api;
use super::posts::require_positive;
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::state::ApiState;

pub async fn post_metrics(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    require_positive(id, "post id")?;

    let metrics = state.analytics.post_metrics(id).await.map_err(app_to_api)?;

    Ok(Json(metrics))
}

pub async fn user_stats(
    State(state): State<ApiState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    require_positive(user_id, "user id")?;

    let stats = state
        .analytics
        .user_stats(user_id)
        .await
        .map_err(app_to_api)?;

    Ok(Json(stats))
}
