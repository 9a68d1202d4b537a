//! Notification feed handler.

use axum::Json;
use axum::extract::{Query, State};
use axum::response::IntoResponse;

use super::{NotificationsQuery, repo_to_api};
use crate::infra::http::api::error::ApiError;
use crate::infra::http::api::models::ListEnvelope;
use crate::infra::http::api::state::ApiState;

const DEFAULT_LIMIT: u32 = 50;
const MAX_LIMIT: u32 = 200;

pub async fn list_notifications(
    State(state): State<ApiState>,
    Query(query): Query<NotificationsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let notifications = state
        .notifications
        .recent(limit)
        .await
        .map_err(repo_to_api)?;

    Ok(Json(ListEnvelope::new(notifications)))
}
