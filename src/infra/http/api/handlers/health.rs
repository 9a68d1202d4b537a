//! Liveness endpoint with a database ping.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::warn;

use crate::infra::http::api::models::HealthResponse;
use crate::infra::http::api::state::ApiState;

pub async fn health(State(state): State<ApiState>) -> Response {
    let database = match state.db.health_check().await {
        Ok(()) => Ok(()),
        Err(err) => {
            warn!(
                target = "gazzetta::http::health",
                error = %err,
                "database ping failed"
            );
            Err(())
        }
    };

    let healthy = database.is_ok();
    let body = HealthResponse {
        status: if healthy { "ok" } else { "degraded" },
        timestamp: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        database: if healthy { "ok" } else { "unavailable" },
    };

    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(body)).into_response()
}
