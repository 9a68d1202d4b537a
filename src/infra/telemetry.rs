use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "gazzetta_posts_created_total",
            Unit::Count,
            "Total number of posts created through the API."
        );
        describe_counter!(
            "gazzetta_post_views_total",
            Unit::Count,
            "Total number of post reads that counted as a view."
        );
        describe_counter!(
            "gazzetta_http_requests_total",
            Unit::Count,
            "Total number of HTTP requests served, labeled by method and status."
        );
        describe_counter!(
            "gazzetta_rate_limited_total",
            Unit::Count,
            "Total number of requests rejected by the rate limiter."
        );
        describe_counter!(
            "gazzetta_metrics_cache_hits_total",
            Unit::Count,
            "Total number of post metrics served from the in-process cache."
        );
        describe_counter!(
            "gazzetta_metrics_cache_misses_total",
            Unit::Count,
            "Total number of post metrics recomputed on cache miss."
        );
    });
}
