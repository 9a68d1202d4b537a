use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use super::error::ApiError;
use super::state::ApiState;

pub async fn api_rate_limit(
    State(state): State<ApiState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !state.rate_limiter.enabled() {
        return next.run(request).await;
    }

    let key = client_key(&request);
    if !state.rate_limiter.allow(&key) {
        metrics::counter!("gazzetta_rate_limited_total").increment(1);
        return ApiError::rate_limited(state.rate_limiter.retry_after_secs());
    }

    next.run(request).await
}

/// Resolves the client key: the first hop in `x-forwarded-for` when a
/// proxy set it, otherwise the peer address.
fn client_key(request: &Request<Body>) -> String {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    if let Some(addr) = forwarded {
        return addr.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::client_key;
    use axum::body::Body;
    use axum::extract::ConnectInfo;
    use axum::http::Request;

    #[test]
    fn forwarded_header_wins_over_peer_address() {
        let mut request = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo("10.0.0.1:5000".parse::<std::net::SocketAddr>().unwrap()));

        assert_eq!(client_key(&request), "203.0.113.7");
    }

    #[test]
    fn falls_back_to_peer_address() {
        let mut request = Request::builder().body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo("192.0.2.9:6000".parse::<std::net::SocketAddr>().unwrap()));

        assert_eq!(client_key(&request), "192.0.2.9");
    }

    #[test]
    fn unknown_when_no_peer_information_exists() {
        let request = Request::builder().body(Body::empty()).unwrap();

        assert_eq!(client_key(&request), "unknown");
    }
}
