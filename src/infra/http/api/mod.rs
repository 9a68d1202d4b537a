pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod rate_limit;
pub mod state;

pub use state::ApiState;

use axum::{Router, middleware as axum_middleware, routing::get};

use crate::infra::http::middleware::{log_responses, set_request_context};

pub fn build_router(state: ApiState) -> Router {
    let rate_state = state.clone();

    let api = Router::new()
        .route(
            "/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route("/posts/search", get(handlers::search_posts))
        .route("/posts/categories/stats", get(handlers::category_stats))
        .route("/posts/user/{user_id}", get(handlers::posts_by_user))
        .route("/posts/{id}", get(handlers::get_post))
        .route("/posts/{id}/category", get(handlers::post_category))
        .route("/posts/{id}/metrics", get(handlers::post_metrics))
        .route("/users/{user_id}/stats", get(handlers::user_stats))
        .route("/notifications", get(handlers::list_notifications))
        .layer(axum_middleware::from_fn_with_state(
            rate_state,
            middleware::api_rate_limit,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .with_state(state)
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}
