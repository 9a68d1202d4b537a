pub mod api;
pub mod middleware;

pub use api::rate_limit::ApiRateLimiter;
pub use api::{ApiState, build_router};
