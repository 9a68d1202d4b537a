use std::sync::Arc;
use std::time::Instant;

use crate::application::analytics::AnalyticsService;
use crate::application::blog::BlogService;
use crate::application::categorize::CategorizationService;
use crate::application::compose::ComposeService;
use crate::application::notifications::NotificationService;
use crate::infra::db::SqliteRepositories;

use super::rate_limit::ApiRateLimiter;

#[derive(Clone)]
pub struct ApiState {
    pub blog: Arc<BlogService>,
    pub composer: Arc<ComposeService>,
    pub analytics: Arc<AnalyticsService>,
    pub categories: Arc<CategorizationService>,
    pub notifications: Arc<NotificationService>,
    pub db: Arc<SqliteRepositories>,
    pub rate_limiter: Arc<ApiRateLimiter>,
    pub started_at: Instant,
}

impl ApiState {
    /// Wires every service onto the one repository handle. The pool is
    /// shared; the clones are cheap Arc bumps.
    pub fn new(repos: SqliteRepositories, rate_limiter: ApiRateLimiter) -> Self {
        let db = Arc::new(repos);
        let notifications = NotificationService::new(db.clone());

        Self {
            blog: Arc::new(BlogService::new(
                db.clone(),
                db.clone(),
                db.clone(),
                db.clone(),
                db.clone(),
            )),
            composer: Arc::new(ComposeService::new(
                db.clone(),
                db.clone(),
                notifications.clone(),
            )),
            analytics: Arc::new(AnalyticsService::new(db.clone(), db.clone())),
            categories: Arc::new(CategorizationService::new(db.clone(), db.clone())),
            notifications: Arc::new(notifications),
            db,
            rate_limiter: Arc::new(rate_limiter),
            started_at: Instant::now(),
        }
    }
}
