//! Derived per-post and per-author statistics.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

use lru::LruCache;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::warn;

use crate::application::error::AppError;
use crate::application::repos::{PostsRepo, TagsRepo};

const SOURCE: &str = "application::analytics";

/// Keep at most this many post metric entries in memory. The predecessor
/// of this cache grew without bound.
const METRICS_CACHE_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostMetrics {
    pub post_id: i64,
    pub title: String,
    pub comment_count: i64,
    pub tag_count: i64,
    pub created_at: OffsetDateTime,
    pub analyzed_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserPostStats {
    pub user_id: i64,
    pub total_posts: u64,
    pub total_comments: u64,
    pub total_tags: u64,
    pub analyzed_at: OffsetDateTime,
}

#[derive(Clone)]
pub struct AnalyticsService {
    posts: Arc<dyn PostsRepo>,
    tags: Arc<dyn TagsRepo>,
    cache: Arc<Mutex<LruCache<i64, PostMetrics>>>,
}

impl AnalyticsService {
    pub fn new(posts: Arc<dyn PostsRepo>, tags: Arc<dyn TagsRepo>) -> Self {
        let capacity = NonZeroUsize::new(METRICS_CACHE_CAPACITY)
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            posts,
            tags,
            cache: Arc::new(Mutex::new(LruCache::new(capacity))),
        }
    }

    pub async fn post_metrics(&self, post_id: i64) -> Result<PostMetrics, AppError> {
        if let Some(cached) = self.lock_cache("post_metrics").get(&post_id).cloned() {
            metrics::counter!("gazzetta_metrics_cache_hits_total").increment(1);
            return Ok(cached);
        }
        metrics::counter!("gazzetta_metrics_cache_misses_total").increment(1);

        let summary = self
            .posts
            .find_summary(post_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let snapshot = PostMetrics {
            post_id: summary.id,
            title: summary.title,
            comment_count: summary.comment_count,
            tag_count: summary.tag_count,
            created_at: summary.created_at,
            analyzed_at: OffsetDateTime::now_utc(),
        };

        self.lock_cache("post_metrics")
            .put(post_id, snapshot.clone());
        Ok(snapshot)
    }

    pub async fn user_stats(&self, user_id: i64) -> Result<UserPostStats, AppError> {
        let summaries = self.posts.list_summaries_by_user(user_id).await?;
        let total_tags = self.tags.count_distinct_for_user(user_id).await?;

        let total_comments: i64 = summaries.iter().map(|summary| summary.comment_count).sum();

        Ok(UserPostStats {
            user_id,
            total_posts: summaries.len() as u64,
            total_comments: total_comments.max(0) as u64,
            total_tags,
            analyzed_at: OffsetDateTime::now_utc(),
        })
    }

    /// Drops a cached entry after a write touches the post.
    pub fn invalidate(&self, post_id: i64) {
        self.lock_cache("invalidate").pop(&post_id);
    }

    fn lock_cache(&self, op: &'static str) -> MutexGuard<'_, LruCache<i64, PostMetrics>> {
        match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!(
                    op,
                    target_module = SOURCE,
                    lock_kind = "mutex.lock",
                    result = "poisoned_recovered",
                    "Recovered from poisoned metrics cache lock"
                );
                poisoned.into_inner()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::application::repos::{PostSummary, PostTagRecord, RepoError};
    use crate::domain::entities::PostRecord;

    struct CountingPostsRepo {
        summary: Option<PostSummary>,
        summary_reads: AtomicUsize,
    }

    #[async_trait]
    impl PostsRepo for CountingPostsRepo {
        async fn list_all(&self) -> Result<Vec<PostRecord>, RepoError> {
            Ok(Vec::new())
        }

        async fn find_by_id(&self, _id: i64) -> Result<Option<PostRecord>, RepoError> {
            Ok(None)
        }

        async fn list_by_user(&self, _user_id: i64) -> Result<Vec<PostRecord>, RepoError> {
            Ok(Vec::new())
        }

        async fn search(&self, _term: &str) -> Result<Vec<PostRecord>, RepoError> {
            Ok(Vec::new())
        }

        async fn list_summaries(&self) -> Result<Vec<PostSummary>, RepoError> {
            Ok(Vec::new())
        }

        async fn find_summary(&self, id: i64) -> Result<Option<PostSummary>, RepoError> {
            self.summary_reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.summary.clone().filter(|summary| summary.id == id))
        }

        async fn list_summaries_by_user(
            &self,
            user_id: i64,
        ) -> Result<Vec<PostSummary>, RepoError> {
            Ok(self
                .summary
                .clone()
                .filter(|summary| summary.user_id == user_id)
                .into_iter()
                .collect())
        }
    }

    struct StubTagsRepo {
        distinct: u64,
    }

    #[async_trait]
    impl TagsRepo for StubTagsRepo {
        async fn list_for_posts(&self, _post_ids: &[i64]) -> Result<Vec<PostTagRecord>, RepoError> {
            Ok(Vec::new())
        }

        async fn count_distinct_for_user(&self, _user_id: i64) -> Result<u64, RepoError> {
            Ok(self.distinct)
        }
    }

    fn sample_summary(id: i64, user_id: i64) -> PostSummary {
        PostSummary {
            id,
            title: "Performance em Node.js".to_string(),
            user_id,
            created_at: OffsetDateTime::now_utc(),
            comment_count: 4,
            tag_count: 2,
        }
    }

    fn build(summary: Option<PostSummary>, distinct: u64) -> (AnalyticsService, Arc<CountingPostsRepo>) {
        let posts = Arc::new(CountingPostsRepo {
            summary,
            summary_reads: AtomicUsize::new(0),
        });
        let service = AnalyticsService::new(posts.clone(), Arc::new(StubTagsRepo { distinct }));
        (service, posts)
    }

    #[tokio::test]
    async fn metrics_are_cached_after_first_read() {
        let (service, posts) = build(Some(sample_summary(4, 2)), 0);

        let first = service.post_metrics(4).await.unwrap();
        let second = service.post_metrics(4).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(posts.summary_reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_a_fresh_read() {
        let (service, posts) = build(Some(sample_summary(4, 2)), 0);

        service.post_metrics(4).await.unwrap();
        service.invalidate(4);
        service.post_metrics(4).await.unwrap();

        assert_eq!(posts.summary_reads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn missing_post_is_not_found() {
        let (service, _) = build(None, 0);
        let err = service.post_metrics(9).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn user_stats_aggregate_counts() {
        let (service, _) = build(Some(sample_summary(4, 2)), 3);

        let stats = service.user_stats(2).await.unwrap();
        assert_eq!(stats.total_posts, 1);
        assert_eq!(stats.total_comments, 4);
        assert_eq!(stats.total_tags, 3);
    }
}
