//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::domain::entities::{
    CommentRecord, NotificationRecord, PostRecord, TagRecord, UserRecord,
};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Aggregate counts per post, used by analytics and categorization so
/// neither has to hydrate full comment or tag sets.
#[derive(Debug, Clone, PartialEq)]
pub struct PostSummary {
    pub id: i64,
    pub title: String,
    pub user_id: i64,
    pub created_at: OffsetDateTime,
    pub comment_count: i64,
    pub tag_count: i64,
}

/// A tag together with the post it is attached to, for batched loading.
#[derive(Debug, Clone, PartialEq)]
pub struct PostTagRecord {
    pub post_id: i64,
    pub tag: TagRecord,
}

#[derive(Debug, Clone)]
pub struct NewPostParams {
    pub title: String,
    pub content: String,
    pub user_id: i64,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: i64,
    pub post_id: i64,
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait UsersRepo: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, RepoError>;

    async fn list_by_ids(&self, ids: &[i64]) -> Result<Vec<UserRecord>, RepoError>;
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    async fn list_all(&self) -> Result<Vec<PostRecord>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<PostRecord>, RepoError>;

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<PostRecord>, RepoError>;

    /// Case-insensitive substring match over title and content.
    async fn search(&self, term: &str) -> Result<Vec<PostRecord>, RepoError>;

    async fn list_summaries(&self) -> Result<Vec<PostSummary>, RepoError>;

    async fn find_summary(&self, id: i64) -> Result<Option<PostSummary>, RepoError>;

    async fn list_summaries_by_user(&self, user_id: i64) -> Result<Vec<PostSummary>, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    /// Inserts the post and resolves or creates its tags in one
    /// transaction; either everything lands or nothing does.
    async fn create_post(&self, params: NewPostParams) -> Result<PostRecord, RepoError>;
}

#[async_trait]
pub trait CommentsRepo: Send + Sync {
    async fn list_for_posts(&self, post_ids: &[i64]) -> Result<Vec<CommentRecord>, RepoError>;
}

#[async_trait]
pub trait TagsRepo: Send + Sync {
    async fn list_for_posts(&self, post_ids: &[i64]) -> Result<Vec<PostTagRecord>, RepoError>;

    async fn count_distinct_for_user(&self, user_id: i64) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait ViewsRepo: Send + Sync {
    /// Adds one view and returns the updated total. Counts only ever
    /// grow; there is no decrement or reset path.
    async fn increment(&self, post_id: i64) -> Result<i64, RepoError>;

    async fn count(&self, post_id: i64) -> Result<i64, RepoError>;
}

#[async_trait]
pub trait NotificationsRepo: Send + Sync {
    async fn record(&self, notification: NewNotification) -> Result<NotificationRecord, RepoError>;

    async fn list_recent(&self, limit: u32) -> Result<Vec<NotificationRecord>, RepoError>;
}
