use async_trait::async_trait;

use super::{SqliteRepositories, util::map_sqlx_error};
use crate::application::repos::{RepoError, ViewsRepo};

#[async_trait]
impl ViewsRepo for SqliteRepositories {
    async fn increment(&self, post_id: i64) -> Result<i64, RepoError> {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO post_views (post_id, views) VALUES (?, 1) \
             ON CONFLICT (post_id) DO UPDATE SET views = views + 1 \
             RETURNING views",
        )
        .bind(post_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)
    }

    async fn count(&self, post_id: i64) -> Result<i64, RepoError> {
        let views = sqlx::query_scalar::<_, i64>("SELECT views FROM post_views WHERE post_id = ?")
            .bind(post_id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(views.unwrap_or(0))
    }
}
