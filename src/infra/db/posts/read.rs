use async_trait::async_trait;

use super::{PostRow, PostSummaryRow, SqliteRepositories};
use crate::application::repos::{PostSummary, PostsRepo, RepoError};
use crate::domain::entities::PostRecord;
use crate::infra::db::map_sqlx_error;
use crate::infra::db::util::like_pattern;

const POST_SELECT: &str = "SELECT id, title, content, user_id, created_at, updated_at FROM posts";

// Comment and tag counts come from correlated subqueries so a single
// round trip covers everything the analytics paths need.
const SUMMARY_SELECT: &str = "SELECT p.id, p.title, p.user_id, p.created_at, \
     (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count, \
     (SELECT COUNT(*) FROM post_tags pt WHERE pt.post_id = p.id) AS tag_count \
     FROM posts p";

const RECENT_FIRST: &str = " ORDER BY created_at DESC, id DESC";

#[async_trait]
impl PostsRepo for SqliteRepositories {
    async fn list_all(&self) -> Result<Vec<PostRecord>, RepoError> {
        let rows = sqlx::query_as::<_, PostRow>(&format!("{POST_SELECT}{RECENT_FIRST}"))
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostRecord::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PostRecord>, RepoError> {
        let row = sqlx::query_as::<_, PostRow>(&format!("{POST_SELECT} WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(PostRecord::from))
    }

    async fn list_by_user(&self, user_id: i64) -> Result<Vec<PostRecord>, RepoError> {
        let rows =
            sqlx::query_as::<_, PostRow>(&format!("{POST_SELECT} WHERE user_id = ?{RECENT_FIRST}"))
                .bind(user_id)
                .fetch_all(self.pool())
                .await
                .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostRecord::from).collect())
    }

    async fn search(&self, term: &str) -> Result<Vec<PostRecord>, RepoError> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "{POST_SELECT} WHERE LOWER(title) LIKE ?1 ESCAPE '\\' \
             OR LOWER(content) LIKE ?1 ESCAPE '\\'{RECENT_FIRST}"
        ))
        .bind(like_pattern(term))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostRecord::from).collect())
    }

    async fn list_summaries(&self) -> Result<Vec<PostSummary>, RepoError> {
        let rows = sqlx::query_as::<_, PostSummaryRow>(&format!(
            "{SUMMARY_SELECT} ORDER BY p.created_at DESC, p.id DESC"
        ))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostSummary::from).collect())
    }

    async fn find_summary(&self, id: i64) -> Result<Option<PostSummary>, RepoError> {
        let row = sqlx::query_as::<_, PostSummaryRow>(&format!("{SUMMARY_SELECT} WHERE p.id = ?"))
            .bind(id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(PostSummary::from))
    }

    async fn list_summaries_by_user(&self, user_id: i64) -> Result<Vec<PostSummary>, RepoError> {
        let rows = sqlx::query_as::<_, PostSummaryRow>(&format!(
            "{SUMMARY_SELECT} WHERE p.user_id = ? ORDER BY p.created_at DESC, p.id DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostSummary::from).collect())
    }
}
