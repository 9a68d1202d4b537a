use async_trait::async_trait;
use sqlx::QueryBuilder;
use time::OffsetDateTime;

use super::{SqliteRepositories, util::map_sqlx_error};
use crate::application::repos::{CommentsRepo, RepoError};
use crate::domain::entities::CommentRecord;

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i64,
    content: String,
    user_id: i64,
    post_id: i64,
    created_at: OffsetDateTime,
}

impl From<CommentRow> for CommentRecord {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            content: row.content,
            user_id: row.user_id,
            post_id: row.post_id,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl CommentsRepo for SqliteRepositories {
    async fn list_for_posts(&self, post_ids: &[i64]) -> Result<Vec<CommentRecord>, RepoError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::new(
            "SELECT id, content, user_id, post_id, created_at FROM comments WHERE post_id IN (",
        );
        let mut separated = qb.separated(", ");
        for id in post_ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY post_id, id");

        let rows = qb
            .build_query_as::<CommentRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CommentRecord::from).collect())
    }
}
