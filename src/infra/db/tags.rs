use async_trait::async_trait;
use sqlx::QueryBuilder;

use super::{SqliteRepositories, util::map_sqlx_error};
use crate::application::repos::{PostTagRecord, RepoError, TagsRepo};
use crate::domain::entities::TagRecord;

#[derive(sqlx::FromRow)]
struct PostTagRow {
    post_id: i64,
    id: i64,
    name: String,
}

impl From<PostTagRow> for PostTagRecord {
    fn from(row: PostTagRow) -> Self {
        Self {
            post_id: row.post_id,
            tag: TagRecord {
                id: row.id,
                name: row.name,
            },
        }
    }
}

#[async_trait]
impl TagsRepo for SqliteRepositories {
    async fn list_for_posts(&self, post_ids: &[i64]) -> Result<Vec<PostTagRecord>, RepoError> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::new(
            "SELECT pt.post_id, t.id, t.name FROM post_tags pt \
             INNER JOIN tags t ON t.id = pt.tag_id WHERE pt.post_id IN (",
        );
        let mut separated = qb.separated(", ");
        for id in post_ids {
            separated.push_bind(*id);
        }
        // Tag ids rise in creation order, so this keeps attach order stable.
        separated.push_unseparated(") ORDER BY pt.post_id, t.id");

        let rows = qb
            .build_query_as::<PostTagRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostTagRecord::from).collect())
    }

    async fn count_distinct_for_user(&self, user_id: i64) -> Result<u64, RepoError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT pt.tag_id) FROM post_tags pt \
             INNER JOIN posts p ON p.id = pt.post_id WHERE p.user_id = ?",
        )
        .bind(user_id)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Self::convert_count(count)
    }
}
