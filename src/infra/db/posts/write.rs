use async_trait::async_trait;
use sqlx::{Sqlite, Transaction};
use time::OffsetDateTime;

use super::{PostRow, SqliteRepositories};
use crate::application::repos::{NewPostParams, PostsWriteRepo, RepoError};
use crate::domain::entities::PostRecord;
use crate::infra::db::map_sqlx_error;

#[async_trait]
impl PostsWriteRepo for SqliteRepositories {
    async fn create_post(&self, params: NewPostParams) -> Result<PostRecord, RepoError> {
        let NewPostParams {
            title,
            content,
            user_id,
            tags,
        } = params;

        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let now = OffsetDateTime::now_utc();
        let row = sqlx::query_as::<_, PostRow>(
            "INSERT INTO posts (title, content, user_id, created_at) VALUES (?, ?, ?, ?) \
             RETURNING id, title, content, user_id, created_at, updated_at",
        )
        .bind(title)
        .bind(content)
        .bind(user_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        for name in &tags {
            let tag_id = resolve_tag_id(&mut tx, name).await?;
            sqlx::query("INSERT OR IGNORE INTO post_tags (post_id, tag_id) VALUES (?, ?)")
                .bind(row.id)
                .bind(tag_id)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }
}

/// Finds the tag by name or creates it. The no-op upsert makes
/// `RETURNING` yield the id for pre-existing rows as well.
async fn resolve_tag_id(tx: &mut Transaction<'_, Sqlite>, name: &str) -> Result<i64, RepoError> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO tags (name) VALUES (?) \
         ON CONFLICT (name) DO UPDATE SET name = excluded.name \
         RETURNING id",
    )
    .bind(name)
    .fetch_one(&mut **tx)
    .await
    .map_err(map_sqlx_error)
}
