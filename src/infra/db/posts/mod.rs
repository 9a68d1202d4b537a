mod read;
mod write;

use time::OffsetDateTime;

use super::SqliteRepositories;
use crate::application::repos::PostSummary;
use crate::domain::entities::PostRecord;

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    content: String,
    user_id: i64,
    created_at: OffsetDateTime,
    updated_at: Option<OffsetDateTime>,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PostSummaryRow {
    id: i64,
    title: String,
    user_id: i64,
    created_at: OffsetDateTime,
    comment_count: i64,
    tag_count: i64,
}

impl From<PostSummaryRow> for PostSummary {
    fn from(row: PostSummaryRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            user_id: row.user_id,
            created_at: row.created_at,
            comment_count: row.comment_count,
            tag_count: row.tag_count,
        }
    }
}
