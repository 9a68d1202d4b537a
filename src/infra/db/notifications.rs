use async_trait::async_trait;
use time::OffsetDateTime;

use super::{SqliteRepositories, util::map_sqlx_error};
use crate::application::repos::{NewNotification, NotificationsRepo, RepoError};
use crate::domain::entities::NotificationRecord;

#[derive(sqlx::FromRow)]
struct NotificationRow {
    id: i64,
    user_id: i64,
    post_id: i64,
    recipient: String,
    subject: String,
    body: String,
    created_at: OffsetDateTime,
}

impl From<NotificationRow> for NotificationRecord {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            post_id: row.post_id,
            recipient: row.recipient,
            subject: row.subject,
            body: row.body,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl NotificationsRepo for SqliteRepositories {
    async fn record(&self, notification: NewNotification) -> Result<NotificationRecord, RepoError> {
        let NewNotification {
            user_id,
            post_id,
            recipient,
            subject,
            body,
        } = notification;

        let now = OffsetDateTime::now_utc();
        let row = sqlx::query_as::<_, NotificationRow>(
            "INSERT INTO notifications (user_id, post_id, recipient, subject, body, created_at) \
             VALUES (?, ?, ?, ?, ?, ?) \
             RETURNING id, user_id, post_id, recipient, subject, body, created_at",
        )
        .bind(user_id)
        .bind(post_id)
        .bind(recipient)
        .bind(subject)
        .bind(body)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(NotificationRecord::from(row))
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<NotificationRecord>, RepoError> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            "SELECT id, user_id, post_id, recipient, subject, body, created_at \
             FROM notifications ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(i64::from(limit))
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(NotificationRecord::from).collect())
    }
}
