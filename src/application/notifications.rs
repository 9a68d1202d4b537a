//! Author notifications persisted as records instead of outbound mail.

use std::sync::Arc;

use tracing::info;

use crate::application::repos::{NewNotification, NotificationsRepo, RepoError};
use crate::domain::entities::{NotificationRecord, UserRecord};

const POST_CREATED_SUBJECT: &str = "Post Created";

#[derive(Clone)]
pub struct NotificationService {
    repo: Arc<dyn NotificationsRepo>,
}

impl NotificationService {
    pub fn new(repo: Arc<dyn NotificationsRepo>) -> Self {
        Self { repo }
    }

    pub async fn post_created(
        &self,
        author: &UserRecord,
        post_id: i64,
    ) -> Result<NotificationRecord, RepoError> {
        let notification = NewNotification {
            user_id: author.id,
            post_id,
            recipient: author.email.clone(),
            subject: POST_CREATED_SUBJECT.to_string(),
            body: format!(
                "Hello {}, your post {} has been created successfully!",
                author.name, post_id
            ),
        };

        let record = self.repo.record(notification).await?;
        info!(
            target = "application::notifications::post_created",
            notification_id = record.id,
            post_id,
            author_id = author.id,
            "notification recorded"
        );
        Ok(record)
    }

    pub async fn recent(&self, limit: u32) -> Result<Vec<NotificationRecord>, RepoError> {
        self.repo.list_recent(limit).await
    }
}
