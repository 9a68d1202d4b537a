//! Write-side pipeline for accepting a new post.

use std::sync::Arc;

use tracing::info;

use crate::application::error::AppError;
use crate::application::notifications::NotificationService;
use crate::application::repos::{NewPostParams, PostsWriteRepo, UsersRepo};
use crate::domain::entities::PostRecord;
use crate::domain::{moderation, posts};

#[derive(Debug, Clone)]
pub struct ComposePostCommand {
    pub title: String,
    pub content: String,
    pub user_id: i64,
    pub tags: Vec<String>,
}

#[derive(Clone)]
pub struct ComposeService {
    users: Arc<dyn UsersRepo>,
    writer: Arc<dyn PostsWriteRepo>,
    notifications: NotificationService,
}

impl ComposeService {
    pub fn new(
        users: Arc<dyn UsersRepo>,
        writer: Arc<dyn PostsWriteRepo>,
        notifications: NotificationService,
    ) -> Self {
        Self {
            users,
            writer,
            notifications,
        }
    }

    /// Validates, screens, and persists a post, then records the author
    /// notification. Tag resolution happens inside the repository
    /// transaction so a failed tag link never leaves a bare post behind.
    pub async fn create_post(&self, command: ComposePostCommand) -> Result<PostRecord, AppError> {
        posts::validate_new_post(&command.title, &command.content, command.user_id)?;
        moderation::screen(&command.title, &command.content)?;

        let author = self
            .users
            .find_by_id(command.user_id)
            .await?
            .ok_or(AppError::UnknownAuthor {
                user_id: command.user_id,
            })?;

        let tags = posts::normalize_tags(&command.tags)?;

        let params = NewPostParams {
            title: command.title.trim().to_string(),
            content: command.content,
            user_id: command.user_id,
            tags,
        };
        let post = self.writer.create_post(params).await?;

        self.notifications.post_created(&author, post.id).await?;
        metrics::counter!("gazzetta_posts_created_total").increment(1);
        info!(
            target = "application::compose::create_post",
            post_id = post.id,
            author_id = author.id,
            "post created"
        );

        Ok(post)
    }
}
