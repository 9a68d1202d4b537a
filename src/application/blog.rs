//! Read-side assembly of posts with their authors, comments, and tags.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use time::OffsetDateTime;
use tracing::debug;

use crate::application::error::AppError;
use crate::application::repos::{
    CommentsRepo, PostTagRecord, PostsRepo, TagsRepo, UsersRepo, ViewsRepo,
};
use crate::domain::engagement;
use crate::domain::entities::{CommentRecord, PostRecord, UserRecord};
use crate::domain::users::mask_email;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorView {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl AuthorView {
    fn from_record(user: &UserRecord) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: mask_email(&user.email),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentView {
    pub id: i64,
    pub content: String,
    pub created_at: OffsetDateTime,
    pub author: Option<AuthorView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagView {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetail {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
    pub author: Option<AuthorView>,
    pub comments: Vec<CommentView>,
    pub tags: Vec<TagView>,
    pub engagement_score: f64,
    pub is_popular: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_count: Option<i64>,
}

#[derive(Clone)]
pub struct BlogService {
    posts: Arc<dyn PostsRepo>,
    users: Arc<dyn UsersRepo>,
    comments: Arc<dyn CommentsRepo>,
    tags: Arc<dyn TagsRepo>,
    views: Arc<dyn ViewsRepo>,
}

impl BlogService {
    pub fn new(
        posts: Arc<dyn PostsRepo>,
        users: Arc<dyn UsersRepo>,
        comments: Arc<dyn CommentsRepo>,
        tags: Arc<dyn TagsRepo>,
        views: Arc<dyn ViewsRepo>,
    ) -> Self {
        Self {
            posts,
            users,
            comments,
            tags,
            views,
        }
    }

    pub async fn list_posts(&self) -> Result<Vec<PostDetail>, AppError> {
        let posts = self.posts.list_all().await?;
        self.assemble(posts).await
    }

    pub async fn posts_by_user(&self, user_id: i64) -> Result<Vec<PostDetail>, AppError> {
        let posts = self.posts.list_by_user(user_id).await?;
        self.assemble(posts).await
    }

    pub async fn search(&self, term: &str) -> Result<Vec<PostDetail>, AppError> {
        let posts = self.posts.search(term).await?;
        debug!(
            target = "application::blog::search",
            term,
            matches = posts.len(),
            "post search"
        );
        self.assemble(posts).await
    }

    /// Fetches one post and counts the read: the view counter is bumped
    /// and the fresh total is attached to the detail.
    pub async fn read_post(&self, id: i64) -> Result<PostDetail, AppError> {
        let post = self.posts.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        let mut details = self.assemble(vec![post]).await?;
        let mut detail = details.pop().ok_or_else(|| {
            AppError::unexpected("assembled detail set was empty for an existing post")
        })?;

        let views = self.views.increment(id).await?;
        metrics::counter!("gazzetta_post_views_total").increment(1);
        detail.view_count = Some(views);
        Ok(detail)
    }

    /// Detail lookup without touching the view counter, used for the
    /// response to a freshly created post.
    pub async fn post_detail(&self, id: i64) -> Result<PostDetail, AppError> {
        let post = self.posts.find_by_id(id).await?.ok_or(AppError::NotFound)?;
        let mut details = self.assemble(vec![post]).await?;
        details.pop().ok_or_else(|| {
            AppError::unexpected("assembled detail set was empty for an existing post")
        })
    }

    /// Resolves authors, comments, and tags for a batch of posts with one
    /// query per relation, then stitches the sets in memory.
    async fn assemble(&self, posts: Vec<PostRecord>) -> Result<Vec<PostDetail>, AppError> {
        if posts.is_empty() {
            return Ok(Vec::new());
        }

        let post_ids: Vec<i64> = posts.iter().map(|post| post.id).collect();
        let (comments, tag_links) = tokio::try_join!(
            self.comments.list_for_posts(&post_ids),
            self.tags.list_for_posts(&post_ids),
        )?;

        let mut author_ids: Vec<i64> = posts.iter().map(|post| post.user_id).collect();
        author_ids.extend(comments.iter().map(|comment| comment.user_id));
        author_ids.sort_unstable();
        author_ids.dedup();

        let authors = self.users.list_by_ids(&author_ids).await?;
        let authors_by_id: HashMap<i64, UserRecord> =
            authors.into_iter().map(|user| (user.id, user)).collect();

        let mut comments_by_post: HashMap<i64, Vec<CommentRecord>> = HashMap::new();
        for comment in comments {
            comments_by_post
                .entry(comment.post_id)
                .or_default()
                .push(comment);
        }

        let mut tags_by_post: HashMap<i64, Vec<TagView>> = HashMap::new();
        for PostTagRecord { post_id, tag } in tag_links {
            tags_by_post.entry(post_id).or_default().push(TagView {
                id: tag.id,
                name: tag.name,
            });
        }

        let now = OffsetDateTime::now_utc();
        let details = posts
            .into_iter()
            .map(|post| {
                let comments = comments_by_post.remove(&post.id).unwrap_or_default();
                let tags = tags_by_post.remove(&post.id).unwrap_or_default();
                build_detail(post, comments, tags, &authors_by_id, now)
            })
            .collect();

        Ok(details)
    }
}

fn build_detail(
    post: PostRecord,
    comments: Vec<CommentRecord>,
    tags: Vec<TagView>,
    authors_by_id: &HashMap<i64, UserRecord>,
    now: OffsetDateTime,
) -> PostDetail {
    let comment_views: Vec<CommentView> = comments
        .into_iter()
        .map(|comment| CommentView {
            id: comment.id,
            content: comment.content,
            created_at: comment.created_at,
            author: authors_by_id.get(&comment.user_id).map(AuthorView::from_record),
        })
        .collect();

    let engagement_score =
        engagement::score(comment_views.len(), tags.len(), post.created_at, now);
    let is_popular = engagement::is_popular(comment_views.len());

    PostDetail {
        id: post.id,
        title: post.title,
        content: post.content,
        created_at: post.created_at,
        updated_at: post.updated_at,
        author: authors_by_id.get(&post.user_id).map(AuthorView::from_record),
        comments: comment_views,
        tags,
        engagement_score,
        is_popular,
        view_count: None,
    }
}
