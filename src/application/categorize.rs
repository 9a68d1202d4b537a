//! Keyword categorization over the stored corpus.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;
use time::OffsetDateTime;

use crate::application::error::AppError;
use crate::application::repos::{PostsRepo, TagsRepo};
use crate::domain::categories;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostCategory {
    pub post_id: i64,
    pub category: String,
    pub most_popular_category: String,
    pub analyzed_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStatsReport {
    pub category_stats: BTreeMap<String, u64>,
    pub most_popular_category: String,
    pub total_categories: u64,
    pub analyzed_at: OffsetDateTime,
}

#[derive(Clone)]
pub struct CategorizationService {
    posts: Arc<dyn PostsRepo>,
    tags: Arc<dyn TagsRepo>,
}

impl CategorizationService {
    pub fn new(posts: Arc<dyn PostsRepo>, tags: Arc<dyn TagsRepo>) -> Self {
        Self { posts, tags }
    }

    pub async fn post_category(&self, post_id: i64) -> Result<PostCategory, AppError> {
        let post = self
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let links = self.tags.list_for_posts(&[post_id]).await?;
        let tag_names: Vec<String> = links.into_iter().map(|link| link.tag.name).collect();

        let category = categories::label_for(&post.title, &tag_names);
        let most_popular_category = self.most_popular().await?;

        Ok(PostCategory {
            post_id,
            category,
            most_popular_category,
            analyzed_at: OffsetDateTime::now_utc(),
        })
    }

    pub async fn category_stats(&self) -> Result<CategoryStatsReport, AppError> {
        let stats = self.collect_stats().await?;
        let most_popular_category = most_popular_label(&stats);
        let total_categories = stats.len() as u64;

        Ok(CategoryStatsReport {
            category_stats: stats,
            most_popular_category,
            total_categories,
            analyzed_at: OffsetDateTime::now_utc(),
        })
    }

    async fn most_popular(&self) -> Result<String, AppError> {
        let stats = self.collect_stats().await?;
        Ok(most_popular_label(&stats))
    }

    /// Labels every stored post and counts posts per label. A post whose
    /// keywords span several categories lands under its composite label,
    /// not once per category.
    async fn collect_stats(&self) -> Result<BTreeMap<String, u64>, AppError> {
        let posts = self.posts.list_all().await?;
        if posts.is_empty() {
            return Ok(BTreeMap::new());
        }

        let post_ids: Vec<i64> = posts.iter().map(|post| post.id).collect();
        let links = self.tags.list_for_posts(&post_ids).await?;

        let mut tags_by_post: HashMap<i64, Vec<String>> = HashMap::new();
        for link in links {
            tags_by_post
                .entry(link.post_id)
                .or_default()
                .push(link.tag.name);
        }

        let mut stats: BTreeMap<String, u64> = BTreeMap::new();
        for post in posts {
            let tag_names = tags_by_post.remove(&post.id).unwrap_or_default();
            let label = categories::label_for(&post.title, &tag_names);
            *stats.entry(label).or_insert(0) += 1;
        }

        Ok(stats)
    }
}

/// Highest count wins; on a tie the lexicographically smaller label does.
/// The predecessor of this function returned a random vocabulary entry.
fn most_popular_label(stats: &BTreeMap<String, u64>) -> String {
    let mut best: Option<(&str, u64)> = None;
    for (label, count) in stats {
        let replace = match best {
            None => true,
            Some((_, best_count)) => *count > best_count,
        };
        if replace {
            best = Some((label.as_str(), *count));
        }
    }

    match best {
        Some((label, _)) => label.to_string(),
        None => categories::GENERAL_CATEGORY.to_string(),
    }
}
