use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub user_id: i64,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ListEnvelope<T> {
    pub items: Vec<T>,
    pub count: usize,
}

impl<T> ListEnvelope<T> {
    pub fn new(items: Vec<T>) -> Self {
        let count = items.len();
        Self { items, count }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchEnvelope<T> {
    pub term: String,
    pub items: Vec<T>,
    pub count: usize,
}

impl<T> SearchEnvelope<T> {
    pub fn new(term: String, items: Vec<T>) -> Self {
        let count = items.len();
        Self { term, items, count }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
    pub uptime_seconds: u64,
    pub database: &'static str,
}
