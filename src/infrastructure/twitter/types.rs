//! Wire formats of the Twitter v1.1 REST API.

use serde::Deserialize;

use crate::domain::error::ApiError;
use crate::domain::types::{Post, PostId};

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub statuses: Vec<Status>,
}

#[derive(Debug, Deserialize)]
pub struct Status {
    pub id_str: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub full_text: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub screen_name: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    code: Option<i64>,
    message: String,
}

impl Status {
    pub fn post_id(&self) -> PostId {
        match self.id_str.parse::<u64>() {
            Ok(id) => PostId::Numeric(id),
            Err(_) => PostId::Text(self.id_str.clone()),
        }
    }

    /// Converts to a [`Post`]. Statuses without an author cannot be replied to and yield `None`.
    pub fn into_post(self) -> Option<Post> {
        let id = self.post_id();
        let author = self.user?.screen_name;
        Some(Post {
            id,
            author,
            text: self.full_text.or(self.text).unwrap_or_default(),
        })
    }
}

/// Converts a search page into posts, dropping statuses that have no author.
pub fn search_posts(response: SearchResponse) -> Vec<Post> {
    response
        .statuses
        .into_iter()
        .filter_map(|status| {
            let id = status.id_str.clone();
            let post = status.into_post();
            if post.is_none() {
                tracing::debug!(id = %id, "Skipping status without an author");
            }
            post
        })
        .collect()
}

/// Builds an [`ApiError::Platform`] from a non-success response body.
pub fn platform_error(status: u16, body: &str) -> ApiError {
    let first = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|r| r.errors.into_iter().next());
    match first {
        Some(entry) => ApiError::Platform {
            status,
            code: entry.code,
            message: entry.message,
        },
        None => ApiError::Platform {
            status,
            code: None,
            message: if body.trim().is_empty() {
                "empty response".to_string()
            } else {
                body.trim().to_string()
            },
        },
    }
}
