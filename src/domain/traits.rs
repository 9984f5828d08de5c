//! # Domain Traits
//!
//! Abstract interfaces for the social platform.
//! Allows for pluggable implementations in the Infrastructure layer.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::config::Credentials;
use crate::domain::error::ApiError;
use crate::domain::types::{Post, PostId};

/// Abstract interface for a social platform client (e.g., Twitter)
#[async_trait]
pub trait SocialApi: Send + Sync {
    /// Search for posts matching `term`, newest first.
    ///
    /// `since` is an exclusive lower bound: only posts newer than it are returned.
    async fn search(
        &self,
        term: &str,
        count: u32,
        since: Option<&PostId>,
    ) -> Result<Vec<Post>, ApiError>;

    /// Publish `text` as a threaded reply to `in_reply_to`. Returns the id of the new post.
    async fn post_reply(&self, text: &str, in_reply_to: &PostId) -> Result<PostId, ApiError>;
}

/// Builds authenticated clients from credentials.
pub trait ApiFactory: Send + Sync {
    fn connect(&self, credentials: &Credentials) -> Result<Arc<dyn SocialApi>, ApiError>;
}
