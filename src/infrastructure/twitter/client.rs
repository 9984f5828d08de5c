//! # Twitter Client
//!
//! Implements `SocialApi` over the v1.1 REST endpoints with OAuth 1.0a user-context signing.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use std::sync::Arc;
use std::time::Duration;

use super::oauth::{self, SignatureInput};
use super::types::{SearchResponse, Status, platform_error, search_posts};
use crate::domain::config::Credentials;
use crate::domain::error::ApiError;
use crate::domain::traits::{ApiFactory, SocialApi};
use crate::domain::types::{Post, PostId};

pub const DEFAULT_BASE_URL: &str = "https://api.twitter.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Builds [`TwitterClient`]s from credentials.
#[derive(Debug, Clone)]
pub struct TwitterFactory {
    base_url: String,
}

impl TwitterFactory {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for TwitterFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ApiFactory for TwitterFactory {
    fn connect(&self, credentials: &Credentials) -> Result<Arc<dyn SocialApi>, ApiError> {
        Ok(Arc::new(TwitterClient::new(
            &self.base_url,
            credentials.clone(),
        )?))
    }
}

pub struct TwitterClient {
    http: Client,
    base_url: String,
    credentials: Credentials,
}

impl TwitterClient {
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.to_string(),
            credentials,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/1.1/{}", self.base_url, path)
    }

    fn authorization(&self, method: &str, url: &str, params: &[(&str, String)]) -> String {
        let nonce = oauth::nonce();
        oauth::authorization_header(
            &self.credentials,
            &SignatureInput {
                method,
                url,
                params,
                nonce: &nonce,
                timestamp: chrono::Utc::now().timestamp(),
            },
        )
    }

    /// Returns the body of a successful response, or the platform's error.
    async fn read_body(response: reqwest::Response) -> Result<String, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("failed to read response: {e}")))?;
        if !status.is_success() {
            return Err(platform_error(status.as_u16(), &body));
        }
        Ok(body)
    }
}

fn search_params(term: &str, count: u32, since: Option<&PostId>) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("q", term.to_string()),
        ("count", count.to_string()),
        ("result_type", "recent".to_string()),
    ];
    if let Some(since) = since {
        params.push(("since_id", since.to_string()));
    }
    params
}

#[async_trait]
impl SocialApi for TwitterClient {
    async fn search(
        &self,
        term: &str,
        count: u32,
        since: Option<&PostId>,
    ) -> Result<Vec<Post>, ApiError> {
        let url = self.endpoint("search/tweets.json");
        let params = search_params(term, count, since);
        let auth = self.authorization("GET", &url, &params);

        let response = self
            .http
            .get(format!("{}?{}", url, oauth::encode_pairs(&params)))
            .header(AUTHORIZATION, auth)
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("search request failed: {e}")))?;

        let body = Self::read_body(response).await?;
        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(search_posts(parsed))
    }

    async fn post_reply(&self, text: &str, in_reply_to: &PostId) -> Result<PostId, ApiError> {
        let url = self.endpoint("statuses/update.json");
        let params = vec![
            ("status", text.to_string()),
            ("in_reply_to_status_id", in_reply_to.to_string()),
        ];
        let auth = self.authorization("POST", &url, &params);

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, auth)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(oauth::encode_pairs(&params))
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("reply request failed: {e}")))?;

        let body = Self::read_body(response).await?;
        let status: Status =
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(status.post_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params() {
        let params = search_params("widget", 50, None);
        assert_eq!(
            oauth::encode_pairs(&params),
            "q=widget&count=50&result_type=recent"
        );

        let since = PostId::from(102);
        let params = search_params("#big widget", 50, Some(&since));
        assert_eq!(
            oauth::encode_pairs(&params),
            "q=%23big%20widget&count=50&result_type=recent&since_id=102"
        );
    }

    #[test]
    fn test_endpoint_and_trailing_slash() {
        let factory = TwitterFactory::with_base_url("http://localhost:8080/");
        let client = TwitterClient::new(
            &factory.base_url,
            Credentials::new("ck", "cs", "ak", "as"),
        )
        .unwrap();
        assert_eq!(
            client.endpoint("search/tweets.json"),
            "http://localhost:8080/1.1/search/tweets.json"
        );
    }

    #[test]
    fn test_authorization_header_shape() {
        let client = TwitterClient::new(DEFAULT_BASE_URL, Credentials::new("ck", "cs", "ak", "as"))
            .unwrap();
        let url = client.endpoint("statuses/update.json");
        let header = client.authorization("POST", &url, &[("status", "hi".to_string())]);
        assert!(header.starts_with("OAuth "));
        assert!(header.contains("oauth_consumer_key=\"ck\""));
        assert!(header.contains("oauth_token=\"ak\""));
        assert!(header.contains("oauth_signature=\""));
    }

    #[test]
    fn test_factory_connects() {
        let factory = TwitterFactory::default();
        assert!(factory.connect(&Credentials::new("ck", "cs", "ak", "as")).is_ok());
    }
}
