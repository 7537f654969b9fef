//! Distribution feed client

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use crate::{Error, Result};

const USER_AGENT: &str = concat!("aurci-meta/", env!("CARGO_PKG_VERSION"));

/// Blocking HTTP client for the distribution feed
pub struct FeedClient {
    client: reqwest::blocking::Client,
    github_token: Option<String>,
}

impl FeedClient {
    pub fn new(github_token: Option<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            github_token,
        })
    }

    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.github_token {
            if let Ok(value) = HeaderValue::from_str(&format!("token {}", token)) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }

    /// Fetch the feed document as text
    pub fn fetch(&self, url: &str) -> Result<String> {
        let unavailable = |reason: String| Error::FeedUnavailable {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .headers(self.build_headers())
            .send()
            .map_err(|e| unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(unavailable(format!("HTTP {}", response.status())));
        }

        response.text().map_err(|e| unavailable(e.to_string()))
    }
}
