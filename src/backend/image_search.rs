//! HTTP implementation of the image search capability

use super::traits::{BackendError, SearchBackend};
use crate::config::BackendSettings;
use crate::network::HttpClient;
use crate::search::{SearchRequest, SearchResponse};
use async_trait::async_trait;
use tracing::debug;

/// Image search over `POST <backend>/search`
pub struct HttpSearchBackend {
    client: HttpClient,
    url: String,
}

impl HttpSearchBackend {
    pub fn new(client: HttpClient, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Build from backend settings
    pub fn from_settings(client: HttpClient, settings: &BackendSettings) -> anyhow::Result<Self> {
        Ok(Self::new(client, settings.search_url()?.to_string()))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl SearchBackend for HttpSearchBackend {
    async fn search(&self, prompt: &str, top_k: u32) -> Result<SearchResponse, BackendError> {
        let request = SearchRequest::new(prompt, top_k);

        let response = self
            .client
            .post_json(&self.url, &request)
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        debug!(
            "Search '{}' answered {} ({} bytes)",
            prompt,
            response.status,
            response.text.len()
        );

        // Error bodies arrive with 4xx/5xx statuses, so decode regardless.
        response.json::<SearchResponse>().map_err(|e| {
            if response.is_success() {
                BackendError::Malformed(e.to_string())
            } else {
                BackendError::Malformed(format!("HTTP {}: {}", response.status, e))
            }
        })
    }
}
