//! HTTP client for talking to the image-search backend

use crate::config::OutgoingSettings;
use anyhow::Result;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;

/// Raw response from a backend request
#[derive(Debug)]
pub struct BackendResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers (lowercase names)
    pub headers: HashMap<String, String>,
    /// Response body as text
    pub text: String,
    /// Response URL (after redirects)
    pub url: String,
}

impl BackendResponse {
    /// Parse response as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.text)
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Check if the server labelled the body as JSON
    pub fn is_json(&self) -> bool {
        self.headers
            .get("content-type")
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false)
    }
}

/// HTTP client wrapper configured from the outgoing settings
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;
        let user_agent = settings
            .user_agent
            .clone()
            .unwrap_or_else(|| format!("topic-gallery/{}", crate::VERSION));

        Ok(Self { client, user_agent })
    }

    /// POST a JSON body
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<BackendResponse> {
        let request = self.client.post(url).json(body);
        self.send(request).await
    }

    /// GET with query parameters
    pub async fn get_with_params(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<BackendResponse> {
        let request = self.client.get(url).query(params);
        self.send(request).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<BackendResponse> {
        let response = request
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Parse response into BackendResponse
    async fn parse_response(response: Response) -> Result<BackendResponse> {
        let status = response.status().as_u16();
        let url = response.url().to_string();

        let mut headers = HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(key.as_str().to_ascii_lowercase(), v.to_string());
            }
        }

        let text = response.text().await?;

        Ok(BackendResponse {
            status,
            headers,
            text,
            url,
        })
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new().unwrap();
        assert!(client.user_agent().starts_with("topic-gallery/"));
    }

    #[test]
    fn test_json_content_type_detection() {
        let mut headers = HashMap::new();
        headers.insert(
            "content-type".to_string(),
            "application/json; charset=utf-8".to_string(),
        );
        let response = BackendResponse {
            status: 404,
            headers,
            text: "{}".to_string(),
            url: "http://localhost/get_info".to_string(),
        };
        assert!(response.is_json());
        assert!(!response.is_success());
    }
}
