//! Search request/response wire models

use serde::{Deserialize, Deserializer, Serialize};

/// Body of a `POST /search` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchRequest {
    /// Topic text
    pub prompt: String,
    /// Number of ranked candidates requested
    pub top_k: u32,
}

impl SearchRequest {
    pub fn new(prompt: impl Into<String>, top_k: u32) -> Self {
        Self {
            prompt: prompt.into(),
            top_k: top_k.max(1),
        }
    }
}

/// One ranked candidate returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// Opaque identifier
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    /// Resource locator (usually a backend-relative path)
    #[serde(default, deserialize_with = "path_or_empty")]
    pub path: String,
    /// Similarity score
    #[serde(default, deserialize_with = "score_or_zero")]
    pub score: f64,
    /// Short description of the image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SearchResult {
    pub fn new(id: impl Into<String>, path: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            path: path.into(),
            score,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Decoded backend answer for one topic
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResponse {
    /// The backend reported an application error
    Error(String),
    /// Candidates ranked best-first (possibly empty)
    Results(Vec<SearchResult>),
}

impl SearchResponse {
    pub fn results(results: Vec<SearchResult>) -> Self {
        Self::Results(results)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }
}

#[derive(Deserialize)]
struct RawSearchResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    results: Option<Vec<SearchResult>>,
}

impl<'de> Deserialize<'de> for SearchResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawSearchResponse::deserialize(deserializer)?;
        // An empty `error` string does not count as an error.
        Ok(match raw.error.filter(|e| !e.is_empty()) {
            Some(error) => SearchResponse::Error(error),
            None => SearchResponse::Results(raw.results.unwrap_or_default()),
        })
    }
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

/// The below-threshold fallback entry carries a numeric `path` of 0.
fn path_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string path, got {}",
            other
        ))),
    }
}

fn score_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_format() {
        let body = serde_json::to_value(SearchRequest::new("beach sunset", 2)).unwrap();
        assert_eq!(body, json!({ "prompt": "beach sunset", "top_k": 2 }));
    }

    #[test]
    fn test_request_top_k_floor() {
        assert_eq!(SearchRequest::new("x", 0).top_k, 1);
    }

    #[test]
    fn test_parse_results() {
        let response: SearchResponse = serde_json::from_value(json!({
            "results": [
                { "id": "a", "path": "/data/images/a.jpg", "score": 0.91, "description": "a pier" },
                { "id": "b", "path": "/data/images/b.jpg", "score": 0.42 }
            ]
        }))
        .unwrap();

        match response {
            SearchResponse::Results(results) => {
                assert_eq!(results.len(), 2);
                assert_eq!(results[0].description.as_deref(), Some("a pier"));
                assert_eq!(results[1].description, None);
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_body() {
        let response: SearchResponse =
            serde_json::from_value(json!({ "error": "prompt is required" })).unwrap();
        assert_eq!(response, SearchResponse::error("prompt is required"));
    }

    #[test]
    fn test_fallback_entry_with_numeric_id() {
        // The backend's "best below threshold" fallback starts from id 0.
        let response: SearchResponse = serde_json::from_value(json!({
            "results": [{ "id": 0, "path": "", "score": null }]
        }))
        .unwrap();
        assert_eq!(
            response,
            SearchResponse::results(vec![SearchResult::new("0", "", 0.0)])
        );
    }

    #[test]
    fn test_fallback_entry_with_numeric_path() {
        let response: SearchResponse = serde_json::from_value(json!({
            "results": [{ "id": 0, "path": 0, "score": -9999 }]
        }))
        .unwrap();
        assert_eq!(
            response,
            SearchResponse::results(vec![SearchResult::new("0", "0", -9999.0)])
        );

        let response: SearchResponse =
            serde_json::from_value(json!({ "results": [{ "id": "x", "path": null }] })).unwrap();
        assert_eq!(
            response,
            SearchResponse::results(vec![SearchResult::new("x", "", 0.0)])
        );
    }

    #[test]
    fn test_empty_error_falls_through_to_results() {
        let response: SearchResponse = serde_json::from_value(json!({
            "error": "",
            "results": [{ "id": "a", "path": "/data/images/a.jpg", "score": 0.5 }]
        }))
        .unwrap();
        assert_eq!(
            response,
            SearchResponse::results(vec![SearchResult::new("a", "/data/images/a.jpg", 0.5)])
        );

        let response: SearchResponse = serde_json::from_value(json!({ "error": "" })).unwrap();
        assert_eq!(response, SearchResponse::results(vec![]));
    }

    #[test]
    fn test_body_without_results_is_empty() {
        let response: SearchResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(response, SearchResponse::results(vec![]));
    }
}
