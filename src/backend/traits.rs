//! Backend capability traits and error types

use crate::greeting::PersonName;
use crate::person::PersonUpdate;
use crate::results::TopicError;
use crate::search::SearchResponse;
use async_trait::async_trait;
use serde_json::Value;

/// Failure talking to the backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The request could not be sent or the response could not be read
    #[error("network error: {0}")]
    Network(String),
    /// The body could not be decoded
    #[error("malformed response: {0}")]
    Malformed(String),
    /// The server answered with a non-success status
    #[error("HTTP {0}")]
    Status(u16),
    /// The server refused the request and said why
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// The endpoint URL could not be built
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl From<BackendError> for TopicError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Network(detail) => TopicError::NetworkFailure(detail),
            BackendError::Malformed(detail) => TopicError::MalformedResponse(detail),
            BackendError::Status(code) => TopicError::NetworkFailure(format!("HTTP {}", code)),
            BackendError::Rejected { message, .. } => TopicError::NetworkFailure(message),
            BackendError::InvalidEndpoint(detail) => TopicError::NetworkFailure(detail),
        }
    }
}

/// Image search capability injected into the aggregator
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Request at most `top_k` ranked candidates for a prompt
    async fn search(&self, prompt: &str, top_k: u32) -> Result<SearchResponse, BackendError>;
}

/// A person record as returned by the people lookup
#[derive(Debug, Clone, PartialEq)]
pub enum PersonRecord {
    /// JSON body
    Json(Value),
    /// Non-JSON body, kept verbatim
    Text(String),
}

impl PersonRecord {
    /// Lowercased `person.relation`, if present
    pub fn relation(&self) -> Option<String> {
        match self {
            Self::Json(value) => value
                .pointer("/person/relation")
                .and_then(Value::as_str)
                .map(|r| r.trim().to_lowercase()),
            Self::Text(_) => None,
        }
    }
}

/// People lookup capability used for greetings
#[async_trait]
pub trait PeopleDirectory: Send + Sync {
    /// Fetch the record for a name
    async fn lookup(&self, name: &PersonName) -> Result<PersonRecord, BackendError>;

    /// Create or update a record; returns the backend's JSON answer
    async fn update(&self, update: &PersonUpdate) -> Result<Value, BackendError>;

    /// Fetch only the relation; any failure reads as "unknown"
    async fn relation(&self, name: &PersonName) -> Option<String> {
        match self.lookup(name).await {
            Ok(record) => record.relation(),
            Err(e) => {
                tracing::debug!("Relation lookup for {:?} failed: {}", name.full(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_relation_extraction() {
        let record = PersonRecord::Json(json!({ "person": { "relation": "Wife", "age": 40 } }));
        assert_eq!(record.relation().as_deref(), Some("wife"));

        let missing = PersonRecord::Json(json!({ "person": { "relation": null } }));
        assert_eq!(missing.relation(), None);

        assert_eq!(PersonRecord::Text("<html>".to_string()).relation(), None);
    }

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            TopicError::from(BackendError::Malformed("eof".to_string())),
            TopicError::MalformedResponse("eof".to_string())
        );
        assert_eq!(
            TopicError::from(BackendError::Status(502)),
            TopicError::NetworkFailure("HTTP 502".to_string())
        );
        assert_eq!(
            TopicError::from(BackendError::Rejected {
                status: 400,
                message: "phone_number or names required".to_string()
            }),
            TopicError::NetworkFailure("phone_number or names required".to_string())
        );
    }
}
