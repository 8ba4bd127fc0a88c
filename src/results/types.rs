//! Aggregation outcome types

use crate::search::SearchResult;
use serde::{Deserialize, Serialize};

/// Summary of a chosen image handed back to the agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChosenImage {
    pub id: String,
    pub path: String,
    pub score: f64,
    /// Empty when the backend supplied no description
    pub description: String,
}

impl From<&SearchResult> for ChosenImage {
    fn from(result: &SearchResult) -> Self {
        Self {
            id: result.id.clone(),
            path: result.path.clone(),
            score: result.score,
            description: result.description.clone().unwrap_or_default(),
        }
    }
}

/// Why a topic contributed nothing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum TopicError {
    /// The request never produced a response
    NetworkFailure(String),
    /// The response body was not a valid search response
    MalformedResponse(String),
    /// The backend answered with an `error` field
    ApplicationError(String),
    /// The backend answered with no candidates
    EmptyResult,
}

impl std::fmt::Display for TopicError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkFailure(detail) => write!(f, "Request failed: {}", detail),
            Self::MalformedResponse(detail) => {
                write!(f, "Request failed: malformed response ({})", detail)
            }
            Self::ApplicationError(message) => write!(f, "Error: {}", message),
            Self::EmptyResult => write!(f, "No similar images found."),
        }
    }
}

/// What happened to a single topic
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TopicOutcome {
    /// A fresh candidate was chosen
    Chosen { result: SearchResult },
    /// Both top candidates had already been chosen for earlier topics
    AlreadyShown,
    /// The topic failed; see the error kind
    Failed { error: TopicError },
}

impl TopicOutcome {
    /// Inline status line shown in place of a card
    pub fn status_message(&self) -> Option<String> {
        match self {
            Self::Chosen { .. } => None,
            Self::AlreadyShown => Some("No new image (top results already shown).".to_string()),
            Self::Failed {
                error: TopicError::ApplicationError(_),
            } => Some(TopicError::EmptyResult.to_string()),
            Self::Failed { error } => Some(error.to_string()),
        }
    }

    /// Second status line: the backend's own message for application errors
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::Failed {
                error: error @ TopicError::ApplicationError(_),
            } => Some(error.to_string()),
            _ => None,
        }
    }

    pub fn chosen(&self) -> Option<&SearchResult> {
        match self {
            Self::Chosen { result } => Some(result),
            _ => None,
        }
    }
}

/// Per-topic record of one aggregation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicReport {
    pub topic: String,
    pub outcome: TopicOutcome,
    /// Backend round trip in milliseconds
    pub elapsed_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages() {
        let messages: Vec<String> = [
            TopicOutcome::AlreadyShown,
            TopicOutcome::Failed {
                error: TopicError::EmptyResult,
            },
            TopicOutcome::Failed {
                error: TopicError::ApplicationError("prompt is required".to_string()),
            },
            TopicOutcome::Failed {
                error: TopicError::NetworkFailure("connection refused".to_string()),
            },
            TopicOutcome::Failed {
                error: TopicError::MalformedResponse("expected value".to_string()),
            },
        ]
        .iter()
        .filter_map(|o| o.status_message())
        .collect();

        assert_eq!(messages.len(), 5);
        assert_eq!(messages[1], "No similar images found.");
        assert_eq!(messages[2], "No similar images found.");
        assert!(messages[3].starts_with("Request failed:"));
    }

    #[test]
    fn test_application_error_has_detail_line() {
        let outcome = TopicOutcome::Failed {
            error: TopicError::ApplicationError("prompt is required".to_string()),
        };
        assert_eq!(outcome.status_message().as_deref(), Some("No similar images found."));
        assert_eq!(outcome.detail().as_deref(), Some("Error: prompt is required"));

        let empty = TopicOutcome::Failed {
            error: TopicError::EmptyResult,
        };
        assert_eq!(empty.detail(), None);
        assert_eq!(TopicOutcome::AlreadyShown.detail(), None);
    }

    #[test]
    fn test_chosen_image_defaults_description() {
        let result = SearchResult::new("a", "/data/images/a.jpg", 0.5);
        let chosen = ChosenImage::from(&result);
        assert_eq!(chosen.description, "");
    }
}
