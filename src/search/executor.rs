//! Multi-topic search aggregation

use super::models::SearchResponse;
use crate::backend::SearchBackend;
use crate::metrics::Metrics;
use crate::query::TopicList;
use crate::results::{ChosenImage, ChosenSet, TopicError, TopicOutcome, TopicReport};
use crate::search::SearchResult;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Result of one aggregation run
#[derive(Debug, Clone, Default, Serialize)]
pub struct Aggregation {
    /// Chosen results in topic order, unique by id
    pub chosen: Vec<SearchResult>,
    /// Description of each chosen result (empty when missing)
    pub descriptions: Vec<String>,
    /// One report per attempted topic
    pub reports: Vec<TopicReport>,
}

impl Aggregation {
    /// Summaries handed back to the agent
    pub fn summaries(&self) -> Vec<ChosenImage> {
        self.chosen.iter().map(ChosenImage::from).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }
}

/// Runs one search per topic and keeps at most one fresh image per topic
pub struct QueryAggregator {
    /// Injected search capability
    backend: Arc<dyn SearchBackend>,
    /// Candidates requested per topic
    top_k: u32,
    metrics: Option<Arc<Metrics>>,
}

impl QueryAggregator {
    /// Create an aggregator requesting the default number of candidates
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self {
            backend,
            top_k: crate::DEFAULT_TOP_K,
            metrics: None,
        }
    }

    /// Set the number of candidates requested per topic
    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// Record outcomes into a metrics collector
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn top_k(&self) -> u32 {
        self.top_k
    }

    /// Aggregate results for every topic.
    ///
    /// Topics run sequentially in the given order, so earlier topics claim
    /// a shared id first. Per-topic failures are recorded in the reports
    /// and never abort the batch.
    pub async fn aggregate(&self, topics: &TopicList) -> Aggregation {
        info!("Aggregating images for {} topic(s)", topics.len());
        if let Some(ref metrics) = self.metrics {
            metrics.inc_invocation();
        }

        let mut chosen = ChosenSet::new();
        let mut reports = Vec::with_capacity(topics.len());

        for topic in topics {
            let start = Instant::now();
            let response = self.backend.search(topic, self.top_k).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            let outcome = Self::select(&mut chosen, response);
            match &outcome {
                TopicOutcome::Chosen { result } => {
                    debug!("Topic '{}' -> image {} ({:.3})", topic, result.id, result.score);
                }
                TopicOutcome::AlreadyShown => {
                    debug!("Topic '{}' -> top results already shown", topic);
                }
                TopicOutcome::Failed { error } => {
                    warn!("Topic '{}' contributed nothing: {:?}", topic, error);
                }
            }

            if let Some(ref metrics) = self.metrics {
                metrics.record_outcome(&outcome, elapsed_ms);
            }

            reports.push(TopicReport {
                topic: topic.clone(),
                outcome,
                elapsed_ms,
            });
        }

        let chosen = chosen.into_chosen();
        let descriptions = chosen
            .iter()
            .map(|r| r.description.clone().unwrap_or_default())
            .collect();

        Aggregation {
            chosen,
            descriptions,
            reports,
        }
    }

    fn select(
        chosen: &mut ChosenSet,
        response: Result<SearchResponse, crate::backend::BackendError>,
    ) -> TopicOutcome {
        let candidates = match response {
            Err(e) => {
                return TopicOutcome::Failed {
                    error: TopicError::from(e),
                }
            }
            Ok(SearchResponse::Error(message)) => {
                return TopicOutcome::Failed {
                    error: TopicError::ApplicationError(message),
                }
            }
            Ok(SearchResponse::Results(results)) if results.is_empty() => {
                return TopicOutcome::Failed {
                    error: TopicError::EmptyResult,
                }
            }
            Ok(SearchResponse::Results(results)) => results,
        };

        match chosen.claim(&candidates) {
            Some(result) => TopicOutcome::Chosen { result },
            None => TopicOutcome::AlreadyShown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Backend answering from a fixed table and recording every call
    struct TableBackend {
        answers: HashMap<String, Result<SearchResponse, BackendError>>,
        calls: Mutex<Vec<(String, u32)>>,
    }

    impl TableBackend {
        fn new() -> Self {
            Self {
                answers: HashMap::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn answer(mut self, prompt: &str, answer: Result<SearchResponse, BackendError>) -> Self {
            self.answers.insert(prompt.to_string(), answer);
            self
        }

        fn calls(&self) -> Vec<(String, u32)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SearchBackend for TableBackend {
        async fn search(&self, prompt: &str, top_k: u32) -> Result<SearchResponse, BackendError> {
            self.calls.lock().unwrap().push((prompt.to_string(), top_k));
            self.answers
                .get(prompt)
                .cloned()
                .unwrap_or_else(|| Ok(SearchResponse::results(vec![])))
        }
    }

    fn hits(ids: &[(&str, f64)]) -> Result<SearchResponse, BackendError> {
        Ok(SearchResponse::results(
            ids.iter()
                .map(|(id, score)| SearchResult::new(*id, format!("/data/images/{}.jpg", id), *score))
                .collect(),
        ))
    }

    fn ids(aggregation: &Aggregation) -> Vec<&str> {
        aggregation.chosen.iter().map(|r| r.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_second_topic_falls_back_when_top_pick_taken() {
        let backend = Arc::new(
            TableBackend::new()
                .answer("beach sunset", hits(&[("a", 0.9), ("b", 0.8)]))
                .answer("city skyline", hits(&[("a", 0.95), ("c", 0.7)])),
        );
        let aggregator = QueryAggregator::new(backend.clone());

        let topics = TopicList::from_topics(["beach sunset", "city skyline"], "London");
        let aggregation = aggregator.aggregate(&topics).await;

        assert_eq!(ids(&aggregation), vec!["a", "c"]);
        assert_eq!(
            backend.calls(),
            vec![("beach sunset".to_string(), 2), ("city skyline".to_string(), 2)]
        );
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_batch() {
        let backend = Arc::new(
            TableBackend::new()
                .answer("down", Err(BackendError::Network("connection refused".to_string())))
                .answer("broken", Err(BackendError::Malformed("expected value".to_string())))
                .answer("rejected", Ok(SearchResponse::error("x")))
                .answer("dogs", hits(&[("d", 0.6)])),
        );
        let aggregator = QueryAggregator::new(backend.clone());

        let topics = TopicList::from_topics(["down", "broken", "rejected", "nothing", "dogs"], "London");
        let aggregation = aggregator.aggregate(&topics).await;

        assert_eq!(ids(&aggregation), vec!["d"]);
        assert_eq!(backend.calls().len(), 5);
        assert_eq!(aggregation.reports.len(), 5);
        assert_eq!(
            aggregation.reports[2].outcome,
            TopicOutcome::Failed {
                error: TopicError::ApplicationError("x".to_string())
            }
        );
        assert_eq!(
            aggregation.reports[3].outcome,
            TopicOutcome::Failed {
                error: TopicError::EmptyResult
            }
        );
    }

    #[tokio::test]
    async fn test_topic_contributes_nothing_when_both_taken() {
        let backend = Arc::new(
            TableBackend::new()
                .answer("one", hits(&[("a", 0.9)]))
                .answer("two", hits(&[("b", 0.9)]))
                .answer("three", hits(&[("a", 0.9), ("b", 0.8)])),
        );
        let aggregation = QueryAggregator::new(backend)
            .aggregate(&TopicList::from_topics(["one", "two", "three"], "London"))
            .await;

        assert_eq!(ids(&aggregation), vec!["a", "b"]);
        assert_eq!(aggregation.reports[2].outcome, TopicOutcome::AlreadyShown);
    }

    #[tokio::test]
    async fn test_chosen_is_bounded_and_unique() {
        let backend = Arc::new(
            TableBackend::new()
                .answer("t1", hits(&[("x", 0.9), ("y", 0.8)]))
                .answer("t2", hits(&[("x", 0.9), ("y", 0.8)]))
                .answer("t3", hits(&[("x", 0.9), ("y", 0.8)]))
                .answer("t4", hits(&[("y", 0.9), ("z", 0.8)])),
        );
        let topics = TopicList::from_topics(["t1", "t2", "t3", "t4"], "London");
        let aggregation = QueryAggregator::new(backend).aggregate(&topics).await;

        assert!(aggregation.chosen.len() <= topics.len());
        assert_eq!(ids(&aggregation), vec!["x", "y", "z"]);
    }

    #[tokio::test]
    async fn test_descriptions_follow_chosen() {
        let backend = Arc::new(TableBackend::new().answer(
            "harbor",
            Ok(SearchResponse::results(vec![
                SearchResult::new("h", "/data/images/h.jpg", 0.7).with_description("night harbor")
            ])),
        ));
        let aggregation = QueryAggregator::new(backend)
            .aggregate(&TopicList::from_topics(["harbor", "nothing"], "London"))
            .await;

        assert_eq!(aggregation.descriptions, vec!["night harbor"]);
        assert_eq!(aggregation.summaries()[0].description, "night harbor");
    }

    #[tokio::test]
    async fn test_top_k_and_metrics() {
        let backend = Arc::new(TableBackend::new().answer("a", hits(&[("a", 0.9)])));
        let metrics = Arc::new(Metrics::new());
        let aggregator = QueryAggregator::new(backend.clone())
            .with_top_k(0)
            .with_metrics(metrics.clone());

        aggregator
            .aggregate(&TopicList::from_topics(["a", "b"], "London"))
            .await;

        assert_eq!(backend.calls()[0].1, 1);
        assert_eq!(metrics.get_total_invocations(), 1);
        assert_eq!(metrics.get_topics_attempted(), 2);
    }
}
