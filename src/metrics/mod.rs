//! Metrics collection module
//!
//! Tracks tool invocations, per-topic outcomes and backend latency.

use crate::results::{TopicError, TopicOutcome};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

/// Number of latency samples kept for the rolling average
const LATENCY_WINDOW: usize = 100;

/// In-process metrics collector
pub struct Metrics {
    /// Aggregator invocations
    invocations: AtomicU64,
    /// Topics sent to the backend
    topics_attempted: AtomicU64,
    /// Outcome counts keyed by outcome label
    outcomes: RwLock<HashMap<&'static str, u64>>,
    /// Recent backend round trips in ms
    response_times: RwLock<VecDeque<u64>>,
}

impl Metrics {
    /// Create a new metrics instance
    pub fn new() -> Self {
        Self {
            invocations: AtomicU64::new(0),
            topics_attempted: AtomicU64::new(0),
            outcomes: RwLock::new(HashMap::new()),
            response_times: RwLock::new(VecDeque::with_capacity(LATENCY_WINDOW)),
        }
    }

    /// Increment invocation count
    pub fn inc_invocation(&self) {
        self.invocations.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the outcome and latency of one topic
    pub fn record_outcome(&self, outcome: &TopicOutcome, time_ms: u64) {
        self.topics_attempted.fetch_add(1, Ordering::Relaxed);

        let label = outcome_label(outcome);
        let mut outcomes = self.outcomes.write().unwrap_or_else(|e| e.into_inner());
        *outcomes.entry(label).or_insert(0) += 1;
        drop(outcomes);

        let mut times = self
            .response_times
            .write()
            .unwrap_or_else(|e| e.into_inner());
        if times.len() >= LATENCY_WINDOW {
            times.pop_front();
        }
        times.push_back(time_ms);
    }

    pub fn get_total_invocations(&self) -> u64 {
        self.invocations.load(Ordering::Relaxed)
    }

    pub fn get_topics_attempted(&self) -> u64 {
        self.topics_attempted.load(Ordering::Relaxed)
    }

    /// Count for one outcome label
    pub fn get_outcome_count(&self, label: &str) -> u64 {
        let outcomes = self.outcomes.read().unwrap_or_else(|e| e.into_inner());
        outcomes.get(label).copied().unwrap_or(0)
    }

    /// Average backend response time
    pub fn get_avg_response_time(&self) -> Option<u64> {
        let times = self.response_times.read().unwrap_or_else(|e| e.into_inner());
        if times.is_empty() {
            None
        } else {
            Some(times.iter().sum::<u64>() / times.len() as u64)
        }
    }

    /// Percentage of topics that produced an image
    pub fn get_hit_rate(&self) -> f64 {
        let attempted = self.get_topics_attempted();
        if attempted == 0 {
            0.0
        } else {
            (self.get_outcome_count("chosen") as f64 / attempted as f64) * 100.0
        }
    }

    /// Snapshot for the stats endpoint
    pub fn snapshot(&self) -> MetricsSnapshot {
        let outcomes = self
            .outcomes
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect();

        MetricsSnapshot {
            invocations: self.get_total_invocations(),
            topics_attempted: self.get_topics_attempted(),
            outcomes,
            avg_response_time_ms: self.get_avg_response_time(),
            hit_rate: self.get_hit_rate(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

fn outcome_label(outcome: &TopicOutcome) -> &'static str {
    match outcome {
        TopicOutcome::Chosen { .. } => "chosen",
        TopicOutcome::AlreadyShown => "already_shown",
        TopicOutcome::Failed { error } => match error {
            TopicError::NetworkFailure(_) => "network_failure",
            TopicError::MalformedResponse(_) => "malformed_response",
            TopicError::ApplicationError(_) => "application_error",
            TopicError::EmptyResult => "empty_result",
        },
    }
}

/// Serializable view of the collected metrics
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub invocations: u64,
    pub topics_attempted: u64,
    pub outcomes: HashMap<String, u64>,
    pub avg_response_time_ms: Option<u64>,
    pub hit_rate: f64,
}
