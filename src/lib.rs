//! Topic Gallery: a client-tool bridge for conversational image requests
//!
//! A voice agent asks the page to show images for one or more topics. Each
//! topic is searched against an image backend, at most one fresh image is
//! kept per topic, and the chosen images are rendered as cards and reported
//! back to the agent.

pub mod backend;
pub mod config;
pub mod greeting;
pub mod metrics;
pub mod network;
pub mod person;
pub mod query;
pub mod results;
pub mod search;
pub mod tools;
pub mod web;
pub mod widget;

pub use config::Settings;
pub use query::{ToolArgs, TopicList};
pub use search::{Aggregation, QueryAggregator, SearchResponse, SearchResult};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Candidates requested per topic
pub const DEFAULT_TOP_K: u32 = 2;

/// Topic used when a tool call names none
pub const DEFAULT_TOPIC: &str = "London";
