//! Search aggregation module
//!
//! Issues one backend search per topic, deduplicates the candidates
//! across topics and reports what happened to each topic.

mod executor;
mod models;

pub use executor::{Aggregation, QueryAggregator};
pub use models::*;
