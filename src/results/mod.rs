//! Aggregation state and outcome types
//!
//! The chosen set deduplicates images across the topics of one invocation;
//! the outcome types describe what happened to each topic.

mod container;
mod types;

pub use container::{ChosenSet, CANDIDATE_WINDOW};
pub use types::*;
