//! Chosen-set container for deduplicating images across topics

use crate::search::SearchResult;
use std::collections::HashSet;

/// Number of ranked candidates inspected per topic
pub const CANDIDATE_WINDOW: usize = 2;

/// Aggregation state for a single invocation.
///
/// Holds the IDs already chosen and the chosen results in topic order.
/// Never shared across invocations.
#[derive(Debug, Clone, Default)]
pub struct ChosenSet {
    ids: HashSet<String>,
    chosen: Vec<SearchResult>,
}

impl ChosenSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Pick the first not-yet-chosen candidate among the top ranked ones.
    ///
    /// Returns the claimed result, or `None` when every candidate in the
    /// window was already taken by an earlier topic.
    pub fn claim(&mut self, candidates: &[SearchResult]) -> Option<SearchResult> {
        let pick = candidates
            .iter()
            .take(CANDIDATE_WINDOW)
            .find(|candidate| !self.ids.contains(&candidate.id))?
            .clone();

        self.ids.insert(pick.id.clone());
        self.chosen.push(pick.clone());
        Some(pick)
    }

    /// Whether an ID was already chosen
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Chosen results in topic order
    pub fn chosen(&self) -> &[SearchResult] {
        &self.chosen
    }

    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }

    /// Consume the set, returning the chosen results
    pub fn into_chosen(self) -> Vec<SearchResult> {
        self.chosen
    }
}
