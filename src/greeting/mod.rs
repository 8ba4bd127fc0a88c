//! Greeting selection
//!
//! Picks the widget's first message from the visitor's name and the
//! relation stored for them in the people backend.

use crate::backend::PeopleDirectory;
use crate::config::GreetingSettings;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A visitor name split into first name and the remainder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub first: String,
    pub last: String,
}

impl PersonName {
    /// Parse a free-form full name.
    ///
    /// Whitespace runs collapse to single spaces; the first token is the
    /// first name, everything after it the last name.
    pub fn parse(full: &str) -> Self {
        let mut tokens = full.split_whitespace();
        let first = tokens.next().unwrap_or_default().to_string();
        let last = tokens.collect::<Vec<_>>().join(" ");
        Self { first, last }
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty() && self.last.is_empty()
    }

    pub fn full(&self) -> String {
        if self.last.is_empty() {
            self.first.clone()
        } else {
            format!("{} {}", self.first, self.last)
        }
    }
}

/// Chooses a greeting for a name and an optional relation
#[derive(Debug, Clone)]
pub struct GreetingSelector {
    settings: GreetingSettings,
}

impl GreetingSelector {
    pub fn new(settings: GreetingSettings) -> Self {
        Self { settings }
    }

    /// Default greeting: prefix followed by the first name
    pub fn default_greeting(&self, name: &PersonName) -> String {
        let greeting = format!("{}{}", self.settings.default_prefix, name.first);
        if greeting.trim().is_empty() {
            "Hi".to_string()
        } else {
            greeting
        }
    }

    /// Pick a greeting. Known relations choose uniformly among their
    /// alternatives; anything else keeps the default.
    pub fn select<R: Rng + ?Sized>(
        &self,
        name: &PersonName,
        relation: Option<&str>,
        rng: &mut R,
    ) -> String {
        relation
            .map(|r| r.trim().to_lowercase())
            .and_then(|r| self.settings.alternatives.get(&r))
            .and_then(|choices| {
                let choices: Vec<&String> =
                    choices.iter().filter(|c| !c.trim().is_empty()).collect();
                choices.choose(rng).map(|c| c.to_string())
            })
            .unwrap_or_else(|| self.default_greeting(name))
    }

    /// Look up the relation for a raw name and pick a greeting.
    ///
    /// Never fails: lookup errors fall back to the default greeting.
    pub async fn greet(&self, directory: &dyn PeopleDirectory, raw_name: &str) -> String {
        let name = PersonName::parse(raw_name);
        let relation = if name.is_empty() {
            None
        } else {
            directory.relation(&name).await
        };
        self.select(&name, relation.as_deref(), &mut rand::thread_rng())
    }
}

impl Default for GreetingSelector {
    fn default() -> Self {
        Self::new(GreetingSettings::default())
    }
}
