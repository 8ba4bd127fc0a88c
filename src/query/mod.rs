//! Topic normalization
//!
//! Tool calls arrive with loosely shaped arguments: any of `queries`,
//! `topics`, `descriptions` or `topic`, each either a list or a single
//! (possibly delimited) string. Everything is flattened here into a
//! [`TopicList`] before reaching the aggregator:
//! - lists: each element trimmed, empty elements dropped, no splitting
//! - strings: split on `;`, `|` or `,`, parts trimmed, empty parts dropped
//! - anything else is ignored

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

static TOPIC_DELIMITERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[;|,]").unwrap());

/// Arguments of an image tool call, in merge priority order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolArgs {
    pub queries: Option<Value>,
    pub topics: Option<Value>,
    pub descriptions: Option<Value>,
    pub topic: Option<Value>,
}

impl ToolArgs {
    /// Arguments carrying a single topic string
    pub fn topic(topic: impl Into<String>) -> Self {
        Self {
            topic: Some(Value::String(topic.into())),
            ..Default::default()
        }
    }

    /// Decode from a raw JSON object; anything unreadable counts as empty
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    fn fields(&self) -> [Option<&Value>; 4] {
        [
            self.queries.as_ref(),
            self.topics.as_ref(),
            self.descriptions.as_ref(),
            self.topic.as_ref(),
        ]
    }
}

/// Non-empty ordered list of trimmed, non-empty topics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicList(Vec<String>);

impl TopicList {
    /// Build from tool arguments, falling back to `default_topic`
    pub fn from_args(args: &ToolArgs, default_topic: &str) -> Self {
        let mut collected = Vec::new();
        for field in args.fields().into_iter().flatten() {
            collect_field(field, &mut collected);
        }
        Self::from_topics(collected, default_topic)
    }

    /// Build from explicit topics, dropping blanks and falling back to
    /// `default_topic` when nothing remains
    pub fn from_topics<I, S>(topics: I, default_topic: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let topics: Vec<String> = topics
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        if topics.is_empty() {
            let fallback = match default_topic.trim() {
                "" => crate::DEFAULT_TOPIC,
                topic => topic,
            };
            Self(vec![fallback.to_string()])
        } else {
            Self(topics)
        }
    }

    /// Split a single delimited string into topics
    pub fn parse(raw: &str, default_topic: &str) -> Self {
        let mut collected = Vec::new();
        split_delimited(raw, &mut collected);
        Self::from_topics(collected, default_topic)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a TopicList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn collect_field(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Array(items) => {
            for item in items {
                if let Some(text) = scalar_text(item) {
                    let text = text.trim();
                    if !text.is_empty() {
                        out.push(text.to_string());
                    }
                }
            }
        }
        other => {
            if let Some(text) = scalar_text(other) {
                split_delimited(&text, out);
            }
        }
    }
}

fn split_delimited(raw: &str, out: &mut Vec<String>) {
    out.extend(
        TOPIC_DELIMITERS
            .split(raw)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string),
    );
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
