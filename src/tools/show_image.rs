//! `ShowImage` client tool

use super::traits::{ClientTool, ToolInfo};
use crate::query::{ToolArgs, TopicList};
use crate::results::ChosenImage;
use crate::search::{Aggregation, QueryAggregator};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Name the agent invokes the tool by
pub const SHOW_IMAGE: &str = "ShowImage";

/// Structured answer returned to the agent
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ShowImageOutput {
    pub results: Vec<ChosenImage>,
    pub descriptions: Vec<String>,
}

impl From<&Aggregation> for ShowImageOutput {
    fn from(aggregation: &Aggregation) -> Self {
        Self {
            results: aggregation.summaries(),
            descriptions: aggregation.descriptions.clone(),
        }
    }
}

/// Shows one fresh image per requested topic
pub struct ShowImageTool {
    aggregator: Arc<QueryAggregator>,
    default_topic: String,
}

impl ShowImageTool {
    pub fn new(aggregator: Arc<QueryAggregator>, default_topic: impl Into<String>) -> Self {
        Self {
            aggregator,
            default_topic: default_topic.into(),
        }
    }

    /// Normalize arguments and run the aggregation
    pub async fn run(&self, args: &ToolArgs) -> Aggregation {
        let topics = TopicList::from_args(args, &self.default_topic);
        self.aggregator.aggregate(&topics).await
    }
}

#[async_trait]
impl ClientTool for ShowImageTool {
    fn info(&self) -> ToolInfo {
        ToolInfo {
            name: SHOW_IMAGE.to_string(),
            description: "Show the best matching image for one or more topics".to_string(),
        }
    }

    async fn call(&self, args: Value) -> Value {
        let aggregation = self.run(&ToolArgs::from_value(args)).await;
        serde_json::to_value(ShowImageOutput::from(&aggregation))
            .unwrap_or_else(|_| serde_json::json!({ "results": [], "descriptions": [] }))
    }
}
