//! Client tool traits and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool information advertised to the widget
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolInfo {
    /// Name the agent calls the tool by
    pub name: String,
    /// Description
    pub description: String,
}

/// A tool the conversational agent can invoke on the page side
#[async_trait]
pub trait ClientTool: Send + Sync {
    /// Get tool info
    fn info(&self) -> ToolInfo;

    /// Run the tool. Always yields a structured value, even when the
    /// underlying work failed.
    async fn call(&self, args: Value) -> Value;
}
