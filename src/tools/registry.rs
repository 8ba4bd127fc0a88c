//! Tool registry for dispatching client tool calls

use super::traits::{ClientTool, ToolInfo};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Registry of the client tools exposed to the widget
pub struct ToolRegistry {
    tools: Vec<Arc<dyn ClientTool>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Arc<dyn ClientTool>) {
        let name = tool.info().name;
        self.tools.retain(|t| t.info().name != name);
        self.tools.push(tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ClientTool>> {
        self.tools.iter().find(|t| t.info().name == name)
    }

    /// Invoke a tool by name; `None` when no such tool exists
    pub async fn invoke(&self, name: &str, args: Value) -> Option<Value> {
        let tool = self.get(name)?;
        info!("Invoking client tool {}", name);
        Some(tool.call(args).await)
    }

    /// Get list of all tools with their info
    pub fn list(&self) -> Vec<ToolInfo> {
        self.tools.iter().map(|t| t.info()).collect()
    }

    /// Names of all registered tools
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.info().name).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
