//! `Greeting` client tool

use super::traits::{ClientTool, ToolInfo};
use crate::backend::PeopleDirectory;
use crate::greeting::GreetingSelector;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub const GREETING: &str = "Greeting";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GreetingArgs {
    name: String,
}

/// Computes the first message for a visitor
pub struct GreetingTool {
    directory: Arc<dyn PeopleDirectory>,
    selector: GreetingSelector,
}

impl GreetingTool {
    pub fn new(directory: Arc<dyn PeopleDirectory>, selector: GreetingSelector) -> Self {
        Self {
            directory,
            selector,
        }
    }

    pub async fn greet(&self, raw_name: &str) -> String {
        self.selector.greet(self.directory.as_ref(), raw_name).await
    }
}

#[async_trait]
impl ClientTool for GreetingTool {
    fn info(&self) -> ToolInfo {
        ToolInfo {
            name: GREETING.to_string(),
            description: "Greet the visitor by name".to_string(),
        }
    }

    async fn call(&self, args: Value) -> Value {
        let args: GreetingArgs = serde_json::from_value(args).unwrap_or_default();
        json!({ "greeting": self.greet(&args.name).await })
    }
}
