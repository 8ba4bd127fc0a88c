//! Widget view-model
//!
//! Holds what the page used to keep in globals: the visitor name feeding the
//! widget's `dynamic-variables` attribute and the computed first message
//! feeding `override-first-message`. A session is built per request.

use crate::config::WidgetSettings;
use crate::tools::{GreetingTool, ToolInfo, ToolRegistry};
use serde::Serialize;
use serde_json::json;

/// Attribute values for the widget element
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WidgetAttributes {
    pub agent_id: String,
    pub variant: String,
    /// JSON string, e.g. `{"name_lastname":"Anna Smith"}`
    pub dynamic_variables: String,
    pub override_first_message: String,
}

/// Configuration handed to the widget when a call starts
#[derive(Debug, Clone, Serialize)]
pub struct CallConfig {
    pub attributes: WidgetAttributes,
    pub client_tools: Vec<ToolInfo>,
}

/// Per-visitor widget state
#[derive(Debug, Clone)]
pub struct WidgetSession {
    settings: WidgetSettings,
    name: String,
    first_message: String,
}

impl WidgetSession {
    pub fn new(settings: WidgetSettings) -> Self {
        Self {
            settings,
            name: String::new(),
            first_message: String::new(),
        }
    }

    /// Update the raw visitor name as typed
    pub fn set_name(&mut self, raw: impl Into<String>) {
        self.name = raw.into();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_first_message(&mut self, message: impl Into<String>) {
        self.first_message = message.into();
    }

    pub fn first_message(&self) -> &str {
        &self.first_message
    }

    pub fn settings(&self) -> &WidgetSettings {
        &self.settings
    }

    /// `dynamic-variables` attribute value
    pub fn dynamic_variables(&self) -> String {
        json!({ "name_lastname": self.name }).to_string()
    }

    pub fn attributes(&self) -> WidgetAttributes {
        WidgetAttributes {
            agent_id: self.settings.agent_id.clone(),
            variant: self.settings.variant.clone(),
            dynamic_variables: self.dynamic_variables(),
            override_first_message: self.first_message.clone(),
        }
    }

    /// Refresh the greeting for the current name
    pub async fn refresh_greeting(&mut self, greeter: &GreetingTool) {
        let greeting = greeter.greet(&self.name).await;
        self.first_message = greeting;
    }

    /// Call-start hook: refresh attributes just in time and attach the
    /// client tools.
    pub async fn start_call(&mut self, greeter: &GreetingTool, tools: &ToolRegistry) -> CallConfig {
        self.refresh_greeting(greeter).await;
        CallConfig {
            attributes: self.attributes(),
            client_tools: tools.list(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, PeopleDirectory, PersonRecord};
    use crate::greeting::{GreetingSelector, PersonName};
    use crate::person::PersonUpdate;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Offline;

    #[async_trait]
    impl PeopleDirectory for Offline {
        async fn lookup(&self, _name: &PersonName) -> Result<PersonRecord, BackendError> {
            Err(BackendError::Network("offline".to_string()))
        }

        async fn update(&self, _update: &PersonUpdate) -> Result<serde_json::Value, BackendError> {
            Err(BackendError::Network("offline".to_string()))
        }
    }

    #[test]
    fn test_dynamic_variables_escape_name() {
        let mut session = WidgetSession::new(WidgetSettings::default());
        session.set_name(r#"Anna "Nan" Smith"#);

        let parsed: serde_json::Value = serde_json::from_str(&session.dynamic_variables()).unwrap();
        assert_eq!(parsed["name_lastname"], r#"Anna "Nan" Smith"#);
    }

    #[test]
    fn test_first_message_starts_empty() {
        let session = WidgetSession::new(WidgetSettings::default());
        assert_eq!(session.attributes().override_first_message, "");
        assert_eq!(session.attributes().variant, "full");
    }

    #[tokio::test]
    async fn test_start_call_refreshes_greeting() {
        let greeter = GreetingTool::new(Arc::new(Offline), GreetingSelector::default());
        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(GreetingTool::new(
            Arc::new(Offline),
            GreetingSelector::default(),
        )));

        let mut session = WidgetSession::new(WidgetSettings::default());
        session.set_name("Anna Smith");
        let config = session.start_call(&greeter, &tools).await;

        assert_eq!(config.attributes.override_first_message, "Hi, Anna");
        assert_eq!(config.client_tools.len(), 1);
        assert_eq!(session.first_message(), "Hi, Anna");
    }
}
