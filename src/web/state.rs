//! Application state shared across handlers

use crate::backend::{HttpPeopleDirectory, HttpSearchBackend, PeopleDirectory, SearchBackend};
use crate::config::Settings;
use crate::greeting::GreetingSelector;
use crate::metrics::Metrics;
use crate::network::HttpClient;
use crate::search::QueryAggregator;
use crate::tools::{GreetingTool, ShowImageTool, ToolRegistry};
use crate::widget::WidgetSession;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Client tools exposed to the widget
    pub tools: Arc<ToolRegistry>,
    /// Image tool, also used by the gallery page
    pub show_image: Arc<ShowImageTool>,
    /// Greeting tool, also used at call start
    pub greeter: Arc<GreetingTool>,
    /// People lookup
    pub people: Arc<dyn PeopleDirectory>,
    /// Metrics collector
    pub metrics: Arc<Metrics>,
    /// Template renderer
    pub templates: Arc<super::Templates>,
}

impl AppState {
    /// Create state talking to the configured HTTP backend
    pub fn new(settings: Settings, client: HttpClient) -> anyhow::Result<Self> {
        let search = Arc::new(HttpSearchBackend::from_settings(
            client.clone(),
            &settings.backend,
        )?);
        let people = Arc::new(HttpPeopleDirectory::from_settings(client, &settings.backend)?);
        Self::with_backends(settings, search, people)
    }

    /// Create state around arbitrary backend implementations
    pub fn with_backends(
        settings: Settings,
        search: Arc<dyn SearchBackend>,
        people: Arc<dyn PeopleDirectory>,
    ) -> anyhow::Result<Self> {
        let metrics = Arc::new(Metrics::new());
        let aggregator = Arc::new(
            QueryAggregator::new(search)
                .with_top_k(settings.search.top_k)
                .with_metrics(metrics.clone()),
        );

        let show_image = Arc::new(ShowImageTool::new(
            aggregator,
            settings.search.default_topic.clone(),
        ));
        let greeter = Arc::new(GreetingTool::new(
            people.clone(),
            GreetingSelector::new(settings.greeting.clone()),
        ));

        let mut tools = ToolRegistry::new();
        tools.register(show_image.clone());
        tools.register(greeter.clone());

        let templates = Arc::new(super::Templates::new()?);

        Ok(Self {
            settings: Arc::new(settings),
            tools: Arc::new(tools),
            show_image,
            greeter,
            people,
            metrics,
            templates,
        })
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }

    /// Fresh widget session for one visitor
    pub fn widget_session(&self, name: &str) -> WidgetSession {
        let mut session = WidgetSession::new(self.settings.widget.clone());
        session.set_name(name);
        session
    }
}
