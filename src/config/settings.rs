//! Settings structures for topic-gallery configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use url::Url;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub backend: BackendSettings,
    pub search: SearchSettings,
    pub greeting: GreetingSettings,
    pub widget: WidgetSettings,
    pub outgoing: OutgoingSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from a YAML document
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (TOPIC_GALLERY_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    /// Merge overrides from an arbitrary lookup
    pub fn merge_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("TOPIC_GALLERY_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Some(val) = lookup("TOPIC_GALLERY_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("TOPIC_GALLERY_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = lookup("TOPIC_GALLERY_BACKEND_URL") {
            self.backend.base_url = val;
        }
        if let Some(val) = lookup("TOPIC_GALLERY_DEFAULT_TOPIC") {
            if !val.trim().is_empty() {
                self.search.default_topic = val.trim().to_string();
            }
        }
        if let Some(val) = lookup("TOPIC_GALLERY_AGENT_ID") {
            self.widget.agent_id = val;
        }
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name displayed in the page title
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "Topic Gallery".to_string(),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Location of the image-search and people backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Base URL every backend path is resolved against
    pub base_url: String,
    /// Image search endpoint (POST)
    pub search_path: String,
    /// People lookup endpoint (GET)
    pub info_path: String,
    /// People record create/update endpoint (POST)
    pub update_path: String,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            search_path: "/search".to_string(),
            info_path: "/get_info".to_string(),
            update_path: "/set_info".to_string(),
        }
    }
}

impl BackendSettings {
    /// Absolute URL of the search endpoint
    pub fn search_url(&self) -> Result<Url> {
        self.join(&self.search_path)
    }

    /// Absolute URL of the people lookup endpoint
    pub fn info_url(&self) -> Result<Url> {
        self.join(&self.info_path)
    }

    /// Absolute URL of the people update endpoint
    pub fn update_url(&self) -> Result<Url> {
        self.join(&self.update_path)
    }

    /// Resolve an image path returned by the backend.
    ///
    /// Absolute URLs pass through untouched; relative paths such as
    /// `/data/images/cat.jpg` are resolved against `base_url`.
    pub fn resolve_asset(&self, path: &str) -> String {
        if Url::parse(path).is_ok() {
            return path.to_string();
        }
        match self.join(path) {
            Ok(url) => url.to_string(),
            Err(_) => path.to_string(),
        }
    }

    fn join(&self, path: &str) -> Result<Url> {
        let base = Url::parse(&self.base_url)?;
        Ok(base.join(path)?)
    }
}

/// Search behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Candidates requested per topic
    pub top_k: u32,
    /// Topic used when a tool call carries no usable topic
    pub default_topic: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            top_k: crate::DEFAULT_TOP_K,
            default_topic: crate::DEFAULT_TOPIC.to_string(),
        }
    }
}

/// Greeting (first message) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GreetingSettings {
    /// Prefix placed before the first name
    pub default_prefix: String,
    /// Alternatives per relation, keyed by lowercase relation name
    pub alternatives: HashMap<String, Vec<String>>,
}

impl Default for GreetingSettings {
    fn default() -> Self {
        let mut alternatives = HashMap::new();
        alternatives.insert(
            "wife".to_string(),
            vec!["Hi honey".to_string(), "Hi, my love".to_string()],
        );
        alternatives.insert(
            "brother".to_string(),
            vec!["Hi Bro".to_string(), "Hi, Brother!".to_string()],
        );
        Self {
            default_prefix: "Hi, ".to_string(),
            alternatives,
        }
    }
}

/// Embedded conversational widget settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetSettings {
    /// Agent the widget connects to
    pub agent_id: String,
    /// Widget variant attribute
    pub variant: String,
    /// Corner the widget is pinned to
    pub position: String,
    /// Script that defines the widget element
    pub script_src: String,
    /// Custom element tag name
    pub element: String,
    /// Thumbnail edge length in pixels
    pub thumb_size: u32,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            agent_id: String::new(),
            variant: "full".to_string(),
            position: "bottom-right".to_string(),
            script_src: "https://unpkg.com/@elevenlabs/convai-widget-embed".to_string(),
            element: "elevenlabs-convai".to_string(),
            thumb_size: 140,
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Request timeout in seconds
    pub request_timeout: f64,
    /// Pool max idle connections per host
    pub pool_maxsize: usize,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// User agent sent with every request
    pub user_agent: Option<String>,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 10.0,
            pool_maxsize: 10,
            verify_ssl: true,
            user_agent: None,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.search.top_k, 2);
        assert_eq!(settings.search.default_topic, "London");
        assert!(!settings.general.debug);
        assert_eq!(settings.greeting.alternatives["wife"].len(), 2);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
backend:
  base_url: "https://images.example.org"
search:
  default_topic: "Paris"
"#;
        let settings = Settings::from_yaml(yaml).unwrap();
        assert_eq!(settings.backend.base_url, "https://images.example.org");
        assert_eq!(settings.backend.search_path, "/search");
        assert_eq!(settings.search.default_topic, "Paris");
        assert_eq!(settings.search.top_k, 2);
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = Settings::default();
        settings.merge_vars(|key| match key {
            "TOPIC_GALLERY_PORT" => Some("9000".to_string()),
            "TOPIC_GALLERY_DEFAULT_TOPIC" => Some("  Tokyo ".to_string()),
            "TOPIC_GALLERY_DEBUG" => Some("true".to_string()),
            _ => None,
        });
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.search.default_topic, "Tokyo");
        assert!(settings.general.debug);
    }

    #[test]
    fn test_backend_urls() {
        let backend = BackendSettings::default();
        assert_eq!(
            backend.search_url().unwrap().as_str(),
            "http://127.0.0.1:5000/search"
        );
        assert_eq!(
            backend.update_url().unwrap().as_str(),
            "http://127.0.0.1:5000/set_info"
        );
        assert_eq!(
            backend.resolve_asset("/data/images/cat.jpg"),
            "http://127.0.0.1:5000/data/images/cat.jpg"
        );
        assert_eq!(
            backend.resolve_asset("https://cdn.example.org/a.jpg"),
            "https://cdn.example.org/a.jpg"
        );
    }
}
