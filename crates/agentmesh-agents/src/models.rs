//! Configuration models for agents, services, plugins and models
//!
//! These are the inputs to the entry factories. They are plain serde types so
//! hosts can load them from JSON or YAML alongside the rest of their settings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration for an agent entry
///
/// # Examples
///
/// ```ignore
/// use agentmesh_agents::AgentConfig;
///
/// let config = AgentConfig::new("Researcher")
///     .with_capability("web-search")
///     .with_capability("summarize");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentConfig {
    /// Agent identifier; generated by the factory when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Human-readable name
    pub name: String,
    /// Description of what the agent does
    #[serde(default)]
    pub description: String,
    /// Capabilities the agent declares
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Model loaded on initialization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelConfig>,
    /// Free-form settings
    #[serde(default)]
    pub settings: HashMap<String, serde_json::Value>,
}

impl AgentConfig {
    /// Create a config with the given name and nothing else set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set an explicit identifier
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a capability
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.push(capability.into());
        self
    }

    /// Attach a model configuration
    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = Some(model);
        self
    }
}

/// Configuration for the model an agent loads
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModelConfig {
    /// Provider name (e.g. "openai", "ollama")
    pub provider: String,
    /// Model name
    pub model: String,
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Maximum tokens per response
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ModelConfig {
    /// Create a model configuration
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
            temperature: None,
            max_tokens: None,
        }
    }
}

/// Configuration for a service entry
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServiceConfig {
    /// Service type; the registry key for services
    pub service_type: String,
    /// Human-readable name
    #[serde(default)]
    pub name: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Capabilities the service provides
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Free-form settings
    #[serde(default)]
    pub settings: HashMap<String, serde_json::Value>,
}

impl ServiceConfig {
    /// Create a service configuration
    pub fn new(service_type: impl Into<String>) -> Self {
        Self {
            service_type: service_type.into(),
            ..Default::default()
        }
    }

    /// Add a capability
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.push(capability.into());
        self
    }
}

/// Configuration for a plugin entry
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PluginConfig {
    /// Plugin name; the registry key for plugins
    pub name: String,
    /// Plugin version
    #[serde(default)]
    pub version: String,
    /// Description
    #[serde(default)]
    pub description: String,
    /// Capabilities the plugin provides
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Runtime service keys the plugin is allowed to call
    #[serde(default)]
    pub services: Vec<String>,
    /// Free-form settings
    #[serde(default)]
    pub settings: HashMap<String, serde_json::Value>,
}

impl PluginConfig {
    /// Create a plugin configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Add a capability
    pub fn with_capability(mut self, capability: impl Into<String>) -> Self {
        self.capabilities.push(capability.into());
        self
    }

    /// Grant access to a runtime service
    pub fn with_service(mut self, key: impl Into<String>) -> Self {
        self.services.push(key.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_config_builder() {
        let config = AgentConfig::new("Writer")
            .with_id("writer-1")
            .with_description("Writes things")
            .with_capability("write")
            .with_model(ModelConfig::new("ollama", "llama3"));

        assert_eq!(config.id.as_deref(), Some("writer-1"));
        assert_eq!(config.capabilities, vec!["write"]);
        assert_eq!(config.model.unwrap().model, "llama3");
    }

    #[test]
    fn test_agent_config_from_json_defaults() {
        let config: AgentConfig = serde_json::from_str(r#"{"name": "Minimal"}"#).unwrap();
        assert!(config.id.is_none());
        assert!(config.capabilities.is_empty());
        assert!(config.settings.is_empty());
    }

    #[test]
    fn test_plugin_config_yaml() {
        let yaml = "name: search\nversion: 1.0.0\ncapabilities: [web-search]\nservices: [ai]\n";
        let config: PluginConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.name, "search");
        assert_eq!(config.services, vec!["ai"]);
    }
}
