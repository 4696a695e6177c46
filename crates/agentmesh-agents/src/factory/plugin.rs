//! Plugin factory and the plugin entry

use crate::entries::PluginEntry;
use crate::error::{AgentError, Result};
use crate::factory::ensure_valid;
use crate::models::PluginConfig;
use crate::runtime::{AgentRuntime, ServiceRequest, ServiceResponse};
use crate::validation::{validate_plugin_config, validate_plugin_entry};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Plugin entry granting access to a set of runtime services
pub struct PluginHandle {
    config: PluginConfig,
    capabilities: Vec<String>,
    runtime: Arc<dyn AgentRuntime>,
    initialized: AtomicBool,
}

impl PluginHandle {
    /// Replace the capability list
    pub fn with_capabilities(mut self, capabilities: Vec<String>) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Configuration the entry was built from
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }
}

#[async_trait]
impl PluginEntry for PluginHandle {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn version(&self) -> &str {
        &self.config.version
    }

    fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    async fn invoke(&self, service_key: &str, request: ServiceRequest) -> Result<ServiceResponse> {
        if !self.config.services.iter().any(|s| s == service_key) {
            return Err(AgentError::invalid_input(format!(
                "plugin '{}' has no access to service '{}'",
                self.config.name, service_key
            )));
        }

        let service = self
            .runtime
            .get_service(service_key)
            .ok_or_else(|| AgentError::service_unavailable(service_key))?;

        if !self.initialized.swap(true, Ordering::SeqCst) {
            debug!(plugin = %self.config.name, "Plugin initialized on first use");
        }
        service.request(request).await
    }
}

/// Factory for plugin entries
#[derive(Debug, Clone, Default)]
pub struct PluginFactory;

impl PluginFactory {
    /// Create a new plugin factory
    pub fn new() -> Self {
        Self
    }

    /// Validate the configuration, build the entry, then validate the built entry
    pub fn create(&self, config: PluginConfig, runtime: Arc<dyn AgentRuntime>) -> Result<PluginHandle> {
        ensure_valid("plugin", &validate_plugin_config(&config))?;

        let handle = PluginHandle {
            capabilities: config.capabilities.clone(),
            config,
            runtime,
            initialized: AtomicBool::new(false),
        };

        let built = validate_plugin_entry(&handle);
        if !built.is_valid {
            return Err(AgentError::configuration(format!(
                "constructed plugin entry is invalid: {}",
                built.error_message()
            )));
        }

        debug!(plugin = %handle.name(), version = %handle.version(), "Plugin entry created");
        Ok(handle)
    }

    /// Build a plugin entry whose capabilities were discovered at runtime
    pub fn create_with_capabilities(
        &self,
        config: PluginConfig,
        runtime: Arc<dyn AgentRuntime>,
        capabilities: Vec<String>,
    ) -> Result<PluginHandle> {
        Ok(self.create(config, runtime)?.with_capabilities(capabilities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{LocalRuntime, Service};

    struct StaticSearch;

    #[async_trait]
    impl Service for StaticSearch {
        fn service_type(&self) -> &str {
            "search"
        }

        async fn request(&self, _request: ServiceRequest) -> Result<ServiceResponse> {
            Ok(ServiceResponse::text("3 results"))
        }
    }

    fn runtime() -> Arc<LocalRuntime> {
        Arc::new(LocalRuntime::new("host").with_service("search", Arc::new(StaticSearch)))
    }

    #[test]
    fn test_create_plugin() {
        let plugin = PluginFactory::new()
            .create(
                PluginConfig::new("web").with_version("0.2.0").with_capability("web-search"),
                runtime(),
            )
            .unwrap();
        assert_eq!(plugin.name(), "web");
        assert_eq!(plugin.version(), "0.2.0");
        assert!(!plugin.is_initialized());
    }

    #[test]
    fn test_create_rejects_blank_name() {
        let result = PluginFactory::new().create(PluginConfig::new(" "), runtime());
        assert!(matches!(result, Err(AgentError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_invoke_granted_service() {
        let plugin = PluginFactory::new()
            .create(PluginConfig::new("web").with_service("search"), runtime())
            .unwrap();

        let response = plugin
            .invoke("search", ServiceRequest::new("query", serde_json::json!("rust")))
            .await
            .unwrap();
        assert_eq!(response.content, "3 results");
        assert!(plugin.is_initialized());
    }

    #[tokio::test]
    async fn test_invoke_ungranted_service() {
        let plugin = PluginFactory::new()
            .create(PluginConfig::new("web"), runtime())
            .unwrap();

        let err = plugin
            .invoke("search", ServiceRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::InvalidInput(_)));
        assert!(!plugin.is_initialized());
    }

    #[tokio::test]
    async fn test_invoke_granted_but_missing_service() {
        let plugin = PluginFactory::new()
            .create(PluginConfig::new("web").with_service("ai"), runtime())
            .unwrap();

        let err = plugin.invoke("ai", ServiceRequest::default()).await.unwrap_err();
        assert!(matches!(err, AgentError::ServiceUnavailable(_)));
    }
}
