//! Service factory and the lazily initialized service entry

use crate::entries::ServiceEntry;
use crate::error::{AgentError, Result};
use crate::factory::ensure_valid;
use crate::models::ServiceConfig;
use crate::runtime::{Service, ServiceRequest, ServiceResponse};
use crate::validation::{validate_service_config, validate_service_entry};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Service entry wrapping a backend
pub struct ServiceHandle {
    config: ServiceConfig,
    name: String,
    capabilities: Vec<String>,
    backend: Arc<dyn Service>,
    initialized: AtomicBool,
}

impl ServiceHandle {
    /// Replace the capability list
    pub fn with_capabilities(mut self, capabilities: Vec<String>) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Configuration the entry was built from
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

#[async_trait]
impl ServiceEntry for ServiceHandle {
    fn service_type(&self) -> &str {
        &self.config.service_type
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    async fn invoke(&self, request: ServiceRequest) -> Result<ServiceResponse> {
        if !self.initialized.swap(true, Ordering::SeqCst) {
            debug!(service_type = %self.config.service_type, "Service initialized on first use");
        }
        self.backend.request(request).await
    }
}

/// Factory for service entries
#[derive(Debug, Clone, Default)]
pub struct ServiceFactory;

impl ServiceFactory {
    /// Create a new service factory
    pub fn new() -> Self {
        Self
    }

    /// Validate the configuration, build the entry, then validate the built entry
    pub fn create(&self, config: ServiceConfig, backend: Arc<dyn Service>) -> Result<ServiceHandle> {
        ensure_valid("service", &validate_service_config(&config))?;

        let name = if config.name.trim().is_empty() {
            config.service_type.clone()
        } else {
            config.name.clone()
        };

        let handle = ServiceHandle {
            name,
            capabilities: config.capabilities.clone(),
            config,
            backend,
            initialized: AtomicBool::new(false),
        };

        let built = validate_service_entry(&handle);
        if !built.is_valid {
            return Err(AgentError::configuration(format!(
                "constructed service entry is invalid: {}",
                built.error_message()
            )));
        }

        debug!(service_type = %handle.service_type(), "Service entry created");
        Ok(handle)
    }

    /// Build a service entry whose capabilities were discovered at runtime
    pub fn create_with_capabilities(
        &self,
        config: ServiceConfig,
        backend: Arc<dyn Service>,
        capabilities: Vec<String>,
    ) -> Result<ServiceHandle> {
        Ok(self.create(config, backend)?.with_capabilities(capabilities))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingBackend;

    #[async_trait]
    impl Service for CountingBackend {
        fn service_type(&self) -> &str {
            "counter"
        }

        async fn request(&self, request: ServiceRequest) -> Result<ServiceResponse> {
            Ok(ServiceResponse::text(format!("handled {}", request.operation)))
        }
    }

    #[test]
    fn test_create_defaults_name_to_type() {
        let handle = ServiceFactory::new()
            .create(
                ServiceConfig::new("vector").with_capability("retrieve"),
                Arc::new(CountingBackend),
            )
            .unwrap();

        assert_eq!(handle.service_type(), "vector");
        assert_eq!(handle.name(), "vector");
        assert!(!handle.is_initialized());
    }

    #[test]
    fn test_create_rejects_missing_type() {
        let result = ServiceFactory::new().create(ServiceConfig::default(), Arc::new(CountingBackend));
        assert!(matches!(result, Err(AgentError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_lazy_initialization_on_first_invoke() {
        let handle = ServiceFactory::new()
            .create(ServiceConfig::new("vector"), Arc::new(CountingBackend))
            .unwrap();

        handle.initialize().await.unwrap();
        assert!(!handle.is_initialized());

        let response = handle
            .invoke(ServiceRequest::new("search", serde_json::Value::Null))
            .await
            .unwrap();
        assert_eq!(response.content, "handled search");
        assert!(handle.is_initialized());
    }

    #[test]
    fn test_create_with_capabilities() {
        let handle = ServiceFactory::new()
            .create_with_capabilities(
                ServiceConfig::new("vector"),
                Arc::new(CountingBackend),
                vec!["embed".to_string(), "retrieve".to_string()],
            )
            .unwrap();
        assert_eq!(handle.capabilities().len(), 2);
    }
}
