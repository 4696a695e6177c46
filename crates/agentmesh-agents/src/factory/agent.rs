//! Agent factory and the runtime-bound agent entry

use crate::entries::{ActionResult, AgentEntry, AgentStatus};
use crate::error::{AgentError, Result};
use crate::factory::ensure_valid;
use crate::models::AgentConfig;
use crate::runtime::{AgentRuntime, Service, ServiceRequest, ServiceResponse, AI_SERVICE_KEY};
use crate::validation::validate_agent_config;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

/// Agent entry bound to its configuration and hosting runtime
pub struct AgentHandle {
    id: String,
    config: AgentConfig,
    capabilities: Vec<String>,
    runtime: Arc<dyn AgentRuntime>,
    last_activity: RwLock<Option<DateTime<Utc>>>,
}

impl std::fmt::Debug for AgentHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentHandle")
            .field("id", &self.id)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

impl AgentHandle {
    /// Replace the capability list
    pub fn with_capabilities(mut self, capabilities: Vec<String>) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Configuration the entry was built from
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    fn ai_service(&self) -> Result<Arc<dyn Service>> {
        self.runtime
            .get_service(AI_SERVICE_KEY)
            .ok_or_else(|| AgentError::service_unavailable(AI_SERVICE_KEY))
    }

    async fn call_ai(&self, request: ServiceRequest) -> Result<ServiceResponse> {
        let service = self.ai_service()?;

        self.runtime.task_started();
        let outcome = service.request(request).await;
        self.runtime.task_finished();
        *self.last_activity.write() = Some(Utc::now());

        outcome
    }
}

#[async_trait]
impl AgentEntry for AgentHandle {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> &[String] {
        &self.capabilities
    }

    async fn initialize(&self) -> Result<()> {
        debug!(agent_id = %self.id, "Initializing agent");
        self.runtime.initialize().await?;

        if let Some(model) = &self.config.model {
            self.runtime.load_model(&model.model).await?;
            debug!(agent_id = %self.id, model = %model.model, "Model loaded");
        }

        info!(agent_id = %self.id, "Agent initialized");
        Ok(())
    }

    async fn shutdown(&self) -> Result<()> {
        self.runtime.stop().await?;
        info!(agent_id = %self.id, "Agent shut down");
        Ok(())
    }

    async fn handle_message(&self, content: &str) -> Result<ActionResult> {
        let request = ServiceRequest::new(
            "handle_message",
            json!({ "agent_id": self.id, "content": content }),
        );
        let response = self.call_ai(request).await?;

        Ok(ActionResult {
            success: true,
            text: response.content,
            data: response.data,
        })
    }

    async fn generate_response(&self, text: &str) -> Result<String> {
        let request = ServiceRequest::new("generate", json!({ "agent_id": self.id, "prompt": text }));
        Ok(self.call_ai(request).await?.content)
    }

    fn status(&self) -> AgentStatus {
        let runtime = self.runtime.status();
        AgentStatus {
            is_running: runtime.is_running,
            is_initialized: runtime.is_initialized,
            last_activity: *self.last_activity.read(),
            uptime_ms: runtime.uptime_ms,
            memory_usage_bytes: runtime.memory_usage_bytes,
            active_tasks: runtime.active_tasks,
        }
    }
}

/// Factory for agent entries
///
/// # Examples
///
/// ```ignore
/// use agentmesh_agents::{AgentConfig, AgentFactory, LocalRuntime};
/// use std::sync::Arc;
///
/// let factory = AgentFactory::new();
/// let runtime = Arc::new(LocalRuntime::new("scout"));
/// let agent = factory.create(AgentConfig::new("Scout").with_capability("search"), runtime)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct AgentFactory;

impl AgentFactory {
    /// Create a new agent factory
    pub fn new() -> Self {
        Self
    }

    /// Validate the configuration and build an agent entry
    ///
    /// A missing id is replaced by a generated `agent-<uuid>` identifier.
    pub fn create(&self, config: AgentConfig, runtime: Arc<dyn AgentRuntime>) -> Result<AgentHandle> {
        ensure_valid("agent", &validate_agent_config(&config))?;

        let id = config
            .id
            .clone()
            .unwrap_or_else(|| format!("agent-{}", uuid::Uuid::new_v4()));

        debug!(agent_id = %id, name = %config.name, "Agent entry created");

        Ok(AgentHandle {
            id,
            capabilities: config.capabilities.clone(),
            config,
            runtime,
            last_activity: RwLock::new(None),
        })
    }

    /// Build an agent entry whose capabilities were discovered at runtime
    pub fn create_with_capabilities(
        &self,
        config: AgentConfig,
        runtime: Arc<dyn AgentRuntime>,
        capabilities: Vec<String>,
    ) -> Result<AgentHandle> {
        Ok(self.create(config, runtime)?.with_capabilities(capabilities))
    }
}
