//! Contract with the hosting runtime
//!
//! The runtime owns agent lifecycles and concrete backends. Entries only talk
//! to it through [`AgentRuntime`] and to backends through the generic
//! request/response [`Service`] contract.

use crate::error::{AgentError, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Capability key of the text-generation service agents delegate to
pub const AI_SERVICE_KEY: &str = "ai";

/// Generic request sent to a service backend
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServiceRequest {
    /// Operation name understood by the backend
    pub operation: String,
    /// Operation payload
    #[serde(default)]
    pub payload: serde_json::Value,
    /// Caller-supplied metadata
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ServiceRequest {
    /// Create a request for an operation with a payload
    pub fn new(operation: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            operation: operation.into(),
            payload,
            metadata: HashMap::new(),
        }
    }
}

/// Generic response from a service backend
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServiceResponse {
    /// Primary textual content
    pub content: String,
    /// Structured data
    #[serde(default)]
    pub data: serde_json::Value,
}

impl ServiceResponse {
    /// Text-only response
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            data: serde_json::Value::Null,
        }
    }
}

/// A backend reachable through the runtime
#[async_trait]
pub trait Service: Send + Sync {
    /// Key under which the runtime exposes this service
    fn service_type(&self) -> &str;

    /// Handle one request
    async fn request(&self, request: ServiceRequest) -> Result<ServiceResponse>;
}

/// Snapshot of runtime health
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RuntimeStatus {
    /// Runtime has been started and not stopped
    pub is_running: bool,
    /// Runtime completed initialization at least once
    pub is_initialized: bool,
    /// Milliseconds since the last start
    pub uptime_ms: u64,
    /// Resident memory attributed to the runtime, 0 when not tracked
    pub memory_usage_bytes: u64,
    /// Requests currently in flight
    pub active_tasks: usize,
}

/// Hosting runtime bound to one agent
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// Identifier of the agent this runtime hosts
    fn agent_id(&self) -> &str;

    /// Start the runtime
    async fn initialize(&self) -> Result<()>;

    /// Stop the runtime
    async fn stop(&self) -> Result<()>;

    /// Load a named model
    async fn load_model(&self, model: &str) -> Result<()>;

    /// Resolve a service by capability key
    fn get_service(&self, key: &str) -> Option<Arc<dyn Service>>;

    /// Current status
    fn status(&self) -> RuntimeStatus;

    /// Called when an entry starts handling a request
    fn task_started(&self) {}

    /// Called when an entry finishes handling a request
    fn task_finished(&self) {}
}

/// In-process runtime with a service table
///
/// Suitable for tests and for hosts that wire backends directly.
pub struct LocalRuntime {
    agent_id: String,
    services: RwLock<HashMap<String, Arc<dyn Service>>>,
    running: AtomicBool,
    initialized: AtomicBool,
    started_at: RwLock<Option<Instant>>,
    loaded_model: RwLock<Option<String>>,
    active_tasks: AtomicUsize,
}

impl LocalRuntime {
    /// Create a stopped runtime for an agent
    pub fn new(agent_id: impl Into<String>) -> Self {
        Self {
            agent_id: agent_id.into(),
            services: RwLock::new(HashMap::new()),
            running: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
            started_at: RwLock::new(None),
            loaded_model: RwLock::new(None),
            active_tasks: AtomicUsize::new(0),
        }
    }

    /// Expose a service under a key
    pub fn with_service(self, key: impl Into<String>, service: Arc<dyn Service>) -> Self {
        self.register_service(key, service);
        self
    }

    /// Expose a service under a key, replacing any previous one
    pub fn register_service(&self, key: impl Into<String>, service: Arc<dyn Service>) {
        self.services.write().insert(key.into(), service);
    }

    /// Name of the model loaded last, if any
    pub fn loaded_model(&self) -> Option<String> {
        self.loaded_model.read().clone()
    }
}

#[async_trait]
impl AgentRuntime for LocalRuntime {
    fn agent_id(&self) -> &str {
        &self.agent_id
    }

    async fn initialize(&self) -> Result<()> {
        *self.started_at.write() = Some(Instant::now());
        self.running.store(true, Ordering::SeqCst);
        self.initialized.store(true, Ordering::SeqCst);
        info!(agent_id = %self.agent_id, "Local runtime started");
        Ok(())
    }

    async fn stop(&self) -> Result<()> {
        self.running.store(false, Ordering::SeqCst);
        *self.started_at.write() = None;
        info!(agent_id = %self.agent_id, "Local runtime stopped");
        Ok(())
    }

    async fn load_model(&self, model: &str) -> Result<()> {
        if model.trim().is_empty() {
            return Err(AgentError::invalid_input("model name cannot be empty"));
        }
        debug!(agent_id = %self.agent_id, model = %model, "Model loaded");
        *self.loaded_model.write() = Some(model.to_string());
        Ok(())
    }

    fn get_service(&self, key: &str) -> Option<Arc<dyn Service>> {
        self.services.read().get(key).cloned()
    }

    fn status(&self) -> RuntimeStatus {
        let started_at = *self.started_at.read();
        let uptime_ms = started_at
            .map(|start| start.elapsed().as_millis() as u64)
            .unwrap_or(0);

        RuntimeStatus {
            is_running: self.running.load(Ordering::SeqCst),
            is_initialized: self.initialized.load(Ordering::SeqCst),
            uptime_ms,
            memory_usage_bytes: 0,
            active_tasks: self.active_tasks.load(Ordering::SeqCst),
        }
    }

    fn task_started(&self) {
        self.active_tasks.fetch_add(1, Ordering::SeqCst);
    }

    fn task_finished(&self) {
        // saturating: a stray finish must not wrap around
        let _ = self
            .active_tasks
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }
}
