//! Entry traits for registry-ready agents, services and plugins

use crate::error::Result;
use crate::runtime::{ServiceRequest, ServiceResponse};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of entry owning a capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Agent entry, keyed by id
    Agent,
    /// Service entry, keyed by service type
    Service,
    /// Plugin entry, keyed by name
    Plugin,
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryType::Agent => write!(f, "agent"),
            EntryType::Service => write!(f, "service"),
            EntryType::Plugin => write!(f, "plugin"),
        }
    }
}

/// Outcome of an agent handling a message
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ActionResult {
    /// Whether the action succeeded
    pub success: bool,
    /// Text produced by the action
    pub text: String,
    /// Structured data returned by the backend
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Status reported by an agent entry
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentStatus {
    /// Runtime is running
    pub is_running: bool,
    /// Runtime has been initialized
    pub is_initialized: bool,
    /// Last message or response handled
    pub last_activity: Option<DateTime<Utc>>,
    /// Milliseconds since the runtime started
    pub uptime_ms: u64,
    /// Memory attributed to the runtime
    pub memory_usage_bytes: u64,
    /// Requests currently in flight
    pub active_tasks: usize,
}

/// A registry-ready agent
#[async_trait]
pub trait AgentEntry: Send + Sync {
    /// Unique identifier; the registry key
    fn id(&self) -> &str;

    /// Human-readable name
    fn name(&self) -> &str;

    /// Declared capabilities
    fn capabilities(&self) -> &[String];

    /// Start the bound runtime and load the configured model
    async fn initialize(&self) -> Result<()>;

    /// Stop the bound runtime
    async fn shutdown(&self) -> Result<()>;

    /// Handle an incoming message through the runtime's AI service
    async fn handle_message(&self, content: &str) -> Result<ActionResult>;

    /// Generate a free-form response through the runtime's AI service
    async fn generate_response(&self, text: &str) -> Result<String>;

    /// Current status
    fn status(&self) -> AgentStatus;
}

/// A registry-ready service
///
/// Services initialize lazily on first use; the lifecycle hooks default to no-ops.
#[async_trait]
pub trait ServiceEntry: Send + Sync {
    /// Service type; the registry key
    fn service_type(&self) -> &str;

    /// Human-readable name
    fn name(&self) -> &str;

    /// Declared capabilities
    fn capabilities(&self) -> &[String];

    /// Whether the first use has happened
    fn is_initialized(&self) -> bool;

    /// Lifecycle hook
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    /// Lifecycle hook
    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    /// Forward a request to the backend
    async fn invoke(&self, request: ServiceRequest) -> Result<ServiceResponse>;
}

/// A registry-ready plugin
///
/// Plugins initialize lazily on first use; the lifecycle hooks default to no-ops.
#[async_trait]
pub trait PluginEntry: Send + Sync {
    /// Plugin name; the registry key
    fn name(&self) -> &str;

    /// Plugin version
    fn version(&self) -> &str;

    /// Declared capabilities
    fn capabilities(&self) -> &[String];

    /// Whether the first use has happened
    fn is_initialized(&self) -> bool;

    /// Lifecycle hook
    async fn initialize(&self) -> Result<()> {
        Ok(())
    }

    /// Lifecycle hook
    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    /// Call one of the runtime services the plugin was granted
    async fn invoke(&self, service_key: &str, request: ServiceRequest) -> Result<ServiceResponse>;
}
