//! Agent, service and plugin entries for AgentMesh
//!
//! This crate turns declarative configuration into registry-ready entries and
//! keeps them discoverable by capability.
//!
//! # Architecture
//!
//! - **Validation**: pure validators returning a [`ValidationResult`]
//! - **Factories**: [`AgentFactory`], [`ServiceFactory`] and [`PluginFactory`]
//!   validate, build and re-check entries
//! - **CapabilityRegistry**: id/type/name indexes plus a capability index,
//!   with best-effort lifecycle fan-out
//! - **Runtime contract**: [`AgentRuntime`] and [`Service`], implemented in
//!   memory by [`LocalRuntime`]
//!
//! # Example
//!
//! ```ignore
//! use agentmesh_agents::{AgentConfig, AgentFactory, CapabilityRegistry, LocalRuntime};
//! use std::sync::Arc;
//!
//! let registry = CapabilityRegistry::new();
//! let runtime = Arc::new(LocalRuntime::new("scout"));
//! let agent = AgentFactory::new().create(AgentConfig::new("Scout").with_capability("search"), runtime)?;
//! registry.register_agent(Arc::new(agent))?;
//!
//! let report = registry.initialize_all().await;
//! ```

#![warn(missing_docs)]

pub mod entries;
pub mod error;
pub mod executor;
pub mod factory;
pub mod models;
pub mod registry;
pub mod runtime;
pub mod validation;

#[cfg(test)]
mod registry_properties;

pub use entries::{ActionResult, AgentEntry, AgentStatus, EntryType, PluginEntry, ServiceEntry};
pub use error::{AgentError, Result};
pub use executor::{FanOutConfig, FanOutExecutor, FanOutOutcome};
pub use factory::{
    load_from_json, load_from_yaml, AgentFactory, AgentHandle, PluginFactory, PluginHandle,
    ServiceFactory, ServiceHandle,
};
pub use models::{AgentConfig, ModelConfig, PluginConfig, ServiceConfig};
pub use registry::{
    CapabilityRecord, CapabilityRegistry, LifecycleFailure, LifecycleReport, RegisteredEntry,
    RegistryStats,
};
pub use runtime::{
    AgentRuntime, LocalRuntime, RuntimeStatus, Service, ServiceRequest, ServiceResponse,
    AI_SERVICE_KEY,
};
pub use validation::{
    validate_agent_config, validate_model_config, validate_plugin_config, validate_plugin_entry,
    validate_service_config, validate_service_entry, ValidationError, ValidationResult,
    ValidationWarning,
};
