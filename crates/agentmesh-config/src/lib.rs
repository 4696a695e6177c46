//! AgentMesh Configuration
//!
//! Layered configuration (defaults, file, environment) for the capability
//! registry and the task processors, plus the tracing subscriber setup shared
//! by hosts embedding AgentMesh.

pub mod error;
pub mod manager;
pub mod telemetry;
pub mod types;

pub use error::{ConfigError, Result};
pub use manager::{ConfigManager, DEFAULT_ENV_PREFIX};
pub use telemetry::init_tracing;
pub use types::{
    CoordinatorSettings, LoggingConfig, MeshConfig, ReasoningSettings, RegistrySettings,
    RetrievalSettings,
};
