//! Factories that turn validated configuration into registry-ready entries
//!
//! Each factory runs the matching validator first and escalates a failing
//! [`ValidationResult`] into [`AgentError::Configuration`]. Registration is a
//! separate step performed by the caller.

pub mod agent;
pub mod plugin;
pub mod service;

pub use agent::{AgentFactory, AgentHandle};
pub use plugin::{PluginFactory, PluginHandle};
pub use service::{ServiceFactory, ServiceHandle};

use crate::error::{AgentError, Result};
use crate::validation::ValidationResult;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Turn a validation result into a construction verdict
///
/// Warnings are logged and let through; any error aborts construction.
pub(crate) fn ensure_valid(kind: &str, result: &ValidationResult) -> Result<()> {
    for warning in &result.warnings {
        warn!(kind = kind, field = %warning.field, "{}", warning.message);
    }
    if result.is_valid {
        debug!(kind = kind, "Validation passed");
        Ok(())
    } else {
        Err(AgentError::configuration(result.error_message()))
    }
}

/// Parse a configuration from JSON
pub fn load_from_json<T: DeserializeOwned>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a configuration from YAML
pub fn load_from_yaml<T: DeserializeOwned>(yaml: &str) -> Result<T> {
    Ok(serde_yaml::from_str(yaml)?)
}
