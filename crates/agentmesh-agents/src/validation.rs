//! Structural validation for configurations and constructed entries
//!
//! Validators never fail: they return a [`ValidationResult`] whose errors block
//! construction and whose warnings are advisory. Factories decide when a
//! failing result becomes fatal.

use crate::entries::{PluginEntry, ServiceEntry};
use crate::models::{AgentConfig, ModelConfig, PluginConfig, ServiceConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Error code for a missing required field
pub const CODE_REQUIRED: &str = "REQUIRED_FIELD";
/// Error code for a present but malformed value
pub const CODE_INVALID: &str = "INVALID_VALUE";
/// Error code for a value outside its permitted range
pub const CODE_OUT_OF_RANGE: &str = "OUT_OF_RANGE";
/// Error code for a repeated value that must be unique
pub const CODE_DUPLICATE: &str = "DUPLICATE_VALUE";

/// A blocking validation problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Offending field path
    pub field: String,
    /// Human-readable message
    pub message: String,
    /// Machine-readable code
    pub code: String,
}

/// A non-blocking validation remark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationWarning {
    /// Field path the warning refers to
    pub field: String,
    /// Human-readable message
    pub message: String,
    /// Suggested fix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// Outcome of a validation pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// `true` when there are no errors
    pub is_valid: bool,
    /// Blocking problems
    pub errors: Vec<ValidationError>,
    /// Advisory remarks
    pub warnings: Vec<ValidationWarning>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    /// An empty, valid result
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Record an error; the result becomes invalid
    pub fn add_error(
        &mut self,
        field: impl Into<String>,
        message: impl Into<String>,
        code: impl Into<String>,
    ) {
        self.errors.push(ValidationError {
            field: field.into(),
            message: message.into(),
            code: code.into(),
        });
        self.is_valid = false;
    }

    /// Record a warning
    pub fn add_warning(
        &mut self,
        field: impl Into<String>,
        message: impl Into<String>,
        suggestion: Option<&str>,
    ) {
        self.warnings.push(ValidationWarning {
            field: field.into(),
            message: message.into(),
            suggestion: suggestion.map(str::to_string),
        });
    }

    /// Fold another result in, prefixing its field paths
    pub fn merge_prefixed(&mut self, prefix: &str, other: ValidationResult) {
        for error in other.errors {
            self.add_error(format!("{}.{}", prefix, error.field), error.message, error.code);
        }
        for warning in other.warnings {
            self.warnings.push(ValidationWarning {
                field: format!("{}.{}", prefix, warning.field),
                ..warning
            });
        }
    }

    /// All error messages joined with "; "
    pub fn error_message(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Flag a blank required string
pub fn require_non_empty(result: &mut ValidationResult, field: &str, value: &str) {
    if value.trim().is_empty() {
        result.add_error(field, format!("{} is required", field), CODE_REQUIRED);
    }
}

/// Check a registry key: blank is an error, surrounding whitespace is invalid
pub fn check_key(result: &mut ValidationResult, field: &str, value: &str) {
    if value.trim().is_empty() {
        result.add_error(field, format!("{} is required", field), CODE_REQUIRED);
    } else if value.trim() != value {
        result.add_error(
            field,
            format!("{} must not have leading or trailing whitespace", field),
            CODE_INVALID,
        );
    }
}

/// Check a capability list: blank names are errors, empty lists and repeats are warnings
pub fn check_capabilities(result: &mut ValidationResult, capabilities: &[String]) {
    if capabilities.is_empty() {
        result.add_warning(
            "capabilities",
            "No capabilities declared; the entry cannot be discovered by capability",
            Some("declare at least one capability name"),
        );
        return;
    }

    let mut seen = HashSet::new();
    for (idx, capability) in capabilities.iter().enumerate() {
        if capability.trim().is_empty() {
            result.add_error(
                format!("capabilities[{}]", idx),
                "Capability name cannot be empty",
                CODE_REQUIRED,
            );
        } else if !seen.insert(capability.as_str()) {
            result.add_warning(
                format!("capabilities[{}]", idx),
                format!("Capability '{}' is declared more than once", capability),
                Some("remove the duplicate entry"),
            );
        }
    }
}

/// Validate an agent configuration
pub fn validate_agent_config(config: &AgentConfig) -> ValidationResult {
    let mut result = ValidationResult::new();

    require_non_empty(&mut result, "name", &config.name);
    if let Some(id) = &config.id {
        if id.trim().is_empty() {
            result.add_error(
                "id",
                "id must not be blank when provided",
                CODE_INVALID,
            );
        } else {
            check_key(&mut result, "id", id);
        }
    }
    if config.description.trim().is_empty() {
        result.add_warning(
            "description",
            "Agent has no description",
            Some("describe what the agent does"),
        );
    }
    check_capabilities(&mut result, &config.capabilities);

    if let Some(model) = &config.model {
        result.merge_prefixed("model", validate_model_config(model));
    }

    result
}

/// Validate a model configuration
pub fn validate_model_config(config: &ModelConfig) -> ValidationResult {
    let mut result = ValidationResult::new();

    require_non_empty(&mut result, "provider", &config.provider);
    require_non_empty(&mut result, "model", &config.model);

    if let Some(temperature) = config.temperature {
        if !(0.0..=2.0).contains(&temperature) {
            result.add_error(
                "temperature",
                format!("temperature must be within [0, 2], got {}", temperature),
                CODE_OUT_OF_RANGE,
            );
        } else if temperature > 1.5 {
            result.add_warning(
                "temperature",
                "High temperature produces erratic output",
                Some("use a value at or below 1.0"),
            );
        }
    }
    if config.max_tokens == Some(0) {
        result.add_error(
            "max_tokens",
            "max_tokens must be greater than 0",
            CODE_OUT_OF_RANGE,
        );
    }

    result
}

/// Validate a service configuration
pub fn validate_service_config(config: &ServiceConfig) -> ValidationResult {
    let mut result = ValidationResult::new();

    check_key(&mut result, "service_type", &config.service_type);
    if config.name.trim().is_empty() {
        result.add_warning(
            "name",
            "Service has no display name",
            Some("the service type will be used as its name"),
        );
    }
    check_capabilities(&mut result, &config.capabilities);

    result
}

/// Validate a plugin configuration
pub fn validate_plugin_config(config: &PluginConfig) -> ValidationResult {
    let mut result = ValidationResult::new();

    check_key(&mut result, "name", &config.name);
    if config.version.trim().is_empty() {
        result.add_warning(
            "version",
            "Plugin has no version",
            Some("set a semantic version such as 0.1.0"),
        );
    }
    check_capabilities(&mut result, &config.capabilities);
    for (idx, key) in config.services.iter().enumerate() {
        if key.trim().is_empty() {
            result.add_error(
                format!("services[{}]", idx),
                "Service key cannot be empty",
                CODE_REQUIRED,
            );
        }
    }

    result
}

/// Validate a constructed service entry
pub fn validate_service_entry(entry: &dyn ServiceEntry) -> ValidationResult {
    let mut result = ValidationResult::new();
    check_key(&mut result, "service_type", entry.service_type());
    require_non_empty(&mut result, "name", entry.name());
    check_capabilities(&mut result, entry.capabilities());
    result
}

/// Validate a constructed plugin entry
pub fn validate_plugin_entry(entry: &dyn PluginEntry) -> ValidationResult {
    let mut result = ValidationResult::new();
    check_key(&mut result, "name", entry.name());
    check_capabilities(&mut result, entry.capabilities());
    result
}
