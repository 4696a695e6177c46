//! Error types for entries, factories and the capability registry

use thiserror::Error;

/// Errors that can occur during agent, service and plugin operations
#[derive(Debug, Clone, Error)]
pub enum AgentError {
    /// Configuration failed validation; carries the joined validation messages
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Entry has no identifying key (id, service type or name)
    #[error("Missing identifier: {0}")]
    MissingIdentifier(String),

    /// A required runtime service is not available
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Lifecycle initialization failed
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// Execution failed
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// Operation timed out
    #[error("Timeout after {0}ms")]
    Timeout(u64),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AgentError {
    /// Create a new Configuration error
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration(reason.into())
    }

    /// Create a new MissingIdentifier error
    pub fn missing_identifier(what: impl Into<String>) -> Self {
        Self::MissingIdentifier(what.into())
    }

    /// Create a new ServiceUnavailable error
    pub fn service_unavailable(key: impl Into<String>) -> Self {
        Self::ServiceUnavailable(key.into())
    }

    /// Create a new InitializationFailed error
    pub fn initialization_failed(reason: impl Into<String>) -> Self {
        Self::InitializationFailed(reason.into())
    }

    /// Create a new ExecutionFailed error
    pub fn execution_failed(reason: impl Into<String>) -> Self {
        Self::ExecutionFailed(reason.into())
    }

    /// Create a new Timeout error
    pub fn timeout(ms: u64) -> Self {
        Self::Timeout(ms)
    }

    /// Create a new Serialization error
    pub fn serialization(reason: impl Into<String>) -> Self {
        Self::Serialization(reason.into())
    }

    /// Create a new InvalidInput error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }

    /// Create a new Internal error
    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal(reason.into())
    }
}

impl From<serde_json::Error> for AgentError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AgentError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;
