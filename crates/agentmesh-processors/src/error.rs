//! Error types for the task processors

use agentmesh_agents::AgentError;
use thiserror::Error;

/// Errors that can occur while processing a task entry
#[derive(Debug, Clone, Error)]
pub enum ProcessorError {
    /// Entry failed structural validation; carries the joined messages
    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    /// Phase name is not part of the coordinator state machine
    #[error("Unknown phase: {0}")]
    UnknownPhase(String),

    /// A phase handler tried to move somewhere the transition table forbids
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        /// Phase the entry was in
        from: String,
        /// Phase the handler returned
        to: String,
    },

    /// A reasoning step action failed
    #[error("Action failed: {0}")]
    ActionFailed(String),

    /// Document retrieval failed
    #[error("Retrieval failed: {0}")]
    RetrievalFailed(String),

    /// Response generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Error raised by an agent or the registry
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),
}

impl ProcessorError {
    /// Create a new InvalidEntry error
    pub fn invalid_entry(reason: impl Into<String>) -> Self {
        Self::InvalidEntry(reason.into())
    }

    /// Create a new UnknownPhase error
    pub fn unknown_phase(name: impl Into<String>) -> Self {
        Self::UnknownPhase(name.into())
    }

    /// Create a new InvalidTransition error
    pub fn invalid_transition(from: impl ToString, to: impl ToString) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Create a new ActionFailed error
    pub fn action_failed(reason: impl Into<String>) -> Self {
        Self::ActionFailed(reason.into())
    }

    /// Create a new RetrievalFailed error
    pub fn retrieval_failed(reason: impl Into<String>) -> Self {
        Self::RetrievalFailed(reason.into())
    }

    /// Create a new GenerationFailed error
    pub fn generation_failed(reason: impl Into<String>) -> Self {
        Self::GenerationFailed(reason.into())
    }
}

/// Result type for processor operations
pub type Result<T> = std::result::Result<T, ProcessorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_entry() {
        let error = ProcessorError::invalid_entry("taskId is required");
        assert_eq!(error.to_string(), "Invalid entry: taskId is required");
    }

    #[test]
    fn test_invalid_transition() {
        let error = ProcessorError::invalid_transition("completed", "execution");
        assert_eq!(
            error.to_string(),
            "Invalid transition from completed to execution"
        );
    }

    #[test]
    fn test_from_agent_error() {
        let error: ProcessorError = AgentError::service_unavailable("ai").into();
        assert!(matches!(error, ProcessorError::Agent(AgentError::ServiceUnavailable(_))));
    }
}
