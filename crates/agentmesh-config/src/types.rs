//! Configuration sections for the registry, processors and logging

use serde::{Deserialize, Serialize};

/// Top-level AgentMesh configuration
///
/// Every section falls back to its defaults when absent, so a partial file
/// (or no file at all) still yields a usable configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct MeshConfig {
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Capability registry lifecycle settings
    pub registry: RegistrySettings,
    /// Sequential reasoning settings
    pub reasoning: ReasoningSettings,
    /// Retrieval-augmented generation settings
    pub retrieval: RetrievalSettings,
    /// Multi-agent coordinator settings
    pub coordinator: CoordinatorSettings,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset (e.g. "info", "agentmesh_agents=debug")
    pub level: String,
    /// Emit ANSI colours
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            ansi: true,
        }
    }
}

/// Settings for bulk agent lifecycle operations in the registry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RegistrySettings {
    /// Maximum number of agents initialized or shut down concurrently
    pub max_concurrency: usize,
    /// Per-agent timeout in milliseconds; `None` waits indefinitely
    pub init_timeout_ms: Option<u64>,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            init_timeout_ms: None,
        }
    }
}

/// Settings for the sequential (chain-of-thought) processor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReasoningSettings {
    /// Starting score of the keyword step scorer
    pub default_step_confidence: f64,
    /// Penalty applied per step whose confidence falls below 0.5
    pub error_penalty: f64,
    /// Upper bound for the completeness bonus
    pub max_completeness_bonus: f64,
}

impl Default for ReasoningSettings {
    fn default() -> Self {
        Self {
            default_step_confidence: 0.5,
            error_penalty: 0.1,
            max_completeness_bonus: 0.2,
        }
    }
}

/// Settings for the retrieval-augmented processor
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Documents below this similarity are discarded after retrieval
    pub relevance_threshold: f64,
    /// Maximum excerpt length in characters
    pub excerpt_max_length: usize,
    /// Number of candidate documents requested from the retriever
    pub top_k: usize,
    /// Similarity of the first placeholder document
    pub similarity_start: f64,
    /// Similarity decrement between consecutive placeholder documents
    pub similarity_step: f64,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            relevance_threshold: 0.7,
            excerpt_max_length: 200,
            top_k: 5,
            similarity_start: 0.95,
            similarity_step: 0.1,
        }
    }
}

/// Settings for the multi-agent coordinator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoordinatorSettings {
    /// Identifier used as sender of coordinator messages
    pub coordinator_id: String,
    /// Maximum number of agents initialized concurrently
    pub max_concurrency: usize,
    /// Per-agent initialization timeout in milliseconds; `None` waits indefinitely
    pub init_timeout_ms: Option<u64>,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            coordinator_id: "coordinator".to_string(),
            max_concurrency: 8,
            init_timeout_ms: None,
        }
    }
}
