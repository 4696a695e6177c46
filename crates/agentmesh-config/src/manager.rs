//! Configuration manager implementation

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use tracing::{debug, info};

use crate::{
    error::{ConfigError, Result},
    types::MeshConfig,
};

/// Default prefix for environment overrides (`AGENTMESH_RETRIEVAL__TOP_K=3`)
pub const DEFAULT_ENV_PREFIX: &str = "AGENTMESH";

/// Configuration manager
///
/// Layers, from lowest to highest priority: built-in defaults, an optional
/// TOML/YAML/JSON file, and prefixed environment variables.
pub struct ConfigManager {
    /// Configuration file path
    config_path: PathBuf,
    /// Environment prefix
    env_prefix: String,
}

impl ConfigManager {
    /// Create a new configuration manager
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// Create with custom config path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            env_prefix: DEFAULT_ENV_PREFIX.to_string(),
        }
    }

    /// Override the environment variable prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Path of the configuration file
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Get default config path
    fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("agentmesh")
            .join("config.toml")
    }

    /// Load, merge and validate the configuration
    pub fn load_config(&self) -> Result<MeshConfig> {
        debug!(path = %self.config_path.display(), prefix = %self.env_prefix, "Loading configuration");

        let builder = Config::builder()
            .add_source(File::from(self.config_path.clone()).required(false))
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        let mesh_config: MeshConfig = config.try_deserialize()?;
        self.validate_config(&mesh_config)?;

        info!(path = %self.config_path.display(), "Configuration loaded");
        Ok(mesh_config)
    }

    /// Persist the configuration as TOML
    pub fn save_config(&self, config: &MeshConfig) -> Result<()> {
        self.validate_config(config)?;
        let toml = toml::to_string_pretty(config)?;
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.config_path, toml)?;
        debug!(path = %self.config_path.display(), "Configuration saved");
        Ok(())
    }

    /// Check value ranges that serde cannot express
    pub fn validate_config(&self, config: &MeshConfig) -> Result<()> {
        let unit = |name: &str, value: f64| -> Result<()> {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::validation(format!(
                    "{} must be within [0, 1], got {}",
                    name, value
                )));
            }
            Ok(())
        };

        if config.registry.max_concurrency == 0 {
            return Err(ConfigError::validation(
                "registry.max_concurrency must be greater than 0",
            ));
        }
        if config.coordinator.max_concurrency == 0 {
            return Err(ConfigError::validation(
                "coordinator.max_concurrency must be greater than 0",
            ));
        }
        if config.coordinator.coordinator_id.trim().is_empty() {
            return Err(ConfigError::validation(
                "coordinator.coordinator_id cannot be empty",
            ));
        }
        if config.retrieval.excerpt_max_length == 0 {
            return Err(ConfigError::validation(
                "retrieval.excerpt_max_length must be greater than 0",
            ));
        }

        unit("retrieval.relevance_threshold", config.retrieval.relevance_threshold)?;
        unit("retrieval.similarity_start", config.retrieval.similarity_start)?;
        unit("retrieval.similarity_step", config.retrieval.similarity_step)?;
        unit(
            "reasoning.default_step_confidence",
            config.reasoning.default_step_confidence,
        )?;
        unit("reasoning.error_penalty", config.reasoning.error_penalty)?;
        unit(
            "reasoning.max_completeness_bonus",
            config.reasoning.max_completeness_bonus,
        )?;

        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
