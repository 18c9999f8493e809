// Configuration loading
//
// A JSON file can supply the endpoint, artifact directory and extra artifact
// entries; CLI flags are applied on top through the builder.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::api::types::ValidationConfig;

/// Configuration manager for validation runs
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<ValidationConfig> {
        let path = path.as_ref();
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("could not read config file {:?}", path))?;
        let config = serde_json::from_str(&config_str)
            .with_context(|| format!("could not parse config file {:?}", path))?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(config: &ValidationConfig, path: P) -> Result<()> {
        let config_str = serde_json::to_string_pretty(config)?;
        fs::write(path, config_str)?;
        Ok(())
    }

    /// Create a builder for configuration
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for creating configurations
#[derive(Default)]
pub struct ConfigBuilder {
    config: ValidationConfig,
}

impl ConfigBuilder {
    /// Start from an existing configuration
    pub fn from_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn rpc_url(mut self, value: impl Into<String>) -> Self {
        self.config.rpc_url = Some(value.into());
        self
    }

    pub fn artifacts_dir(mut self, value: impl Into<PathBuf>) -> Self {
        self.config.artifacts_dir = value.into();
        self
    }

    /// Register or override an artifact path
    pub fn artifact(mut self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.config.extra_artifacts.insert(name, path);
        self
    }

    pub fn network_name(mut self, chain_id: u64, name: impl Into<String>) -> Self {
        self.config.network_names.insert(chain_id, name.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> ValidationConfig {
        self.config
    }
}
