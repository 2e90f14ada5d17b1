pub mod builder;
pub mod env_interpolation;
pub mod presets;

use crate::types::{ConnectionString, ConnectionStringError, ReplicaSetConfig};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use builder::ConfigBuilder;

/// Versioned configuration wrapper
/// This allows us to evolve the config format over time while maintaining backward compatibility
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "config_version")]
pub enum BootstrapConfigVersioned {
    #[serde(rename = "1")]
    V1(BootstrapConfigV1),
}

impl BootstrapConfigVersioned {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_yaml_str(&content).with_context(|| format!("Invalid config file: {}", path.display()))
    }

    /// Load configuration from a YAML string, expanding `${VAR}` references first
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let content = env_interpolation::interpolate_yaml_content(content)?;
        let yaml_value: serde_yaml::Value = serde_yaml::from_str(&content).context("Failed to parse YAML")?;

        if yaml_value.get("config_version").is_none() {
            anyhow::bail!(
                "Missing required field 'config_version' in config file. \
                 Current supported version: 1"
            );
        }

        let versioned: BootstrapConfigVersioned =
            serde_yaml::from_value(yaml_value).context("Failed to deserialize config")?;

        Ok(versioned)
    }

    /// Convert to the canonical (latest) config format
    pub fn into_canonical(self) -> BootstrapConfig {
        match self {
            BootstrapConfigVersioned::V1(v1) => v1,
        }
    }
}

/// Canonical configuration (always latest version internally)
pub type BootstrapConfig = BootstrapConfigV1;

/// Version 1 of the bootstrap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfigV1 {
    /// The document submitted with `replSetInitiate`
    pub replica_set: ReplicaSetConfig,

    /// How to reach the node that receives the admin commands
    #[serde(default)]
    pub admin: AdminConfig,

    /// Connection string clients will use once the set is running. Only used for cross-checking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_connection_string: Option<String>,
}

impl BootstrapConfigV1 {
    pub fn client_connection_string(&self) -> Result<Option<ConnectionString>, ConnectionStringError> {
        self.client_connection_string.as_deref().map(str::parse).transpose()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_connection_url")]
    pub connection_url: String,

    #[serde(default = "default_server_selection_timeout_secs")]
    pub server_selection_timeout_secs: u64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            connection_url: default_connection_url(),
            server_selection_timeout_secs: default_server_selection_timeout_secs(),
        }
    }
}

pub const DEFAULT_CONNECTION_URL: &str = "mongodb://localhost:27017";

fn default_connection_url() -> String {
    DEFAULT_CONNECTION_URL.to_string()
}

fn default_server_selection_timeout_secs() -> u64 {
    10
}
