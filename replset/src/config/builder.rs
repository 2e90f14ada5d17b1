//! Configuration builder that implements the hierarchy: CLI > ENV > Config File > Defaults

use super::presets::PresetRegistry;
use super::{BootstrapConfig, BootstrapConfigVersioned};
use crate::cli::ConfigSourceArgs;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

/// Configuration builder that merges config from multiple sources
#[derive(Default)]
pub struct ConfigBuilder {
    /// Base config loaded from file or preset
    base_config: Option<BootstrapConfig>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from a preset name
    pub fn with_preset(mut self, preset_name: &str) -> Result<Self> {
        info!("Loading configuration from preset: {}", preset_name);
        self.base_config = Some(PresetRegistry::default().load_preset(preset_name)?);
        Ok(self)
    }

    /// Load config from a file path
    pub fn with_config_file(mut self, path: &Path) -> Result<Self> {
        info!("Loading configuration from file: {}", path.display());
        self.base_config = Some(BootstrapConfigVersioned::from_yaml_file(path)?.into_canonical());
        Ok(self)
    }

    /// Load whichever base config the CLI selected
    pub fn with_source(self, source: &ConfigSourceArgs) -> Result<Self> {
        match (&source.config_file, &source.preset) {
            (Some(path), _) => self.with_config_file(path),
            (None, Some(preset)) => self.with_preset(preset),
            (None, None) => anyhow::bail!("Either --config-file or --preset is required"),
        }
    }

    /// Override the admin connection url, e.g. from `--mongodb-connection-url`
    pub fn with_connection_url(mut self, connection_url: Option<&str>) -> Result<Self> {
        let config = self
            .base_config
            .as_mut()
            .context("Cannot apply overrides without a base config (use with_preset or with_config_file first)")?;
        if let Some(url) = connection_url {
            debug!("Overriding admin.connection_url from CLI");
            config.admin.connection_url = url.to_string();
        }
        Ok(self)
    }

    pub fn build(self) -> Result<BootstrapConfig> {
        self.base_config.context("No configuration source was given")
    }
}
