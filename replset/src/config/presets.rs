use super::{BootstrapConfig, BootstrapConfigVersioned};
use anyhow::{Context, Result};

/// Preset names accepted by `--preset`.
pub const PRESET_NAMES: [&str; 2] = ["local-single", "local-three"];

/// Built-in configurations, embedded at compile time.
pub struct PresetRegistry {
    presets: Vec<(&'static str, &'static str)>,
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self {
            presets: vec![
                ("local-single", include_str!("../../presets/local-single.yaml")),
                ("local-three", include_str!("../../presets/local-three.yaml")),
            ],
        }
    }
}

impl PresetRegistry {
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.presets.iter().map(|(name, _)| *name)
    }

    pub fn load_preset(&self, name: &str) -> Result<BootstrapConfig> {
        let (_, content) = self.presets.iter().find(|(preset, _)| *preset == name).ok_or_else(|| {
            let available = self.names().collect::<Vec<_>>().join(", ");
            anyhow::anyhow!("Unknown preset '{}'. Available presets: {}", name, available)
        })?;

        let config = BootstrapConfigVersioned::from_yaml_str(content)
            .with_context(|| format!("Built-in preset '{}' is invalid", name))?
            .into_canonical();
        Ok(config)
    }
}
