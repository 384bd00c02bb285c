//! Configuration loading from a YAML file on disk.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::domain::ProvisionConfig;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "AGENT_PROVISION_CONFIG";

/// Loads `ProvisionConfig` from YAML.
///
/// Lookup order: the explicit path, then `$AGENT_PROVISION_CONFIG`, then
/// `<config dir>/agent-provision/config.yaml`. Only the last may be missing.
pub struct YamlConfigStore {
    explicit: Option<PathBuf>,
}

impl YamlConfigStore {
    #[must_use]
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }

    /// Resolve the config path and whether it was named by the user.
    fn path(&self) -> Option<(PathBuf, bool)> {
        if let Some(p) = &self.explicit {
            return Some((p.clone(), true));
        }
        if let Ok(val) = std::env::var(CONFIG_ENV) {
            if !val.is_empty() {
                return Some((PathBuf::from(val), true));
            }
        }
        dirs::config_dir().map(|d| (d.join("agent-provision").join("config.yaml"), false))
    }

    /// Load and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a user-named file is missing, any file cannot be
    /// parsed, or the resulting values fail validation.
    pub fn load(&self) -> Result<ProvisionConfig> {
        let config = match self.path() {
            Some((path, named)) if named || path.exists() => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("cannot read {}", path.display()))?;
                serde_yaml::from_str(&content)
                    .with_context(|| format!("cannot parse {}", path.display()))?
            }
            _ => ProvisionConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }
}
