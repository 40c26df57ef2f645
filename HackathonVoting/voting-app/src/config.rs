use std::path::Path;

use serde::Deserialize;

use crate::errors::ConfigError;
use crate::types::ResourceId;

pub const DEFAULT_NAMESPACE: &str = "dev_hack_1";
pub const DEFAULT_SYSTEM_NAME: &str = "VotingSystem";

/// App settings, read from TOML. Every key is optional.
///
/// ```toml
/// namespace = "dev_hack_1"
/// system_name = "VotingSystem"
/// read_only = false
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub namespace: String,
    pub system_name: String,
    /// Visitor mode: browse without a wallet
    pub read_only: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            system_name: DEFAULT_SYSTEM_NAME.to_string(),
            read_only: false,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.system_id()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Resource id the voting system is registered under
    pub fn system_id(&self) -> Result<ResourceId, ConfigError> {
        ResourceId::system(&self.namespace, &self.system_name)
    }
}
