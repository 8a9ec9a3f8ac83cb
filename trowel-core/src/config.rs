use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const DEFAULT_ACTIONS_PER_TICK: usize = 64;

/// Settings for [`PipelineDriver`](crate::PipelineDriver).
///
/// ```toml
/// actions_per_tick = 32
/// check_requirements = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Upper bound on actions performed by one `tick`.
    pub actions_per_tick: usize,
    /// Ask the requirement sink before performing each action.
    pub check_requirements: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            actions_per_tick: DEFAULT_ACTIONS_PER_TICK,
            check_requirements: true,
        }
    }
}

impl DriverConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: DriverConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.actions_per_tick == 0 {
            return Err(ConfigError::Invalid("actions_per_tick must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn with_actions_per_tick(mut self, actions_per_tick: usize) -> Self {
        self.actions_per_tick = actions_per_tick;
        self
    }

    pub fn with_check_requirements(mut self, check_requirements: bool) -> Self {
        self.check_requirements = check_requirements;
        self
    }
}
