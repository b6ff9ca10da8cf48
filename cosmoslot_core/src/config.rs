//! Game configuration, loadable from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::{MAX_STAKE, MIN_STAKE};
use crate::paytable::Paytable;
use crate::symbols::ReelStrip;
use crate::timing::TimingConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub starting_balance: u64,
    pub starting_stake: u64,
    pub strip: ReelStrip,
    pub paytable: Paytable,
    pub timing: TimingConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_balance: 100,
            starting_stake: 1,
            strip: ReelStrip::default_strip(),
            paytable: Paytable::simple_default(),
            timing: TimingConfig::normal(),
        }
    }
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_STAKE..=MAX_STAKE).contains(&self.starting_stake) {
            return Err(ConfigError::Invalid(format!(
                "starting_stake {} outside {MIN_STAKE}..={MAX_STAKE}",
                self.starting_stake
            )));
        }
        if self.strip.is_empty() {
            return Err(ConfigError::Invalid("reel strip has no symbols".into()));
        }
        if self.strip.symbol_height_px == 0 {
            return Err(ConfigError::Invalid("symbol_height_px must be non-zero".into()));
        }
        if self.timing.resolve_delay_ms > self.timing.settle_delay_ms {
            return Err(ConfigError::Invalid(format!(
                "resolve_delay_ms {} is after settle_delay_ms {}",
                self.timing.resolve_delay_ms, self.timing.settle_delay_ms
            )));
        }
        Ok(())
    }
}
