use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::defaults;
use crate::error::{Result, SimError};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub session: SessionConfig,
    pub simulator: SimulatorConfig,
}

/// Session timing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    pub tick_ms: u64,
    pub tagging_delay_ms: u64,
    pub note_delay_ms: u64,
    pub suggestions_delay_ms: u64,
}

/// Randomness and integration behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulatorConfig {
    pub rng_seed: Option<u64>,
    pub integration_success_rate: f64,
    pub status_flip_rate: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_ms: defaults::TICK_MS,
            tagging_delay_ms: defaults::TAGGING_DELAY_MS,
            note_delay_ms: defaults::NOTE_DELAY_MS,
            suggestions_delay_ms: defaults::SUGGESTIONS_DELAY_MS,
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            rng_seed: None,
            integration_success_rate: defaults::INTEGRATION_SUCCESS_RATE,
            status_flip_rate: defaults::STATUS_FLIP_RATE,
        }
    }
}

impl SessionConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn tagging_delay(&self) -> Duration {
        Duration::from_millis(self.tagging_delay_ms)
    }

    pub fn note_delay(&self) -> Duration {
        Duration::from_millis(self.note_delay_ms)
    }

    pub fn suggestions_delay(&self) -> Duration {
        Duration::from_millis(self.suggestions_delay_ms)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only falls back to defaults when the file is missing.
    /// Invalid TOML is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - CLINSIM_TICK_MS → session.tick_ms
    /// - CLINSIM_SEED → simulator.rng_seed
    ///
    /// Values that fail to parse are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(tick) = std::env::var("CLINSIM_TICK_MS")
            && let Ok(ms) = tick.parse::<u64>()
        {
            self.session.tick_ms = ms;
        }

        if let Ok(seed) = std::env::var("CLINSIM_SEED")
            && let Ok(seed) = seed.parse::<u64>()
        {
            self.simulator.rng_seed = Some(seed);
        }

        self
    }

    /// Reject values the simulator cannot run with. The tick period must
    /// be non-zero and the probability knobs must be valid probabilities.
    pub fn validate(&self) -> Result<()> {
        if self.session.tick_ms == 0 {
            return Err(SimError::ConfigInvalidValue {
                key: "session.tick_ms".to_string(),
                message: "tick period must be greater than zero".to_string(),
            });
        }
        for (key, rate) in [
            (
                "simulator.integration_success_rate",
                self.simulator.integration_success_rate,
            ),
            ("simulator.status_flip_rate", self.simulator.status_flip_rate),
        ] {
            if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
                return Err(SimError::ConfigInvalidValue {
                    key: key.to_string(),
                    message: format!("expected a probability between 0 and 1, got {rate}"),
                });
            }
        }
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/clinsim/config.toml on Linux
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("clinsim").join("config.toml"))
    }
}
