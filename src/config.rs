use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const ROUND_WINDOW_MS: u64 = 500;
pub const MISS_POINTS: i32 = 0;
pub const TOO_LATE_POINTS: i32 = -1000;
pub const NEW_ROUND_DELAY_MS: u64 = 550;
pub const START_DELAY_MS: u64 = 50;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How long the player has to answer once the top icon is up. Also the
    /// delay between the bottom reveal and the top reveal.
    pub round_window_ms: u64,
    pub start_delay_ms: u64,
    pub new_round_delay_ms: u64,
    pub miss_points: i32,
    pub too_late_points: i32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            round_window_ms: ROUND_WINDOW_MS,
            start_delay_ms: START_DELAY_MS,
            new_round_delay_ms: NEW_ROUND_DELAY_MS,
            miss_points: MISS_POINTS,
            too_late_points: TOO_LATE_POINTS,
        }
    }
}

impl TimingConfig {
    /// Highest clamped reaction time, and the points for an instant correct answer.
    pub fn max_points_to_correct(&self) -> u64 {
        self.round_window_ms.saturating_sub(1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round_window_ms == 0 {
            return Err(ConfigError::Invalid("round_window_ms must be at least 1".into()));
        }
        if self.start_delay_ms == 0 || self.new_round_delay_ms == 0 {
            return Err(ConfigError::Invalid("delays must be at least 1 ms".into()));
        }
        if self.max_points_to_correct() > i32::MAX as u64 {
            return Err(ConfigError::Invalid("round_window_ms is too large".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub timing: TimingConfig,
    /// Fixed RNG seed; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig = toml::from_str(s)?;
        cfg.timing.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }
}
