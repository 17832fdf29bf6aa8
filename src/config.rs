//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`MODBOT_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use modbot_core::PlaybackController;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Playback configuration
    #[serde(default)]
    pub playback: PlaybackConfig,
    /// Scenario configuration
    #[serde(default)]
    pub scenario: ScenarioConfig,
    /// Export configuration
    #[serde(default)]
    pub export: ExportConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`MODBOT_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // MODBOT_PLAYBACK__ANIM_SPEED=2.5 -> playback.anim_speed = 2.5
        figment = figment.merge(Env::prefixed("MODBOT_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// How the raw speed setting maps to moves per second
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedCurve {
    /// Used as is
    Linear,
    /// Squared, for finer control at low speeds
    #[default]
    Quadratic,
}

impl SpeedCurve {
    /// Apply the curve to a raw speed setting
    pub fn apply(self, value: f32) -> f32 {
        let value = value.max(0.0);
        match self {
            SpeedCurve::Linear => value,
            SpeedCurve::Quadratic => value * value,
        }
    }
}

/// Playback configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Raw animation speed setting
    pub anim_speed: f32,
    /// Curve applied to `anim_speed`
    pub speed_curve: SpeedCurve,
    /// Keep playing past checkpoints without a new request
    pub auto_animate: bool,
    /// Fixed frame clock in Hz (0 = real time)
    pub frame_rate: u32,
    /// Stop after this many frames even if moves remain
    pub max_frames: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            anim_speed: 1.0,
            speed_curve: SpeedCurve::Quadratic,
            auto_animate: true,
            frame_rate: 60,
            max_frames: 100_000,
        }
    }
}

impl PlaybackConfig {
    /// Moves per second after the speed curve
    pub fn moves_per_second(&self) -> f32 {
        self.speed_curve.apply(self.anim_speed)
    }

    /// Create a playback controller with these settings
    pub fn to_controller(&self) -> PlaybackController {
        PlaybackController::new(self.moves_per_second(), self.auto_animate)
    }
}

/// Scenario configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Scenario to load when none is given on the command line
    pub path: Option<PathBuf>,
}

/// Export configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Where to write lattice exports after playback (none = skip)
    pub directory: Option<PathBuf>,
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug, Error)]
#[error("Configuration error: {0}")]
pub struct ConfigError(#[from] Box<figment::Error>);

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError(Box::new(e))
    }
}
