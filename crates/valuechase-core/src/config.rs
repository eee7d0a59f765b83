use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::chase::Ease;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub chase: ChaseConfig,
    #[serde(default)]
    pub ticker: TickerConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Chaser construction options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChaseConfig {
    /// Lower bound of the range used to normalize values for easing
    #[serde(default = "default_min")]
    pub min: f64,
    /// Upper bound; targets above it are clamped
    #[serde(default = "default_max")]
    pub max: f64,
    /// Decimal digits of precision used for rounding and arrival detection
    #[serde(default = "default_tolerance")]
    pub tolerance: u32,
    /// Resistance; larger values converge more slowly
    #[serde(default = "default_friction")]
    pub friction: f64,
    /// Progress value applied by `start` when none is passed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<f64>,
    /// Easing curve shaping velocity (linear motion when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ease: Option<Ease>,
    /// Pause the frame source once the value settles
    #[serde(default = "default_true")]
    pub idle: bool,
}

impl Default for ChaseConfig {
    fn default() -> Self {
        Self {
            min: default_min(),
            max: default_max(),
            tolerance: default_tolerance(),
            friction: default_friction(),
            initial: None,
            ease: None,
            idle: default_true(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerConfig {
    /// Target frame rate
    #[serde(default = "default_fps")]
    pub fps: f64,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self { fps: default_fps() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Poll interval in milliseconds while no frames are running
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Amount the demo target moves per key press
    #[serde(default = "default_step")]
    pub step: f64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            step: default_step(),
        }
    }
}

/// Named easing curves, Penner style `(t, b, c, d)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingType {
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InCirc,
    OutCirc,
    InOutCirc,
    OutExpo,
    InSine,
    OutSine,
}

impl EasingType {
    pub const ALL: [EasingType; 13] = [
        EasingType::Linear,
        EasingType::InQuad,
        EasingType::OutQuad,
        EasingType::InOutQuad,
        EasingType::InCubic,
        EasingType::OutCubic,
        EasingType::InOutCubic,
        EasingType::InCirc,
        EasingType::OutCirc,
        EasingType::InOutCirc,
        EasingType::OutExpo,
        EasingType::InSine,
        EasingType::OutSine,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EasingType::Linear => "linear",
            EasingType::InQuad => "in_quad",
            EasingType::OutQuad => "out_quad",
            EasingType::InOutQuad => "in_out_quad",
            EasingType::InCubic => "in_cubic",
            EasingType::OutCubic => "out_cubic",
            EasingType::InOutCubic => "in_out_cubic",
            EasingType::InCirc => "in_circ",
            EasingType::OutCirc => "out_circ",
            EasingType::InOutCirc => "in_out_circ",
            EasingType::OutExpo => "out_expo",
            EasingType::InSine => "in_sine",
            EasingType::OutSine => "out_sine",
        }
    }
}

impl FromStr for EasingType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_").to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|e| e.name() == wanted)
            .ok_or_else(|| crate::Error::UnknownEase(s.to_string()))
    }
}

impl std::fmt::Display for EasingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_min() -> f64 {
    0.0
}

fn default_max() -> f64 {
    1.0
}

fn default_tolerance() -> u32 {
    4
}

fn default_friction() -> f64 {
    10.0
}

fn default_true() -> bool {
    true
}

fn default_fps() -> f64 {
    60.0
}

fn default_tick_rate() -> u64 {
    250
}

fn default_step() -> f64 {
    0.05
}

impl AppConfig {
    /// Load configuration from the default path or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults when it is missing
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self =
                toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
            tracing::debug!(path = %path.display(), "Loaded configuration");
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> crate::Result<PathBuf> {
        let path = Self::config_path();
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/valuechase/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("valuechase")
            .join("config.toml")
    }
}
