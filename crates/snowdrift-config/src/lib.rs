//! Configuration file handling for snowdrift.
//!
//! Settings live in `config.toml` under the platform config directory.
//! Every section has defaults, so a partial file (or none at all) works.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use snowdrift_core::Rgb;

const CONFIG_FILE: &str = "config.toml";

/// Snow intensity at which the flake pool is full (300 flakes).
pub const MAX_INTENSITY: f32 = 150.0;

/// Upper bound on debris per burst.
pub const MAX_PARTICLE_COUNT: usize = 20_000;

/// Errors loading or saving the configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// The platform has no home/config directory.
    NoConfigDir,
    Io(io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoConfigDir => write!(f, "could not determine a config directory"),
            ConfigError::Io(e) => write!(f, "config file I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "invalid config file: {e}"),
            ConfigError::Serialize(e) => write!(f, "could not serialize config: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::NoConfigDir => None,
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Serialize(e) => Some(e),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Serialize(e)
    }
}

/// Snowfall settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowSettings {
    /// Snowfall intensity; twice this many flakes fall, up to 300.
    pub intensity: f32,
    /// Flake and pile color, e.g. `#ffffff` or `rgb(200, 230, 255)`.
    pub color: String,
    /// Fraction of the screen height the pile may fill.
    pub max_accumulation: f32,
}

impl Default for SnowSettings {
    fn default() -> Self {
        Self {
            intensity: 60.0,
            color: "#ffffff".to_string(),
            max_accumulation: 0.3,
        }
    }
}

/// Countdown settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountdownSettings {
    pub minutes: u32,
    pub seconds: u32,
    /// Digit and debris color.
    pub color: String,
}

impl Default for CountdownSettings {
    fn default() -> Self {
        Self {
            minutes: 0,
            seconds: 10,
            color: "#00ff00".to_string(),
        }
    }
}

/// Explosion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionSettings {
    pub particle_count: usize,
}

impl Default for ExplosionSettings {
    fn default() -> Self {
        Self {
            particle_count: 1000,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Milliseconds between frames.
    pub frame_ms: u64,
    /// Fixed random seed for repeatable runs.
    pub seed: Option<u64>,
    /// Log level for the log file (`error` .. `trace`). No file when unset.
    pub log_level: Option<String>,
    pub snow: SnowSettings,
    pub countdown: CountdownSettings,
    pub explosion: ExplosionSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_ms: 33,
            seed: None,
            log_level: None,
            snow: SnowSettings::default(),
            countdown: CountdownSettings::default(),
            explosion: ExplosionSettings::default(),
        }
    }
}

impl Config {
    /// Load from the default location, falling back to defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load from an explicit path, falling back to defaults when missing.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Parse and sanitize TOML text.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        Ok(config.sanitized())
    }

    /// Write to the default location, creating the directory if needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Path of the configuration file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        project_dirs()
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Directory for runtime data such as the log file.
    pub fn data_dir() -> Result<PathBuf, ConfigError> {
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Clamp every value into its valid range.
    pub fn sanitized(mut self) -> Self {
        let intensity = self.snow.intensity;
        if intensity.is_nan() || intensity < 0.0 {
            log::warn!("snow intensity {intensity} clamped to 0");
            self.snow.intensity = 0.0;
        } else if intensity > MAX_INTENSITY {
            log::warn!("snow intensity {intensity} clamped to {MAX_INTENSITY}");
            self.snow.intensity = MAX_INTENSITY;
        }
        let fraction = self.snow.max_accumulation;
        if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
            let clamped = if fraction.is_finite() && fraction > 1.0 {
                1.0
            } else {
                SnowSettings::default().max_accumulation
            };
            log::warn!("max_accumulation {fraction} clamped to {clamped}");
            self.snow.max_accumulation = clamped;
        }
        self.countdown.minutes = self.countdown.minutes.min(99);
        self.countdown.seconds = self.countdown.seconds.min(59);
        self.explosion.particle_count = self.explosion.particle_count.min(MAX_PARTICLE_COUNT);
        self.frame_ms = self.frame_ms.clamp(10, 1000);
        self
    }

    /// Parsed snow color, white when the string is not understood.
    pub fn snow_color(&self) -> Rgb {
        parse_color_or(&self.snow.color, Rgb::WHITE)
    }

    /// Parsed countdown color, green when the string is not understood.
    pub fn countdown_color(&self) -> Rgb {
        parse_color_or(&self.countdown.color, Rgb::GREEN)
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "snowdrift")
}

fn parse_color_or(input: &str, fallback: Rgb) -> Rgb {
    input.parse().unwrap_or_else(|e| {
        log::warn!("{e}, using {}", fallback.to_hex());
        fallback
    })
}
