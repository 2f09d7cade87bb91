//! Configuration structs with sensible defaults and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use skyline_procgen::{
    BiomePacing, DEFAULT_CAMERA_SPEED, DEFAULT_MAX_DT, DEFAULT_PRUNE_BUFFER,
    DEFAULT_VIEWPORT_WIDTH, LayerSpec, TreeConfig, WorldSettings,
};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Default config directory: `<platform config dir>/skyline`, or `./skyline`
/// when the platform has none.
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skyline")
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// World generation settings.
    pub world: WorldConfig,
    /// Tick driver settings.
    pub driver: DriverConfig,
    /// Vegetation table, keyed by kind.
    pub vegetation: TreeConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// World generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// Seed text. Any string is valid, including the empty one.
    pub seed: String,
    /// Parallax layers, far to near.
    pub layers: Vec<LayerSpec>,
    /// Distance kept behind the camera before objects are evicted.
    pub prune_buffer: f64,
    /// How the biome model advances per generate call.
    pub biome_pacing: BiomePacing,
}

/// Tick driver configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DriverConfig {
    /// Camera speed in world units per second.
    pub camera_speed: f64,
    /// Viewport width in world units.
    pub viewport_width: f64,
    /// Fixed tick rate (Hz).
    pub tick_rate_hz: u32,
    /// Number of ticks to run.
    pub ticks: u64,
    /// Largest time step a single tick integrates.
    pub max_dt: f64,
    /// Log a progress line every this many ticks (0 = never).
    pub report_every: u64,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: "default".to_string(),
            layers: LayerSpec::default_stack(),
            prune_buffer: DEFAULT_PRUNE_BUFFER,
            biome_pacing: BiomePacing::default(),
        }
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            camera_speed: DEFAULT_CAMERA_SPEED,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            tick_rate_hz: 60,
            ticks: 3600,
            max_dt: DEFAULT_MAX_DT,
            report_every: 600,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Derived settings ---

impl Config {
    /// World tunables assembled from the world and driver sections.
    pub fn world_settings(&self) -> WorldSettings {
        WorldSettings {
            camera_speed: self.driver.camera_speed,
            viewport_width: self.driver.viewport_width,
            max_dt: self.driver.max_dt,
            prune_buffer: self.world.prune_buffer,
            biome_pacing: self.world.biome_pacing,
        }
    }

    /// Fixed time step of the driver in seconds.
    pub fn tick_dt(&self) -> f64 {
        1.0 / f64::from(self.driver.tick_rate_hz.max(1))
    }

    /// Check every setting the world cannot run without.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.layers.is_empty() {
            return Err(invalid("world.layers", "at least one layer is required"));
        }
        for layer in &self.world.layers {
            if !layer.speed_factor.is_finite() || layer.speed_factor < 0.0 {
                return Err(invalid(
                    "world.layers",
                    format!("speed_factor {} must be finite and >= 0", layer.speed_factor),
                ));
            }
            if !layer.scale.is_finite() || layer.scale <= 0.0 {
                return Err(invalid(
                    "world.layers",
                    format!("scale {} must be positive", layer.scale),
                ));
            }
        }
        if !self.world.prune_buffer.is_finite() || self.world.prune_buffer < 0.0 {
            return Err(invalid(
                "world.prune_buffer",
                format!("{} must be finite and >= 0", self.world.prune_buffer),
            ));
        }
        if let BiomePacing::FixedTick(step) = self.world.biome_pacing
            && (!step.is_finite() || step < 0.0)
        {
            return Err(invalid(
                "world.biome_pacing",
                format!("fixed step {step} must be finite and >= 0"),
            ));
        }
        if !self.driver.viewport_width.is_finite() || self.driver.viewport_width <= 0.0 {
            return Err(invalid(
                "driver.viewport_width",
                format!("{} must be positive", self.driver.viewport_width),
            ));
        }
        if !self.driver.camera_speed.is_finite() || self.driver.camera_speed < 0.0 {
            return Err(invalid(
                "driver.camera_speed",
                format!("{} must be finite and >= 0", self.driver.camera_speed),
            ));
        }
        if self.driver.tick_rate_hz == 0 {
            return Err(invalid("driver.tick_rate_hz", "must be at least 1"));
        }
        if !self.driver.max_dt.is_finite() || self.driver.max_dt <= 0.0 {
            return Err(invalid(
                "driver.max_dt",
                format!("{} must be positive", self.driver.max_dt),
            ));
        }
        self.vegetation.validate()?;
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.into(),
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        log::debug!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;

        if &new_config != self {
            new_config.validate()?;
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        ron::from_str(&contents).map_err(ConfigError::ParseError)
    }
}
