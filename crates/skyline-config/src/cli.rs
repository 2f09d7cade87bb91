//! Command-line argument parsing for Skyline.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Skyline command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "skyline", about = "Procedural parallax skyline generator")]
pub struct CliArgs {
    /// World seed (any text).
    #[arg(long)]
    pub seed: Option<String>,

    /// Number of ticks to run.
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Viewport width in world units.
    #[arg(long)]
    pub viewport_width: Option<f64>,

    /// Camera speed in world units per second.
    #[arg(long)]
    pub camera_speed: Option<f64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Reseed the world after this many ticks.
    #[arg(long, requires = "reseed_seed")]
    pub reseed_at: Option<u64>,

    /// Seed used when reseeding.
    #[arg(long)]
    pub reseed_seed: Option<String>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(ref seed) = args.seed {
            self.world.seed = seed.clone();
        }
        if let Some(ticks) = args.ticks {
            self.driver.ticks = ticks;
        }
        if let Some(width) = args.viewport_width {
            self.driver.viewport_width = width;
        }
        if let Some(speed) = args.camera_speed {
            self.driver.camera_speed = speed;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            seed: Some("harbor".to_string()),
            ticks: Some(120),
            camera_speed: Some(400.0),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.world.seed, "harbor");
        assert_eq!(config.driver.ticks, 120);
        assert_eq!(config.driver.camera_speed, 400.0);
        // Non-overridden fields retain defaults
        assert_eq!(config.driver.viewport_width, 1280.0);
        assert_eq!(config.debug.log_level, "info");
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parse() {
        let args = CliArgs::try_parse_from([
            "skyline",
            "--seed",
            "alpha",
            "--viewport-width",
            "800",
            "--reseed-at",
            "10",
            "--reseed-seed",
            "beta",
        ])
        .unwrap();
        assert_eq!(args.seed.as_deref(), Some("alpha"));
        assert_eq!(args.viewport_width, Some(800.0));
        assert_eq!(args.reseed_at, Some(10));
        assert_eq!(args.reseed_seed.as_deref(), Some("beta"));
    }

    #[test]
    fn test_cli_reseed_requires_seed() {
        let result = CliArgs::try_parse_from(["skyline", "--reseed-at", "10"]);
        assert!(result.is_err());
    }
}
