//! Configuration for Skyline.
//!
//! Settings persist to disk as `config.ron`. CLI flags override loaded values;
//! missing fields fall back to defaults so older files keep loading.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{Config, DebugConfig, DriverConfig, WorldConfig, default_config_dir};
pub use error::ConfigError;
