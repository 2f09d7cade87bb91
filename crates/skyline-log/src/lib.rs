//! Structured logging for Skyline.
//!
//! Console output with uptime timestamps and module paths, plus JSON file
//! logging in debug builds. The level comes from `RUST_LOG`, then from the
//! config's `debug.log_level`, then falls back to `info`.

use std::fs::File;
use std::path::Path;

use skyline_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// File name of the JSON log written in debug builds.
pub const LOG_FILE: &str = "skyline.log";

const DEFAULT_FILTER: &str = "info";

/// Initialize the global tracing subscriber.
///
/// * `log_dir` - Optional directory for the JSON log file (debug builds only)
/// * `debug_build` - Whether this is a debug build (enables file logging)
/// * `config` - Optional configuration supplying the log level
///
/// # Examples
///
/// ```no_run
/// use skyline_config::Config;
/// use skyline_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config));
/// ```
pub fn init_logging(log_dir: Option<&Path>, debug_build: bool, config: Option<&Config>) {
    let directive = filter_directive(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directive));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && let Some(log_file) = open_log_file(log_dir)
    {
        let file_layer = fmt::layer()
            .with_writer(log_file)
            .with_ansi(false)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .json();

        subscriber.with(file_layer).init();
        return;
    }

    subscriber.init();
}

/// Filter used when `RUST_LOG` is unset and no config level applies.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}

/// Filter directive taken from the config, or the default one.
fn filter_directive(config: Option<&Config>) -> String {
    config
        .map(|config| config.debug.log_level.trim())
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

fn open_log_file(log_dir: &Path) -> Option<File> {
    std::fs::create_dir_all(log_dir).ok()?;
    File::create(log_dir.join(LOG_FILE)).ok()
}
