use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const ERROR_LOG_FILE: &str = "error.log";

pub fn error_log_path(config_dir: &Path) -> PathBuf {
    config_dir.join(ERROR_LOG_FILE)
}

/// Log to stderr (`RUST_LOG`, default warn, `-v` for debug) and append errors
/// to `error.log` in the config directory.
pub fn init(verbose: bool, config_dir: &Path) {
    let stderr_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(stderr_filter);

    // No error log if the config directory is not writable.
    let error_layer = open_error_log(config_dir).map(|file| {
        fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_filter(LevelFilter::ERROR)
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(error_layer)
        .init();
}

fn open_error_log(config_dir: &Path) -> Option<File> {
    fs::create_dir_all(config_dir).ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(error_log_path(config_dir))
        .ok()
}
