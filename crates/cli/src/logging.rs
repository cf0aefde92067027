use crate::error::CliError;
use chrono::{DateTime, Local};
use std::{
    fs::{self, File, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_DIR: &str = "tmp/logs";

/// `export_<YYYY-MM-DD_HH-MM>.log` under `dir`.
pub fn log_file_path(dir: &Path, now: DateTime<Local>) -> PathBuf {
    dir.join(format!("export_{}.log", now.format("%Y-%m-%d_%H-%M")))
}

fn open_log_file(path: &Path) -> Result<File, CliError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Console output always; an append-only log file unless disabled.
/// `RUST_LOG` overrides the default `info` filter.
pub fn init(log_to_file: bool) -> Result<Option<PathBuf>, CliError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console = fmt::layer().with_target(false);

    let (file_layer, path) = if log_to_file {
        let path = log_file_path(Path::new(LOG_DIR), Local::now());
        let file = open_log_file(&path)?;
        let layer = fmt::layer()
            .with_ansi(false)
            .with_writer(Mutex::new(file));
        (Some(layer), Some(path))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))?;

    Ok(path)
}
