use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

const APP_DIR_NAME: &str = "grid-snake";
const LOG_FILE_NAME: &str = "grid-snake.log";
const DEFAULT_FILTER: &str = "grid_snake=info";

/// Returns the platform-correct log file path.
#[must_use]
pub fn log_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push(LOG_FILE_NAME);
    base
}

/// Installs a file-backed subscriber. The terminal belongs to the UI, so
/// nothing is written to stdout or stderr.
///
/// `RUST_LOG` overrides the default `grid_snake=info` filter.
pub fn init(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(|error| io::Error::other(error.to_string()))
}
