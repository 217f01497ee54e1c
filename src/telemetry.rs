//! Tracing setup.
//!
//! The terminal belongs to the UI, so events go to
//! `<data_dir>/pocketpr/pocketpr.log` instead of stdout. `POCKETPR_LOG`
//! overrides the configured filter (same syntax as `RUST_LOG`).

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub fn log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pocketpr")
        .join("pocketpr.log")
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

pub fn init_tracing(default_filter: &str, json: bool) {
    init_tracing_at(&log_path(), default_filter, json);
}

/// Installs the file subscriber. An unusable log file only costs the logs:
/// a warning goes to stderr and the game runs without a subscriber.
/// Returns whether a subscriber was installed.
pub fn init_tracing_at(path: &Path, default_filter: &str, json: bool) -> bool {
    let file = match open_log_file(path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("warning: logging disabled, cannot open {}: {err}", path.display());
            return false;
        }
    };

    let filter = EnvFilter::try_from_env("POCKETPR_LOG")
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);

    let installed = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.is_ok()
}
