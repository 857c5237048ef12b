// File-based logging: every tracing event goes to stderr and to a timestamped log file.
//
// Creates a new log file on every app launch:
//   ~/.local/share/com.docsight.app/logs/docsight-2026-03-01_14-30-00.log
//
// Keeps last 5 log files, deletes older ones. RUST_LOG overrides the default filter.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};

use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

const LOG_PREFIX: &str = "docsight-";
const KEEP_LOGS: usize = 5;
const DEFAULT_FILTER: &str = "info,docsight_lib=debug";

/// Initialize logging. Call once at app startup, before anything logs.
///
/// Installs a global subscriber with a stderr layer and a file layer. If the
/// file cannot be opened, falls back to stderr-only so the app still starts.
pub fn init(logs_dir: &Path) {
    INIT.call_once(|| {
        if let Err(e) = setup_logging(logs_dir) {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(io::stderr)
                .try_init();
            warn!("Failed to initialize file logging: {}", e);
        }
    });
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn setup_logging(logs_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(logs_dir)?;

    rotate_logs(logs_dir, KEEP_LOGS)?;

    let timestamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    let log_file_path = logs_dir.join(format!("{}{}.log", LOG_PREFIX, timestamp));

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(io::stderr))
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(Mutex::new(log_file)),
        )
        .try_init()?;

    info!(path = %log_file_path.display(), "Logging: writing to file");
    Ok(())
}

/// Delete old log files, keeping the most recent `keep` files.
pub fn rotate_logs(logs_dir: &Path, keep: usize) -> Result<(), io::Error> {
    let mut log_files: Vec<(PathBuf, std::time::SystemTime)> = Vec::new();

    for entry in fs::read_dir(logs_dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("log")
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with(LOG_PREFIX))
                .unwrap_or(false)
        {
            if let Ok(metadata) = entry.metadata() {
                let modified = metadata.modified().unwrap_or(std::time::UNIX_EPOCH);
                log_files.push((path, modified));
            }
        }
    }

    // Newest first; name breaks ties since names embed the launch timestamp
    log_files.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));

    for (path, _) in log_files.iter().skip(keep) {
        info!("Logging: removing old log {}", path.display());
        let _ = fs::remove_file(path);
    }

    Ok(())
}

/// Get the logs directory path.
pub fn logs_dir() -> Option<PathBuf> {
    crate::files::app_base_dir().map(|d| d.join("logs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_logs_keeps_newest() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..8 {
            let name = format!("docsight-2026-01-0{}_00-00-00.log", i + 1);
            fs::write(dir.path().join(name), "x").unwrap();
        }
        fs::write(dir.path().join("other.log"), "x").unwrap();
        fs::write(dir.path().join("docsight-notes.txt"), "x").unwrap();

        rotate_logs(dir.path(), 5).unwrap();

        let mut remaining: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .filter(|n| n.starts_with(LOG_PREFIX) && n.ends_with(".log"))
            .collect();
        remaining.sort();
        assert_eq!(remaining.len(), 5);
        // Unrelated files are never touched
        assert!(dir.path().join("other.log").exists());
        assert!(dir.path().join("docsight-notes.txt").exists());
    }

    #[test]
    fn test_rotate_logs_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(rotate_logs(dir.path(), 5).is_ok());
    }
}
