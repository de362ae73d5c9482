use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{Config, LogFormat};

const ENV_VAR: &str = "COURIER_LOG";

/// Removes the log file on drop when nothing was written to it, unless
/// verbose logging was requested.
#[derive(Debug)]
pub struct LogGuard {
    path: PathBuf,
    keep: bool,
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        if let Ok(meta) = fs::metadata(&self.path) {
            if meta.len() == 0 {
                let _ = fs::remove_file(&self.path);
            }
        }
    }
}

/// `<data_dir>/log/courier.<YYYYMMDD>.<pid>.log`
pub fn default_log_path(data_dir: &Path) -> PathBuf {
    let date = chrono::Local::now().format("%Y%m%d");
    data_dir
        .join("log")
        .join(format!("courier.{}.{}.log", date, std::process::id()))
}

fn is_verbose(level: &str) -> bool {
    matches!(level.to_ascii_lowercase().as_str(), "debug" | "trace")
}

fn env_filter(level: &str) -> anyhow::Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_env(ENV_VAR) {
        return Ok(filter);
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(level).with_context(|| format!("invalid log level '{}'", level))
}

fn open_log_file(path: &Path) -> anyhow::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("could not create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("could not open log file {}", path.display()))
}

/// Installs the global subscriber. The terminal belongs to the UI, so logs
/// only ever go to a file.
pub fn setup_logging(config: &Config) -> anyhow::Result<LogGuard> {
    let path = config
        .log
        .path
        .clone()
        .unwrap_or_else(|| default_log_path(&config.data_dir));
    let file = open_log_file(&path)?;
    let filter = env_filter(&config.log.level)?;

    let layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true);
    let layer = match config.log.format {
        LogFormat::Json => layer.json().boxed(),
        LogFormat::Text => layer.boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .context("could not install log subscriber")?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        path = %path.display(),
        "logging started"
    );

    Ok(LogGuard {
        path,
        keep: is_verbose(&config.log.level),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_path_shape() {
        let path = default_log_path(Path::new("/data"));
        assert_eq!(path.parent(), Some(Path::new("/data/log")));
        let name = path.file_name().unwrap().to_str().unwrap();
        let parts: Vec<&str> = name.split('.').collect();
        assert_eq!(parts[0], "courier");
        assert_eq!(parts[1].len(), 8);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2], std::process::id().to_string());
        assert_eq!(parts[3], "log");
    }

    #[test]
    fn test_guard_removes_empty_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("log").join("empty.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());

        drop(LogGuard {
            path: path.clone(),
            keep: false,
        });
        assert!(!path.exists());
    }

    #[test]
    fn test_guard_keeps_written_or_verbose_file() {
        let tmp = tempfile::tempdir().unwrap();
        let written = tmp.path().join("written.log");
        fs::write(&written, "line\n").unwrap();
        drop(LogGuard {
            path: written.clone(),
            keep: false,
        });
        assert!(written.exists());

        let verbose = tmp.path().join("verbose.log");
        open_log_file(&verbose).unwrap();
        drop(LogGuard {
            path: verbose.clone(),
            keep: true,
        });
        assert!(verbose.exists());
    }

    #[test]
    fn test_verbose_levels() {
        assert!(is_verbose("DEBUG"));
        assert!(is_verbose("trace"));
        assert!(!is_verbose("info"));
    }
}
