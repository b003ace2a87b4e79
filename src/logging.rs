//! Tracing setup shared by both binaries
//!
//! The level in [`LoggingOptions`] is already resolved (config file, then
//! `DUCKQR_LOG_LEVEL`, then `--log-level`); this module only turns it into a
//! subscriber. Console output goes to stderr since stdout carries tool output.

use crate::config::{LogRotation, LoggingOptions};
use crate::error::{Error, Result};
use std::fs::OpenOptions;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard};
use tracing_appender::rolling;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Install the global subscriber. A second call is a no-op.
pub fn init(options: &LoggingOptions) -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let filter = env_filter(options)?;
    let file = match options.file.as_deref() {
        Some(path) => Some(file_writer(path, options.rotation)?),
        None => None,
    };

    Registry::default()
        .with(filter)
        .with(file.map(|writer| file_layer(writer)))
        .with(console_layer(use_ansi(options)))
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to install tracing subscriber: {e}")))
}

/// Filter built from the configured level only.
pub fn env_filter(options: &LoggingOptions) -> Result<EnvFilter> {
    EnvFilter::try_new(options.level.as_str())
        .map_err(|e| Error::Config(format!("Invalid log level '{}': {e}", options.level)))
}

/// ANSI colors: explicit setting wins, otherwise only when stderr is a terminal.
pub fn use_ansi(options: &LoggingOptions) -> bool {
    options.color.unwrap_or_else(|| io::stderr().is_terminal())
}

fn log_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn file_writer(path: &Path, rotation: Option<LogRotation>) -> Result<NonBlocking> {
    let dir = log_dir(path);
    std::fs::create_dir_all(&dir).map_err(|e| {
        Error::Config(format!(
            "Failed to create log directory {}: {e}",
            dir.display()
        ))
    })?;

    let builder = NonBlockingBuilder::default().lossy(false);
    let (writer, guard) = match rotation {
        Some(rotation) => {
            let file_name = path.file_name().ok_or_else(|| {
                Error::Config(format!(
                    "Log file path '{}' needs a file name for rotation",
                    path.display()
                ))
            })?;
            let appender = match rotation {
                LogRotation::Hourly => rolling::hourly(&dir, file_name),
                LogRotation::Daily => rolling::daily(&dir, file_name),
            };
            builder.finish(appender)
        }
        None => {
            let file = OpenOptions::new()
                .append(true)
                .create(true)
                .open(path)
                .map_err(|e| {
                    Error::Config(format!("Failed to open log file {}: {e}", path.display()))
                })?;
            builder.finish(file)
        }
    };

    // Flushes pending lines when the process exits.
    let _ = FILE_GUARD.set(guard);
    Ok(writer)
}

fn file_layer<S>(writer: NonBlocking) -> BoxedLayer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span> + Send + Sync + 'static,
{
    fmt::layer()
        .with_timer(UtcTime::rfc_3339())
        .with_ansi(false)
        .with_writer(writer)
        .boxed()
}

fn console_layer<S>(ansi: bool) -> BoxedLayer<S>
where
    S: Subscriber + for<'span> LookupSpan<'span> + Send + Sync + 'static,
{
    fmt::layer()
        .with_timer(UtcTime::rfc_3339())
        .with_writer(io::stderr)
        .with_ansi(ansi)
        .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn test_filter_uses_configured_level() {
        let options = LoggingOptions {
            level: "duck_tools=debug,reqwest=warn".to_string(),
            ..LoggingOptions::default()
        };
        let filter = env_filter(&options).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));

        let quiet = env_filter(&LoggingOptions::quiet()).unwrap();
        assert_eq!(quiet.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_invalid_level_rejected() {
        let options = LoggingOptions {
            level: "duck_tools=notalevel".to_string(),
            ..LoggingOptions::default()
        };
        assert!(matches!(env_filter(&options), Err(Error::Config(_))));
    }

    #[test]
    fn test_explicit_color_wins() {
        let mut options = LoggingOptions::default();
        options.color = Some(true);
        assert!(use_ansi(&options));
        options.color = Some(false);
        assert!(!use_ansi(&options));
    }

    #[test]
    fn test_log_dir() {
        assert_eq!(log_dir(Path::new("app.log")), PathBuf::from("."));
        assert_eq!(log_dir(Path::new("/var/log/duck/app.log")), PathBuf::from("/var/log/duck"));
    }

    #[test]
    fn test_file_writer_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("logs").join("duckqr.log");
        file_writer(&path, None).unwrap();
        assert!(path.exists());
    }
}
