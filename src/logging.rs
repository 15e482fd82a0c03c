//! Tracing initialization for hosts embedding the wizard core.
//!
//! The embedding shell calls [`init_logging`] once at startup; the store and
//! migration internals only emit `tracing` events and never touch the
//! subscriber themselves. With file logging enabled, events land in
//! `<state>/logs/` under a timestamped filename; otherwise they go to stderr.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::AppConfig;

pub struct LoggingHandle {
    /// Keeps the non-blocking writer alive; dropping the handle flushes any
    /// buffered events.
    pub _guard: Option<WorkerGuard>,

    /// Path of the active log file, when file logging is enabled.
    pub log_file_path: Option<PathBuf>,
}

/// Timestamped filename so concurrent sessions never clobber each other.
fn log_file_name() -> String {
    format!("appdraft-{}.log", chrono::Utc::now().format("%Y%m%dT%H%M%SZ"))
}

/// Install the global tracing subscriber per [`AppConfig`].
///
/// `RUST_LOG` takes precedence over the configured level; `debug_override`
/// forces `debug` when `RUST_LOG` is unset.
pub fn init_logging(config: &AppConfig, debug_override: bool) -> Result<LoggingHandle> {
    let level = if debug_override {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string()));

    if config.logging.to_file {
        let logs_dir = config.logs_path();
        std::fs::create_dir_all(&logs_dir)
            .with_context(|| format!("Failed to create log directory {}", logs_dir.display()))?;

        let file_name = log_file_name();
        let appender = tracing_appender::rolling::never(&logs_dir, &file_name);
        let (writer, guard) = tracing_appender::non_blocking(appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_ansi(false) // No ANSI codes in log files
                    .with_writer(writer),
            )
            .try_init()
            .context("Failed to install tracing subscriber")?;

        Ok(LoggingHandle {
            _guard: Some(guard),
            log_file_path: Some(logs_dir.join(file_name)),
        })
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .context("Failed to install tracing subscriber")?;

        Ok(LoggingHandle {
            _guard: None,
            log_file_path: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_file_name_is_timestamped() {
        let name = log_file_name();
        assert!(name.starts_with("appdraft-"));
        assert!(name.ends_with("Z.log"));
    }

    #[test]
    fn test_init_logging_writes_to_configured_file() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = AppConfig::default();
        config.paths.state = temp_dir.path().to_string_lossy().to_string();

        let handle = init_logging(&config, false).unwrap();
        let path = handle.log_file_path.clone().unwrap();
        tracing::info!("wizard core online");
        drop(handle); // flush the non-blocking writer

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("wizard core online"));
    }
}
