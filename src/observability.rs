use std::fs;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};
use warden_common::{LogConfig, ObservabilityConfig};

use crate::config::WardenConfig;
use crate::error::Result;

const LOG_FILE_NAME: &str = "warden.log";

/// Guard for the non-blocking log writer; flushes on drop
#[derive(Default)]
pub struct ObservabilityGuard {
    log_guard: Option<WorkerGuard>,
}

impl ObservabilityGuard {
    pub fn is_file_backed(&self) -> bool {
        self.log_guard.is_some()
    }
}

/// Initialize logging based on configuration
///
/// Console output goes to stderr so command output on stdout stays machine-readable.
pub fn init_observability(config: &WardenConfig) -> Result<ObservabilityGuard> {
    let mut guard = ObservabilityGuard::default();
    let observability_config = &config.observability;

    if observability_config.is_file_logging() {
        fs::create_dir_all(&observability_config.log.path)?;
        let (non_blocking, worker_guard) = build_file_writer(&observability_config.log)?;
        guard.log_guard = Some(worker_guard);

        init_subscriber_with_writer(non_blocking, false, observability_config);
    } else {
        init_subscriber_with_writer(std::io::stderr, true, observability_config);
    }

    Ok(guard)
}

/// Create an EnvFilter from config, with RUST_LOG taking precedence
fn create_env_filter(config: &ObservabilityConfig) -> EnvFilter {
    let directive = config.effective_filter();

    EnvFilter::try_new(&directive).unwrap_or_else(|_| {
        eprintln!("Failed to parse filter directive: {directive}. Falling back to default: info");
        EnvFilter::new("info")
    })
}

fn init_subscriber_with_writer<W>(writer: W, use_ansi: bool, config: &ObservabilityConfig)
where
    W: for<'a> fmt::MakeWriter<'a> + Send + Sync + 'static,
{
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(use_ansi)
        .with_writer(writer);

    // a subscriber may already be installed (tests, embedding applications)
    tracing_subscriber::registry()
        .with(create_env_filter(config))
        .with(fmt_layer)
        .try_init()
        .ok();
}

fn build_file_writer(log_config: &LogConfig) -> Result<(NonBlocking, WorkerGuard)> {
    if log_config.rotate {
        let file_appender = tracing_appender::rolling::daily(&log_config.path, LOG_FILE_NAME);
        Ok(tracing_appender::non_blocking(file_appender))
    } else {
        let log_file_path = std::path::Path::new(&log_config.path).join(LOG_FILE_NAME);
        let file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file_path)?;
        Ok(tracing_appender::non_blocking(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_logging_creates_directory() {
        let dir = TempDir::new().unwrap();
        let log_dir = dir.path().join("logs");

        let mut config = WardenConfig::default();
        config.observability.log = LogConfig {
            output: "file".to_string(),
            rotate: false,
            path: log_dir.to_string_lossy().into_owned(),
        };

        let guard = init_observability(&config).unwrap();
        assert!(guard.is_file_backed());
        assert!(log_dir.join(LOG_FILE_NAME).exists());
    }

    #[test]
    fn test_bad_directive_falls_back() {
        let config = ObservabilityConfig {
            filter_level: "info,[[[".to_string(),
            ..Default::default()
        };
        // only checks that no panic occurs
        let _ = create_env_filter(&config);
    }
}
