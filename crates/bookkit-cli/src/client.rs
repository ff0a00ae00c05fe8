//! CLI error type and wiring of configuration, logging and the book manager.

use std::fmt::{self, Display, Formatter};
use std::path::Path;

use bookkit_app::{HttpBookManager, build_manager};
use bookkit_config::{LogFormatSetting, ManagerConfig};
use bookkit_telemetry::{LogFormat, LoggingConfig, init_logging};
use tracing::debug;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

/// Load layered configuration from defaults, the optional file and the
/// environment.
pub(crate) fn load_config(path: Option<&Path>) -> CliResult<ManagerConfig> {
    bookkit_config::load(path).map_err(CliError::failure)
}

/// Install the tracing subscriber described by the `logging` section.
///
/// A subscriber that is already installed is kept.
pub(crate) fn init_telemetry(config: &ManagerConfig) {
    let format = match config.logging.format {
        Some(LogFormatSetting::Json) => LogFormat::Json,
        Some(LogFormatSetting::Pretty) => LogFormat::Pretty,
        None => LogFormat::infer(),
    };
    let logging = LoggingConfig {
        level: &config.logging.level,
        format,
    };
    if let Err(error) = init_logging(&logging) {
        debug!(error = %error, "keeping existing tracing subscriber");
    }
}

/// Build the HTTP-backed manager for this run.
pub(crate) fn connect(config: &ManagerConfig, request_id: &str) -> CliResult<HttpBookManager> {
    build_manager(config, request_id).map_err(CliError::failure)
}
