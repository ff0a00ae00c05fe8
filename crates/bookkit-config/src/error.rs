//! Error types for configuration loading.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for configuration results.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Primary error type for configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file {}", path.display())]
    Read {
        /// File that failed to load.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// Configuration file was not valid JSON for the expected shape.
    #[error("failed to parse configuration file {}", path.display())]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Source serde error.
        source: serde_json::Error,
    },
    /// Field contained an invalid value.
    #[error("invalid value for '{field}' in '{section}': {reason}")]
    InvalidField {
        /// Section that failed validation.
        section: &'static str,
        /// Field that failed validation.
        field: &'static str,
        /// Offending value when available.
        value: Option<String>,
        /// Human-readable reason for the failure.
        reason: &'static str,
    },
    /// Neither a token nor a complete access-code pair is configured.
    #[error("no credentials configured: set {token_env} or both access codes and a token URI")]
    MissingCredentials {
        /// Environment variable that supplies a pre-issued token.
        token_env: &'static str,
    },
}

impl ConfigError {
    pub(crate) const fn invalid(
        section: &'static str,
        field: &'static str,
        value: Option<String>,
        reason: &'static str,
    ) -> Self {
        Self::InvalidField {
            section,
            field,
            value,
            reason,
        }
    }
}
