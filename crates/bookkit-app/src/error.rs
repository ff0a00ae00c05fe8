//! # Design
//!
//! - Centralize errors raised while orchestrating book operations.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Preserve source errors without re-logging at call sites.

use bookkit_client::RemoteError;
use bookkit_config::ConfigError;
use bookkit_core::MenuError;
use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// No session could be obtained.
    #[error("authentication failed")]
    Authenticate {
        /// Source remote error.
        source: RemoteError,
    },
    /// A remote command failed after any retries.
    #[error("remote operation {operation} failed")]
    Remote {
        /// Operation identifier.
        operation: &'static str,
        /// Source remote error.
        source: RemoteError,
    },
    /// The menu structure could not be decoded.
    #[error("book structure response could not be decoded")]
    MenuDecode {
        /// Source serde error.
        source: serde_json::Error,
    },
    /// The menu chain is malformed below a root page.
    #[error("malformed menu below page {root}")]
    Menu {
        /// Root page being extracted.
        root: String,
        /// Source menu error.
        source: MenuError,
    },
    /// Runtime configuration could not be turned into collaborators.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: ConfigError,
    },
    /// A configured token endpoint was not a valid URL.
    #[error("invalid token endpoint")]
    InvalidTokenUri {
        /// Offending value.
        value: String,
    },
}

impl AppError {
    pub(crate) const fn remote(operation: &'static str, source: RemoteError) -> Self {
        Self::Remote { operation, source }
    }

    pub(crate) const fn config(operation: &'static str, source: ConfigError) -> Self {
        Self::Config { operation, source }
    }

    /// HTTP status behind the failure, when a remote call produced one.
    #[must_use]
    pub const fn remote_status(&self) -> Option<u16> {
        match self {
            Self::Authenticate { source } | Self::Remote { source, .. } => source.status(),
            Self::MenuDecode { .. }
            | Self::Menu { .. }
            | Self::Config { .. }
            | Self::InvalidTokenUri { .. } => None,
        }
    }
}
