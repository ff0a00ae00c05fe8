//! Typed configuration models.
//!
//! Every section derives `Default` so a missing file or a partial file falls
//! back to the documented defaults field by field.

use serde::{Deserialize, Serialize};

use crate::defaults;

/// Complete configuration for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManagerConfig {
    /// Retry policy for write commands.
    pub retry: RetrySettings,
    /// HTTP client settings.
    pub http: HttpSettings,
    /// Authentication credentials.
    pub auth: AuthSettings,
    /// Logging output.
    pub logging: LoggingSettings,
}

/// Retry policy for write commands.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrySettings {
    /// Attempts per write, including the first one.
    pub max_attempts: u32,
    /// Fixed pause between attempts in milliseconds.
    pub backoff_ms: u64,
    /// HTTP statuses treated as transient.
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: defaults::MAX_ATTEMPTS,
            backoff_ms: defaults::BACKOFF_MS,
            retryable_statuses: defaults::RETRYABLE_STATUSES.to_vec(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpSettings {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::TIMEOUT_SECS,
        }
    }
}

/// Authentication credentials.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthSettings {
    /// OIDC token endpoint used to exchange access codes.
    pub token_uri: Option<String>,
    /// Scope requested from the token endpoint.
    pub scope: String,
    /// First access code.
    pub access_code1: Option<String>,
    /// Second access code.
    pub access_code2: Option<String>,
    /// Pre-issued bearer token; takes precedence over access codes.
    pub token: Option<String>,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            token_uri: None,
            scope: defaults::SCOPE.to_string(),
            access_code1: None,
            access_code2: None,
            token: None,
        }
    }
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        formatter
            .debug_struct("AuthSettings")
            .field("token_uri", &self.token_uri)
            .field("scope", &self.scope)
            .field("access_code1", &redact(&self.access_code1))
            .field("access_code2", &redact(&self.access_code2))
            .field("token", &redact(&self.token))
            .finish()
    }
}

/// Credentials resolved from [`AuthSettings`].
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Use a pre-issued bearer token.
    Token(String),
    /// Exchange access codes at an OIDC token endpoint.
    AccessCodes {
        /// Token endpoint.
        token_uri: String,
        /// First access code.
        access_code1: String,
        /// Second access code.
        access_code2: String,
        /// Requested scope.
        scope: String,
    },
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(_) => formatter.write_str("Token(<redacted>)"),
            Self::AccessCodes {
                token_uri, scope, ..
            } => formatter
                .debug_struct("AccessCodes")
                .field("token_uri", token_uri)
                .field("scope", scope)
                .finish_non_exhaustive(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormatSetting {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Logging output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    /// Level directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Output format; inferred from the build profile when absent.
    pub format: Option<LogFormatSetting>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            format: None,
        }
    }
}
