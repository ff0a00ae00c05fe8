//! Wiring configuration into a ready-to-run [`BookManager`].
//!
//! # Design
//! - Built once per process from an explicit [`ManagerConfig`]; nothing here
//!   reads or mutates global state.
//! - Authenticator and transport share one reqwest client so the run's
//!   request id and timeout apply to every call.

use std::collections::BTreeSet;
use std::time::Duration;

use async_trait::async_trait;
use bookkit_client::{
    Authenticator, HttpTransport, OidcAuthenticator, RemoteResult, RetryPolicy, RetryingInvoker,
    Session, StaticTokenAuthenticator,
};
use bookkit_config::{Credentials, ManagerConfig, RetrySettings};
use tracing::debug;
use url::Url;

use crate::error::{AppError, AppResult};
use crate::orchestrator::BookManager;

/// Manager type produced by [`build_manager`].
pub type HttpBookManager = BookManager<ConfiguredAuthenticator, HttpTransport>;

/// Authenticator selected by the configured credentials.
#[derive(Clone)]
pub enum ConfiguredAuthenticator {
    /// Pre-issued bearer token.
    Token(StaticTokenAuthenticator),
    /// Access-code exchange at an OIDC token endpoint.
    Oidc(OidcAuthenticator),
}

#[async_trait]
impl Authenticator for ConfiguredAuthenticator {
    async fn authenticate(&self) -> RemoteResult<Session> {
        match self {
            Self::Token(inner) => inner.authenticate().await,
            Self::Oidc(inner) => inner.authenticate().await,
        }
    }
}

/// Retry policy described by the `retry` configuration section.
#[must_use]
pub fn retry_policy(settings: &RetrySettings) -> RetryPolicy {
    RetryPolicy {
        max_attempts: settings.max_attempts,
        backoff: Duration::from_millis(settings.backoff_ms),
        retryable_statuses: settings
            .retryable_statuses
            .iter()
            .copied()
            .collect::<BTreeSet<u16>>(),
    }
}

/// Build a manager talking HTTP, tagging every request with `request_id`.
///
/// # Errors
///
/// Fails when no complete credentials are configured, the token endpoint is
/// not a URL, or the HTTP client cannot be built.
pub fn build_manager(config: &ManagerConfig, request_id: &str) -> AppResult<HttpBookManager> {
    let credentials = config
        .auth
        .credentials()
        .map_err(|source| AppError::config("resolve_credentials", source))?;
    let client = HttpTransport::build_client(
        Duration::from_secs(config.http.timeout_secs),
        request_id,
    )
    .map_err(|source| AppError::remote("build_client", source))?;

    let authenticator = match credentials {
        Credentials::Token(token) => {
            debug!("using pre-issued token");
            ConfiguredAuthenticator::Token(StaticTokenAuthenticator::new(token))
        }
        Credentials::AccessCodes {
            token_uri,
            access_code1,
            access_code2,
            scope,
        } => {
            let parsed = Url::parse(&token_uri)
                .map_err(|_| AppError::InvalidTokenUri { value: token_uri })?;
            debug!(token_uri = %parsed, "using access-code authentication");
            ConfiguredAuthenticator::Oidc(OidcAuthenticator::new(
                client.clone(),
                parsed,
                access_code1,
                access_code2,
                scope,
            ))
        }
    };

    let invoker = RetryingInvoker::new(HttpTransport::new(client), retry_policy(&config.retry));
    Ok(BookManager::new(authenticator, invoker))
}
