//! Bounded retry for remote write commands.
//!
//! # Design
//! - Only statuses in the configured set are treated as transient; the default
//!   set is exactly `404` and `502`. Everything else, including failures that
//!   carry no status, surfaces on the first attempt.
//! - The delay between attempts is fixed. No delay follows the final attempt.
//! - Reads are passed straight through to the transport without retry.

use std::collections::BTreeSet;
use std::time::Duration;

use reqwest::Url;
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::{RemoteError, RemoteResult};
use crate::session::Session;
use crate::transport::Transport;

/// Default number of attempts per write, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
/// Default pause between attempts.
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(2_000);
/// Statuses retried by default: not found and bad gateway.
pub const DEFAULT_RETRYABLE_STATUSES: [u16; 2] = [404, 502];

/// Which write failures are retried, how often, and how long to wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per call; values below one behave as one.
    pub max_attempts: u32,
    /// Fixed pause between attempts.
    pub backoff: Duration,
    /// HTTP statuses considered transient.
    pub retryable_statuses: BTreeSet<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: DEFAULT_BACKOFF,
            retryable_statuses: DEFAULT_RETRYABLE_STATUSES.into_iter().collect(),
        }
    }
}

impl RetryPolicy {
    /// Whether `error` should be retried under this policy.
    #[must_use]
    pub fn is_retryable(&self, error: &RemoteError) -> bool {
        error
            .status()
            .is_some_and(|status| self.retryable_statuses.contains(&status))
    }
}

/// Issues commands through a [`Transport`], retrying writes per a [`RetryPolicy`].
pub struct RetryingInvoker<T> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: Transport> RetryingInvoker<T> {
    /// Combine a transport with a retry policy.
    #[must_use]
    pub const fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Policy applied to writes.
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Issue a write, retrying transient failures.
    ///
    /// # Errors
    ///
    /// Returns the first non-retryable error, or the last error once all
    /// attempts are used.
    pub async fn post(
        &self,
        uri: &Url,
        payload: Option<&Value>,
        session: &Session,
    ) -> RemoteResult<Value> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            let error = match self.transport.post(uri, payload, session).await {
                Ok(body) => return Ok(body),
                Err(error) => error,
            };
            debug!(uri = %uri, attempt, error = ?error, "command call failed");

            if !self.policy.is_retryable(&error) || attempt >= max_attempts {
                return Err(error);
            }
            warn!(
                uri = %uri,
                attempt,
                max_attempts,
                error = %error,
                "transient command failure, retrying in {}ms",
                self.policy.backoff.as_millis()
            );
            sleep(self.policy.backoff).await;
            attempt += 1;
        }
    }

    /// Issue a read. Reads are never retried.
    ///
    /// # Errors
    ///
    /// Returns whatever the transport reports.
    pub async fn get(
        &self,
        uri: &Url,
        payload: Option<&Value>,
        session: &Session,
    ) -> RemoteResult<Value> {
        self.transport.get(uri, payload, session).await
    }
}
