//! Default values for configuration fields.

/// Attempts per write command, including the first.
pub const MAX_ATTEMPTS: u32 = 5;
/// Pause between write attempts in milliseconds.
pub const BACKOFF_MS: u64 = 2_000;
/// Statuses treated as transient for writes.
pub const RETRYABLE_STATUSES: [u16; 2] = [404, 502];
/// HTTP request timeout in seconds.
pub const TIMEOUT_SECS: u64 = 30;
/// OIDC scope requested when exchanging access codes.
pub const SCOPE: &str = "openid https://uuapp.plus4u.net";
/// Log level used when neither `RUST_LOG` nor configuration sets one.
pub const LOG_LEVEL: &str = "info";
