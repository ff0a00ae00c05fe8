//! Errors surfaced by remote BookKit calls.
//!
//! # Design
//! - Only [`RemoteError::status`] is consulted by the retry policy; every other
//!   detail is carried for reporting.
//! - Transport and decode failures have no status and are never retried.

use thiserror::Error;

/// Result alias for remote operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Failure of a call against the remote service.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    ClientBuild {
        /// Source reqwest error.
        source: reqwest::Error,
    },
    /// The request never produced a response (connect, timeout, body read).
    #[error("request to {uri} failed")]
    Transport {
        /// Target URI.
        uri: String,
        /// Source reqwest error.
        source: reqwest::Error,
    },
    /// The service answered with a non-success status.
    #[error("request to {uri} returned status {status}: {message}")]
    Status {
        /// Target URI.
        uri: String,
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body.
        message: String,
    },
    /// The response body was not the expected JSON.
    #[error("failed to decode response from {uri}")]
    Decode {
        /// Target URI.
        uri: String,
        /// Source serde error.
        source: serde_json::Error,
    },
    /// The book URI cannot address a use case.
    #[error("invalid book URI '{uri}': {reason}")]
    InvalidBookUri {
        /// Offending URI text.
        uri: String,
        /// Why the URI was rejected.
        reason: &'static str,
    },
    /// The authentication response carried no token.
    #[error("authentication response from {uri} did not contain an id_token")]
    MissingToken {
        /// Token endpoint.
        uri: String,
    },
}

impl RemoteError {
    /// HTTP status of the failure, when the service produced one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::ClientBuild { .. }
            | Self::Transport { .. }
            | Self::Decode { .. }
            | Self::InvalidBookUri { .. }
            | Self::MissingToken { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn status_is_only_reported_for_status_errors() {
        let status = RemoteError::Status {
            uri: "http://host/app/awid/updatePage".to_string(),
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert_eq!(status.status(), Some(502));
        assert_eq!(
            status.to_string(),
            "request to http://host/app/awid/updatePage returned status 502: bad gateway"
        );

        let Err(source) = serde_json::from_str::<serde_json::Value>("{") else {
            panic!("expected invalid json");
        };
        let decode = RemoteError::Decode {
            uri: "http://host".to_string(),
            source,
        };
        assert_eq!(decode.status(), None);
        assert!(decode.source().is_some());

        let invalid = RemoteError::InvalidBookUri {
            uri: "x".to_string(),
            reason: "missing awid",
        };
        assert_eq!(invalid.status(), None);
    }
}
