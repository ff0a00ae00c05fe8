//! Session credentials and the authenticators that produce them.
//!
//! # Design
//! - A [`Session`] is acquired once per orchestrated operation and borrowed by
//!   every remote call; it is never cached across runs.
//! - Authenticators read their credentials from configuration handed to them
//!   at construction, never from process-wide state.

use std::fmt::{self, Debug, Formatter};

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{RemoteError, RemoteResult};

/// Bearer credential attached to every remote call.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    /// Wrap an issued token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// `Authorization` header value for this session.
    #[must_use]
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl Debug for Session {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Source of authenticated sessions.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Obtain a fresh session using the configured credentials.
    async fn authenticate(&self) -> RemoteResult<Session>;
}

/// Authenticator for a token that was issued out of band.
#[derive(Clone)]
pub struct StaticTokenAuthenticator {
    token: String,
}

impl StaticTokenAuthenticator {
    /// Use `token` for every session.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl Authenticator for StaticTokenAuthenticator {
    async fn authenticate(&self) -> RemoteResult<Session> {
        Ok(Session::new(self.token.clone()))
    }
}

/// Password-grant authenticator against an OIDC token endpoint using a pair of
/// access codes.
#[derive(Clone)]
pub struct OidcAuthenticator {
    client: Client,
    token_uri: Url,
    access_code1: String,
    access_code2: String,
    scope: String,
}

impl OidcAuthenticator {
    /// Build an authenticator for `token_uri`.
    #[must_use]
    pub fn new(
        client: Client,
        token_uri: Url,
        access_code1: impl Into<String>,
        access_code2: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            client,
            token_uri,
            access_code1: access_code1.into(),
            access_code2: access_code2.into(),
            scope: scope.into(),
        }
    }
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'static str,
    #[serde(rename = "accessCode1")]
    access_code1: &'a str,
    #[serde(rename = "accessCode2")]
    access_code2: &'a str,
    scope: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    id_token: Option<String>,
}

#[async_trait]
impl Authenticator for OidcAuthenticator {
    async fn authenticate(&self) -> RemoteResult<Session> {
        let uri = self.token_uri.to_string();
        info!(token_uri = %uri, "authenticating");

        let request = TokenRequest {
            grant_type: "password",
            access_code1: &self.access_code1,
            access_code2: &self.access_code2,
            scope: &self.scope,
        };
        let response = self
            .client
            .post(self.token_uri.clone())
            .json(&request)
            .send()
            .await
            .map_err(|source| RemoteError::Transport {
                uri: uri.clone(),
                source,
            })?;

        let body = crate::transport::read_json(&uri, response).await?;
        let token = serde_json::from_value::<TokenResponse>(body)
            .map_err(|source| RemoteError::Decode {
                uri: uri.clone(),
                source,
            })?
            .id_token
            .filter(|token| !token.is_empty())
            .ok_or(RemoteError::MissingToken { uri })?;
        Ok(Session::new(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn oidc(server: &MockServer) -> OidcAuthenticator {
        OidcAuthenticator::new(
            Client::new(),
            server.url("/oidc/grantToken").parse().expect("valid URL"),
            "code-one",
            "code-two",
            "openid https://uuapp.plus4u.net",
        )
    }

    #[test]
    fn session_debug_redacts_token() {
        let session = Session::new("secret-token");
        assert_eq!(session.authorization(), "Bearer secret-token");
        assert!(!format!("{session:?}").contains("secret-token"));
    }

    #[tokio::test]
    async fn static_authenticator_returns_configured_token() -> RemoteResult<()> {
        let session = StaticTokenAuthenticator::new("abc").authenticate().await?;
        assert_eq!(session, Session::new("abc"));
        Ok(())
    }

    #[tokio::test]
    async fn oidc_authenticator_posts_access_codes() -> RemoteResult<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/oidc/grantToken").json_body(json!({
                "grant_type": "password",
                "accessCode1": "code-one",
                "accessCode2": "code-two",
                "scope": "openid https://uuapp.plus4u.net"
            }));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"id_token": "issued", "token_type": "Bearer"}));
        });

        let session = oidc(&server).authenticate().await?;
        mock.assert();
        assert_eq!(session.authorization(), "Bearer issued");
        Ok(())
    }

    #[tokio::test]
    async fn oidc_authenticator_rejects_response_without_token() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/oidc/grantToken");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"token_type": "Bearer"}));
        });

        let err = oidc(&server)
            .authenticate()
            .await
            .expect_err("missing token should fail");
        assert!(matches!(err, RemoteError::MissingToken { .. }));
    }

    #[tokio::test]
    async fn oidc_authenticator_surfaces_status() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/oidc/grantToken");
            then.status(401).body("invalid credentials");
        });

        let err = oidc(&server)
            .authenticate()
            .await
            .expect_err("401 should fail");
        assert_eq!(err.status(), Some(401));
    }
}
