//! HTTP transport for BookKit commands.
//!
//! # Design
//! - [`Transport`] is the seam orchestration code depends on, so tests can
//!   substitute scripted fakes for the network.
//! - Reads are GET requests with the payload flattened into query parameters;
//!   writes are POST requests with a JSON body.
//! - Failures are classified once here; callers only see [`RemoteError`].

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{RemoteError, RemoteResult};
use crate::session::Session;

/// Header carrying the per-run request identifier.
pub const HEADER_REQUEST_ID: &str = "x-request-id";

/// Remote command execution.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a read command.
    async fn get(&self, uri: &Url, payload: Option<&Value>, session: &Session)
    -> RemoteResult<Value>;

    /// Issue a write command.
    async fn post(
        &self,
        uri: &Url,
        payload: Option<&Value>,
        session: &Session,
    ) -> RemoteResult<Value>;
}

/// [`Transport`] backed by a shared reqwest [`Client`].
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Wrap an existing client.
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client with a request timeout and the run's request id as a
    /// default header.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteError::ClientBuild`] if reqwest rejects the settings.
    pub fn build_client(timeout: Duration, request_id: &str) -> RemoteResult<Client> {
        let mut default_headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(request_id) {
            default_headers.insert(HEADER_REQUEST_ID, value);
        }
        Client::builder()
            .timeout(timeout)
            .default_headers(default_headers)
            .build()
            .map_err(|source| RemoteError::ClientBuild { source })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(
        &self,
        uri: &Url,
        payload: Option<&Value>,
        session: &Session,
    ) -> RemoteResult<Value> {
        debug!(uri = %uri, "GET");
        let response = self
            .client
            .get(uri.clone())
            .header(AUTHORIZATION, session.authorization())
            .header(ACCEPT, "application/json")
            .query(&query_pairs(payload))
            .send()
            .await
            .map_err(|source| RemoteError::Transport {
                uri: uri.to_string(),
                source,
            })?;
        read_json(uri.as_str(), response).await
    }

    async fn post(
        &self,
        uri: &Url,
        payload: Option<&Value>,
        session: &Session,
    ) -> RemoteResult<Value> {
        debug!(uri = %uri, "POST");
        let empty = Value::Object(Map::new());
        let response = self
            .client
            .post(uri.clone())
            .header(AUTHORIZATION, session.authorization())
            .header(ACCEPT, "application/json")
            .json(payload.unwrap_or(&empty))
            .send()
            .await
            .map_err(|source| RemoteError::Transport {
                uri: uri.to_string(),
                source,
            })?;
        read_json(uri.as_str(), response).await
    }
}

/// Decode a successful JSON body or classify the failure.
pub(crate) async fn read_json(uri: &str, response: reqwest::Response) -> RemoteResult<Value> {
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|source| RemoteError::Transport {
            uri: uri.to_string(),
            source,
        })?;

    if !status.is_success() {
        return Err(RemoteError::Status {
            uri: uri.to_string(),
            status: status.as_u16(),
            message: failure_message(status.as_u16(), &bytes),
        });
    }

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&bytes).map_err(|source| RemoteError::Decode {
        uri: uri.to_string(),
        source,
    })
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(rename = "uuAppErrorMap", default)]
    error_map: BTreeMap<String, ErrorEntry>,
}

#[derive(Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    message: Option<String>,
}

fn failure_message(status: u16, bytes: &[u8]) -> String {
    let from_error_map = serde_json::from_slice::<ErrorBody>(bytes)
        .ok()
        .and_then(|body| {
            body.error_map.into_iter().next().map(|(code, entry)| {
                entry
                    .message
                    .map_or_else(|| code.clone(), |message| format!("{code}: {message}"))
            })
        });
    if let Some(message) = from_error_map {
        return message;
    }

    let text = String::from_utf8_lossy(bytes);
    let text = text.trim();
    if text.is_empty() {
        format!("request failed with status {status}")
    } else {
        text.to_string()
    }
}

fn query_pairs(payload: Option<&Value>) -> Vec<(String, String)> {
    let Some(Value::Object(map)) = payload else {
        return Vec::new();
    };
    map.iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let rendered = match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            (key.clone(), rendered)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn transport() -> HttpTransport {
        HttpTransport::new(Client::new())
    }

    fn session() -> Session {
        Session::new("token-1")
    }

    #[tokio::test]
    async fn post_sends_bearer_and_json_body() -> RemoteResult<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/bookkit/awid/updatePage")
                .header("authorization", "Bearer token-1")
                .json_body(json!({"code": "home", "state": "closed"}));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"code": "home", "uuAppErrorMap": {}}));
        });

        let uri: Url = server.url("/bookkit/awid/updatePage").parse().expect("valid URL");
        let payload = json!({"code": "home", "state": "closed"});
        let body = transport().post(&uri, Some(&payload), &session()).await?;

        mock.assert();
        assert_eq!(body["code"], "home");
        Ok(())
    }

    #[tokio::test]
    async fn post_without_payload_sends_empty_object() -> RemoteResult<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/bookkit/awid/updateBookIndex")
                .json_body(json!({}));
            then.status(200);
        });

        let uri: Url = server
            .url("/bookkit/awid/updateBookIndex")
            .parse()
            .expect("valid URL");
        let body = transport().post(&uri, None, &session()).await?;

        mock.assert();
        assert_eq!(body, Value::Null);
        Ok(())
    }

    #[tokio::test]
    async fn get_flattens_payload_into_query() -> RemoteResult<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/bookkit/awid/getBookStructure")
                .query_param("code", "home")
                .query_param("depth", "2")
                .header("authorization", "Bearer token-1");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"itemMap": {}}));
        });

        let uri: Url = server
            .url("/bookkit/awid/getBookStructure")
            .parse()
            .expect("valid URL");
        let payload = json!({"code": "home", "depth": 2, "ignored": null});
        let body = transport().get(&uri, Some(&payload), &session()).await?;

        mock.assert();
        assert_eq!(body, json!({"itemMap": {}}));
        Ok(())
    }

    #[tokio::test]
    async fn error_status_uses_app_error_map_message() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/bookkit/awid/deletePage");
            then.status(502)
                .header("content-type", "application/json")
                .json_body(json!({
                    "uuAppErrorMap": {
                        "uu-bookkit-main/deletePage/pageDoesNotExist": {
                            "type": "error",
                            "message": "Page does not exist."
                        }
                    }
                }));
        });

        let uri: Url = server.url("/bookkit/awid/deletePage").parse().expect("valid URL");
        let err = transport()
            .post(&uri, Some(&json!({"code": "gone"})), &session())
            .await
            .expect_err("502 should fail");

        assert_eq!(err.status(), Some(502));
        assert!(matches!(
            err,
            RemoteError::Status { ref message, .. }
                if message == "uu-bookkit-main/deletePage/pageDoesNotExist: Page does not exist."
        ));
    }

    #[tokio::test]
    async fn error_status_falls_back_to_body_text() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/bookkit/awid/getBookStructure");
            then.status(500).body("  upstream exploded  ");
        });

        let uri: Url = server
            .url("/bookkit/awid/getBookStructure")
            .parse()
            .expect("valid URL");
        let err = transport()
            .get(&uri, None, &session())
            .await
            .expect_err("500 should fail");
        assert!(matches!(
            err,
            RemoteError::Status { status: 500, ref message, .. } if message == "upstream exploded"
        ));
    }

    #[tokio::test]
    async fn malformed_success_body_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/bookkit/awid/getBookStructure");
            then.status(200).body("<html>");
        });

        let uri: Url = server
            .url("/bookkit/awid/getBookStructure")
            .parse()
            .expect("valid URL");
        let err = transport()
            .get(&uri, None, &session())
            .await
            .expect_err("html is not json");
        assert!(matches!(err, RemoteError::Decode { .. }));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn failure_message_handles_empty_body() {
        assert_eq!(failure_message(404, b""), "request failed with status 404");
    }

    #[test]
    fn build_client_accepts_request_id() {
        let client = HttpTransport::build_client(Duration::from_secs(5), "trace-1");
        assert!(client.is_ok());
    }
}
