//! In-memory fakes for the remote service.
//!
//! [`ScriptedTransport`] records every call and answers from scripted rules;
//! clones share state so a test can keep a handle after moving one into the
//! code under test.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bookkit_client::{Authenticator, RemoteError, RemoteResult, Session, Transport};
use bookkit_core::Menu;
use serde_json::Value;
use url::Url;

use crate::fixtures::structure_body;

/// HTTP verb of a recorded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Read command.
    Get,
    /// Write command.
    Post,
}

/// One call observed by [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Verb used.
    pub method: Method,
    /// Use-case name (last path segment of the URI).
    pub use_case: String,
    /// Full URI.
    pub uri: String,
    /// Payload passed by the caller.
    pub payload: Option<Value>,
    /// Authorization header value of the session.
    pub authorization: String,
}

impl RecordedCall {
    /// `code` field of the payload, if any.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.payload
            .as_ref()
            .and_then(|payload| payload.get("code"))
            .and_then(Value::as_str)
    }
}

struct Rule {
    method: Method,
    use_case: String,
    code: Option<String>,
    responses: VecDeque<RemoteResult<Value>>,
}

impl Rule {
    fn matches(&self, call: &RecordedCall) -> bool {
        self.method == call.method
            && self.use_case == call.use_case
            && self
                .code
                .as_deref()
                .is_none_or(|code| call.code() == Some(code))
            && !self.responses.is_empty()
    }
}

#[derive(Default)]
struct State {
    calls: Mutex<Vec<RecordedCall>>,
    rules: Mutex<Vec<Rule>>,
    menu_body: Mutex<Option<Value>>,
}

/// Transport fake answering from scripted rules.
///
/// Unmatched writes succeed with `null`; unmatched reads return the configured
/// menu body, or `null` when none is set.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    state: Arc<State>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ScriptedTransport {
    /// Fake serving `menu` from `getBookStructure`.
    #[must_use]
    pub fn with_menu(menu: &Menu) -> Self {
        let transport = Self::default();
        *lock(&transport.state.menu_body) = Some(structure_body(menu));
        transport
    }

    /// Serve an arbitrary body for every unmatched read.
    #[must_use]
    pub fn with_read_body(self, body: Value) -> Self {
        *lock(&self.state.menu_body) = Some(body);
        self
    }

    /// Fail the next `times` writes to `use_case` (optionally only for page
    /// `code`) with `status`.
    #[must_use]
    pub fn fail_post(self, use_case: &str, code: Option<&str>, status: u16, times: usize) -> Self {
        let responses = (0..times)
            .map(|_| Err(status_error(use_case, status)))
            .collect();
        lock(&self.state.rules).push(Rule {
            method: Method::Post,
            use_case: use_case.to_string(),
            code: code.map(str::to_string),
            responses,
        });
        self
    }

    /// Fail the next read of `use_case` with `status`.
    #[must_use]
    pub fn fail_get(self, use_case: &str, status: u16) -> Self {
        lock(&self.state.rules).push(Rule {
            method: Method::Get,
            use_case: use_case.to_string(),
            code: None,
            responses: VecDeque::from([Err(status_error(use_case, status))]),
        });
        self
    }

    /// Every call observed so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.state.calls).clone()
    }

    /// Calls observed for `use_case`, in order.
    #[must_use]
    pub fn calls_to(&self, use_case: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.use_case == use_case)
            .collect()
    }

    /// Page codes sent to `use_case`, in order.
    #[must_use]
    pub fn codes_sent_to(&self, use_case: &str) -> Vec<String> {
        self.calls_to(use_case)
            .iter()
            .filter_map(|call| call.code().map(str::to_string))
            .collect()
    }

    fn answer(
        &self,
        method: Method,
        uri: &Url,
        payload: Option<&Value>,
        session: &Session,
    ) -> RemoteResult<Value> {
        let call = RecordedCall {
            method,
            use_case: uri
                .path_segments()
                .and_then(Iterator::last)
                .unwrap_or_default()
                .to_string(),
            uri: uri.to_string(),
            payload: payload.cloned(),
            authorization: session.authorization(),
        };

        let scripted = {
            let mut rules = lock(&self.state.rules);
            rules
                .iter_mut()
                .find(|rule| rule.matches(&call))
                .and_then(|rule| rule.responses.pop_front())
        };
        lock(&self.state.calls).push(call);

        scripted.unwrap_or_else(|| match method {
            Method::Get => Ok(lock(&self.state.menu_body).clone().unwrap_or(Value::Null)),
            Method::Post => Ok(Value::Null),
        })
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(
        &self,
        uri: &Url,
        payload: Option<&Value>,
        session: &Session,
    ) -> RemoteResult<Value> {
        self.answer(Method::Get, uri, payload, session)
    }

    async fn post(
        &self,
        uri: &Url,
        payload: Option<&Value>,
        session: &Session,
    ) -> RemoteResult<Value> {
        self.answer(Method::Post, uri, payload, session)
    }
}

fn status_error(use_case: &str, status: u16) -> RemoteError {
    RemoteError::Status {
        uri: use_case.to_string(),
        status,
        message: format!("scripted {status} for {use_case}"),
    }
}

/// Authenticator fake that counts how often a session was requested.
#[derive(Clone, Default)]
pub struct CountingAuthenticator {
    calls: Arc<AtomicUsize>,
    fail_with: Option<u16>,
}

impl CountingAuthenticator {
    /// Authenticator whose every attempt fails with `status`.
    #[must_use]
    pub fn failing(status: u16) -> Self {
        Self {
            calls: Arc::default(),
            fail_with: Some(status),
        }
    }

    /// Number of sessions requested so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Authenticator for CountingAuthenticator {
    async fn authenticate(&self) -> RemoteResult<Session> {
        let count = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        match self.fail_with {
            Some(status) => Err(status_error("grantToken", status)),
            None => Ok(Session::new(format!("session-{count}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{book_uri, simple_menu};
    use serde_json::json;

    fn uri(use_case: &str) -> Url {
        bookkit_client::use_case_uri(
            &book_uri(),
            match use_case {
                "updatePage" => bookkit_client::UseCase::UpdatePage,
                _ => bookkit_client::UseCase::GetBookStructure,
            },
        )
        .expect("fixture URI is valid")
    }

    #[tokio::test]
    async fn records_calls_and_serves_menu() -> RemoteResult<()> {
        let transport = ScriptedTransport::with_menu(&simple_menu());
        let session = Session::new("t");

        let body = transport.get(&uri("getBookStructure"), None, &session).await?;
        assert!(body["itemMap"]["A"].is_object());

        transport
            .post(&uri("updatePage"), Some(&json!({"code": "A"})), &session)
            .await?;
        assert_eq!(transport.codes_sent_to("updatePage"), vec!["A".to_string()]);
        assert_eq!(transport.calls()[1].authorization, "Bearer t");
        Ok(())
    }

    #[tokio::test]
    async fn scripted_failures_are_consumed_in_order() {
        let transport = ScriptedTransport::default().fail_post("updatePage", Some("B"), 502, 1);
        let session = Session::new("t");

        let ok = transport
            .post(&uri("updatePage"), Some(&json!({"code": "A"})), &session)
            .await;
        assert!(ok.is_ok());

        let failed = transport
            .post(&uri("updatePage"), Some(&json!({"code": "B"})), &session)
            .await;
        assert_eq!(failed.expect_err("scripted").status(), Some(502));

        let retried = transport
            .post(&uri("updatePage"), Some(&json!({"code": "B"})), &session)
            .await;
        assert!(retried.is_ok());
    }

    #[tokio::test]
    async fn counting_authenticator_counts_sessions() {
        let auth = CountingAuthenticator::default();
        assert!(auth.authenticate().await.is_ok());
        assert_eq!(auth.calls(), 1);

        let failing = CountingAuthenticator::failing(401);
        assert!(failing.authenticate().await.is_err());
        assert_eq!(failing.calls(), 1);
    }
}
