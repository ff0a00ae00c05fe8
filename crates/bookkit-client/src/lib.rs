#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Client-side plumbing for talking to a BookKit application.
//!
//! Layout:
//! - `session.rs`: session credential and authenticators
//! - `transport.rs`: the [`Transport`] seam and its reqwest implementation
//! - `uri.rs`: composing use-case URIs from a book URI
//! - `retry.rs`: [`RetryPolicy`] and the [`RetryingInvoker`] used for writes
//! - `error.rs`: [`RemoteError`] shared by all of the above

pub mod error;
pub mod retry;
pub mod session;
pub mod transport;
pub mod uri;

pub use error::{RemoteError, RemoteResult};
pub use retry::{RetryPolicy, RetryingInvoker};
pub use session::{Authenticator, OidcAuthenticator, Session, StaticTokenAuthenticator};
pub use transport::{HEADER_REQUEST_ID, HttpTransport, Transport};
pub use uri::{UseCase, parse_book_uri, use_case_uri};
