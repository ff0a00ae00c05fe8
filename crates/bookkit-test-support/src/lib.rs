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

//! Shared test helpers used across suites.
//! Layout: fixtures.rs (menus, URIs, response bodies), logs.rs (captured
//! tracing output), mocks.rs (scripted transport and authenticator).

pub mod fixtures;
pub mod logs;
pub mod mocks;
