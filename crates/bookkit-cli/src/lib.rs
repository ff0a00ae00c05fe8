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
#![allow(clippy::redundant_pub_crate)]

//! Command-line front end for bulk page management in a BookKit book.
//!
//! Layout:
//! - `cli.rs`: argument parsing, usage flow, and dispatch
//! - `commands/`: handlers for each action
//! - `client.rs`: CLI errors and manager construction
//! - `output.rs`: report renderers
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod output;

pub use cli::{run, run_with};
