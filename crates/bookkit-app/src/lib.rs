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

//! Book operations: menu loading and the bulk state-change and delete
//! workflows.
//!
//! Layout: `bootstrap.rs` (configuration wiring), `menu.rs` (book structure
//! load), `orchestrator.rs` (state change and delete workflows).

/// Configuration wiring for the HTTP-backed manager.
pub mod bootstrap;
/// Application error type.
pub mod error;
/// Book structure loading.
pub mod menu;
/// Bulk page workflows.
pub mod orchestrator;

pub use bootstrap::{ConfiguredAuthenticator, HttpBookManager, build_manager, retry_policy};
pub use error::{AppError, AppResult};
pub use menu::load_menu;
pub use orchestrator::{BookManager, DeleteReport, StateChangeReport};
