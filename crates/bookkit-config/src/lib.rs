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

//! Layered configuration for the book manager.
//!
//! Layout: `model.rs` (typed settings), `loader.rs` (defaults, JSON file and
//! environment layering), `validate.rs` (range and credential checks),
//! `defaults.rs` (default values), `error.rs` (error types).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    ENV_ACCESS_CODE1, ENV_ACCESS_CODE2, ENV_LOG_FORMAT, ENV_LOG_LEVEL, ENV_TOKEN, ENV_TOKEN_URI,
    load, load_with_env,
};
pub use model::{
    AuthSettings, Credentials, HttpSettings, LogFormatSetting, LoggingSettings, ManagerConfig,
    RetrySettings,
};
