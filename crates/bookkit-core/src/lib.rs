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

//! Book menu model and the traversal rules used to select pages.
//!
//! Layout: `model.rs` (menu, page records, book pages), `subtree.rs`
//! (indent-driven subtree extraction), `filter.rs` (state-based selection),
//! `error.rs` (malformed menu errors).

pub mod error;
pub mod filter;
pub mod model;
pub mod subtree;

pub use error::{MenuError, MenuResult};
pub use filter::{CLOSED_STATE, filter_excluding, is_deletable};
pub use model::{BookPage, Menu, PageRecord};
pub use subtree::extract_subtree;
