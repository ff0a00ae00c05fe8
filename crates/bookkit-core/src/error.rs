//! Errors raised while walking a book menu.

use thiserror::Error;

/// Result alias for menu traversal.
pub type MenuResult<T> = Result<T, MenuError>;

/// The menu returned by the service does not form a well-formed chain.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MenuError {
    /// The `next` chain visited the same page twice.
    #[error("menu chain contains a cycle")]
    Cycle {
        /// Code of the page that was reached a second time.
        code: String,
    },
    /// A `next` reference points at a code missing from the menu.
    #[error("menu chain references an unknown page")]
    DanglingNext {
        /// Page holding the broken reference.
        from: String,
        /// Code that could not be resolved.
        missing: String,
    },
}
