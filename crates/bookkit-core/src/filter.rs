//! State-based page selection.

use crate::model::BookPage;

/// State a page must be in before it may be deleted.
pub const CLOSED_STATE: &str = "closed";

/// Keep the pages whose state differs from `target_state`, preserving order.
#[must_use]
pub fn filter_excluding(pages: &[BookPage], target_state: &str) -> Vec<BookPage> {
    pages
        .iter()
        .filter(|page| page.state != target_state)
        .cloned()
        .collect()
}

/// Whether a page is eligible for deletion.
#[must_use]
pub fn is_deletable(page: &BookPage) -> bool {
    page.state == CLOSED_STATE
}
