//! Subtree extraction over the flat, indent-coded menu.
//!
//! # Design
//! - The root is always emitted first; its descendants are the run of pages
//!   following it in the `next` chain whose indent is deeper than the root's.
//! - The walk is iterative with a visited set so a malformed chain fails fast
//!   instead of looping.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::error::{MenuError, MenuResult};
use crate::model::{BookPage, Menu};

/// Collect `root_code` and all of its descendants in document order.
///
/// A root code missing from the menu is tolerated: a warning is logged and an
/// empty selection is returned.
///
/// # Errors
///
/// Returns [`MenuError::Cycle`] when the `next` chain revisits a page and
/// [`MenuError::DanglingNext`] when it references an unknown code.
pub fn extract_subtree(menu: &Menu, root_code: &str) -> MenuResult<Vec<BookPage>> {
    let Some(root) = menu.get(root_code) else {
        warn!(page = root_code, "page does not exist, skipping");
        return Ok(Vec::new());
    };
    debug!(page = root_code, indent = root.indent, "extracting subtree");

    let min_indent = root.indent.saturating_add(1);
    let mut pages = vec![BookPage::from_record(root_code, root)];
    let mut visited = HashSet::from([root_code]);

    let mut previous = root_code;
    let mut cursor = root.next.as_deref();
    while let Some(code) = cursor {
        let record = menu.get(code).ok_or_else(|| MenuError::DanglingNext {
            from: previous.to_string(),
            missing: code.to_string(),
        })?;
        if record.indent < min_indent {
            break;
        }
        if !visited.insert(code) {
            return Err(MenuError::Cycle {
                code: code.to_string(),
            });
        }
        pages.push(BookPage::from_record(code, record));
        previous = code;
        cursor = record.next.as_deref();
    }

    Ok(pages)
}
