//! Book menu types as delivered by `getBookStructure`.
//!
//! # Design
//! - The menu is a flat map keyed by page code; hierarchy is implied by
//!   `indent` and the `next` chain, never by parent links.
//! - Records are read-only after load; traversal produces owned [`BookPage`]
//!   projections.

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// One entry of the book's `itemMap`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PageRecord {
    /// Depth of the page in the table of contents.
    pub indent: u32,
    /// Workflow state reported by the service (`active`, `closed`, ...).
    #[serde(default)]
    pub state: String,
    /// Code of the following page in document order.
    #[serde(default)]
    pub next: Option<String>,
}

impl PageRecord {
    /// Build a record; mostly useful for fixtures.
    #[must_use]
    pub fn new(indent: u32, state: impl Into<String>, next: Option<&str>) -> Self {
        Self {
            indent,
            state: state.into(),
            next: next.map(str::to_string),
        }
    }
}

/// Flat table of contents of a book, keyed by page code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Menu {
    items: HashMap<String, PageRecord>,
}

impl Menu {
    /// Look up a page record by code.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&PageRecord> {
        self.items.get(code)
    }

    /// Number of records in the menu.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the menu holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, PageRecord)> for Menu {
    fn from_iter<I: IntoIterator<Item = (S, PageRecord)>>(iter: I) -> Self {
        Self {
            items: iter
                .into_iter()
                .map(|(code, record)| (code.into(), record))
                .collect(),
        }
    }
}

/// Page selected by a traversal: its code and current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookPage {
    /// Unique page code.
    pub code: String,
    /// State the page had when the menu was loaded.
    pub state: String,
}

impl BookPage {
    /// Project a menu record under its code.
    #[must_use]
    pub fn from_record(code: &str, record: &PageRecord) -> Self {
        Self {
            code: code.to_string(),
            state: record.state.clone(),
        }
    }
}

impl Display for BookPage {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "Code: {}, state: {}", self.code, self.state)
    }
}
