//! Menu fixtures and canned response bodies.

use bookkit_core::{Menu, PageRecord};
use serde_json::{Value, json};
use url::Url;

/// Book URI used throughout the suites.
pub const BOOK_URI: &str = "https://uuapp.example.net/uu-bookkit-maing01/4f1c0d/book";

/// Parsed [`BOOK_URI`].
///
/// # Panics
///
/// Never in practice; the constant is a valid URL.
#[must_use]
pub fn book_uri() -> Url {
    Url::parse(BOOK_URI).expect("fixture URI is valid")
}

/// URI of `use_case` for [`BOOK_URI`].
#[must_use]
pub fn use_case(use_case: &str) -> String {
    format!("https://uuapp.example.net/uu-bookkit-maing01/4f1c0d/{use_case}")
}

/// Three-page menu: `A` (0) -> `B` (1) -> `C` (0), all `open`.
#[must_use]
pub fn simple_menu() -> Menu {
    [
        ("A", PageRecord::new(0, "open", Some("B"))),
        ("B", PageRecord::new(1, "open", Some("C"))),
        ("C", PageRecord::new(0, "open", None)),
    ]
    .into_iter()
    .collect()
}

/// Menu with two chapters of mixed states.
///
/// ```text
/// intro      0 active
/// chapter1   0 active
///   c1-a     1 closed
///   c1-b     1 active
///     c1-b-x 2 closed
/// chapter2   0 closed
///   c2-a     1 closed
///   c2-b     1 underConstruction
/// appendix   0 active
/// ```
#[must_use]
pub fn chapters_menu() -> Menu {
    [
        ("intro", PageRecord::new(0, "active", Some("chapter1"))),
        ("chapter1", PageRecord::new(0, "active", Some("c1-a"))),
        ("c1-a", PageRecord::new(1, "closed", Some("c1-b"))),
        ("c1-b", PageRecord::new(1, "active", Some("c1-b-x"))),
        ("c1-b-x", PageRecord::new(2, "closed", Some("chapter2"))),
        ("chapter2", PageRecord::new(0, "closed", Some("c2-a"))),
        ("c2-a", PageRecord::new(1, "closed", Some("c2-b"))),
        ("c2-b", PageRecord::new(1, "underConstruction", Some("appendix"))),
        ("appendix", PageRecord::new(0, "active", None)),
    ]
    .into_iter()
    .collect()
}

/// `getBookStructure` response body wrapping `menu`.
///
/// # Panics
///
/// Never in practice; menus always serialize.
#[must_use]
pub fn structure_body(menu: &Menu) -> Value {
    json!({
        "itemMap": serde_json::to_value(menu).expect("menu serializes"),
        "uuAppErrorMap": {}
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structure_body_round_trips_menu() {
        let body = structure_body(&simple_menu());
        let menu: Menu =
            serde_json::from_value(body["itemMap"].clone()).expect("item map decodes");
        assert_eq!(menu, simple_menu());
    }

    #[test]
    fn use_case_shares_book_prefix() {
        assert!(use_case("updatePage").ends_with("/4f1c0d/updatePage"));
        assert_eq!(book_uri().as_str(), BOOK_URI);
    }
}
