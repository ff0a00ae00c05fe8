//! Use-case addressing for BookKit URIs.
//!
//! A book is addressed as `scheme://host/<product>/<awid>/<useCase>[?...]`.
//! Commands are issued by keeping the product and workspace segments and
//! replacing everything after them with the command's use-case name.

use std::fmt::{self, Display, Formatter};

use url::Url;

use crate::error::{RemoteError, RemoteResult};

/// Remote commands issued by the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseCase {
    /// Read the flat menu of the book.
    GetBookStructure,
    /// Update page attributes (state).
    UpdatePage,
    /// Delete a page.
    DeletePage,
    /// Rebuild the book's fulltext index.
    UpdateBookIndex,
}

impl UseCase {
    /// Use-case name as it appears in the URI.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetBookStructure => "getBookStructure",
            Self::UpdatePage => "updatePage",
            Self::DeletePage => "deletePage",
            Self::UpdateBookIndex => "updateBookIndex",
        }
    }
}

impl Display for UseCase {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Parse and sanity-check a book URI supplied by the user.
///
/// # Errors
///
/// Returns [`RemoteError::InvalidBookUri`] when the text is not an absolute
/// URL with at least a product and workspace segment.
pub fn parse_book_uri(input: &str) -> RemoteResult<Url> {
    let uri = Url::parse(input.trim()).map_err(|_| RemoteError::InvalidBookUri {
        uri: input.to_string(),
        reason: "not an absolute URL",
    })?;
    base_segments(&uri)?;
    Ok(uri)
}

/// Compose the URI of `use_case` for the book at `book_uri`.
///
/// # Errors
///
/// Returns [`RemoteError::InvalidBookUri`] when the book URI lacks the
/// product and workspace segments.
pub fn use_case_uri(book_uri: &Url, use_case: UseCase) -> RemoteResult<Url> {
    let (product, awid) = base_segments(book_uri)?;
    let path = format!("/{product}/{awid}/{use_case}");
    let mut uri = book_uri.clone();
    uri.set_query(None);
    uri.set_fragment(None);
    uri.set_path(&path);
    Ok(uri)
}

fn base_segments(uri: &Url) -> RemoteResult<(&str, &str)> {
    let invalid = |reason| RemoteError::InvalidBookUri {
        uri: uri.to_string(),
        reason,
    };
    let mut segments = uri
        .path_segments()
        .ok_or_else(|| invalid("URL cannot carry a path"))?
        .filter(|segment| !segment.is_empty());
    let product = segments
        .next()
        .ok_or_else(|| invalid("missing product segment"))?;
    let awid = segments
        .next()
        .ok_or_else(|| invalid("missing workspace segment"))?;
    Ok((product, awid))
}
