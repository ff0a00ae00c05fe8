//! Bulk page operations over the subtrees of a book.
//!
//! # Design
//! - One session and one menu load per operation; root codes are processed
//!   sequentially and every write is awaited before the next is issued.
//! - Missing root pages and pages that are not eligible for deletion are
//!   logged and skipped; every other failure aborts the remaining work.
//! - A state change ends with a fulltext index refresh. Deletion does not.

use bookkit_client::{
    Authenticator, RetryingInvoker, Session, Transport, UseCase, use_case_uri,
};
use bookkit_core::{BookPage, Menu, extract_subtree, filter_excluding, is_deletable};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::error::{AppError, AppResult};
use crate::menu::load_menu;

/// Outcome of [`BookManager::set_page_state`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StateChangeReport {
    /// Target state that was applied.
    pub state: String,
    /// Pages moved to the target state, in the order they were updated.
    pub updated: Vec<String>,
    /// Pages left alone because they already had the target state.
    pub skipped: Vec<String>,
    /// Requested root codes absent from the menu.
    pub missing_roots: Vec<String>,
    /// Whether the fulltext index refresh was requested.
    pub index_refreshed: bool,
}

/// Outcome of [`BookManager::delete_entries`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeleteReport {
    /// Pages deleted, in the order they were deleted.
    pub deleted: Vec<String>,
    /// Pages kept because they were not closed.
    pub ineligible: Vec<BookPage>,
    /// Requested root codes absent from the menu.
    pub missing_roots: Vec<String>,
}

/// Runs bulk state changes and deletions against one remote service.
pub struct BookManager<A, T> {
    authenticator: A,
    invoker: RetryingInvoker<T>,
}

impl<A: Authenticator, T: Transport> BookManager<A, T> {
    /// Combine an authenticator with the invoker used for every remote call.
    #[must_use]
    pub const fn new(authenticator: A, invoker: RetryingInvoker<T>) -> Self {
        Self {
            authenticator,
            invoker,
        }
    }

    /// Invoker used for remote calls.
    #[must_use]
    pub const fn invoker(&self) -> &RetryingInvoker<T> {
        &self.invoker
    }

    /// Set every page below each root code to `target_state`, then refresh the
    /// book's fulltext index.
    ///
    /// # Errors
    ///
    /// Fails on authentication, menu load, a malformed menu chain, or any
    /// write that still fails after retries. Remaining pages, root codes and
    /// the index refresh are abandoned at that point.
    #[instrument(
        name = "book_manager.set_page_state",
        skip(self, book_uri, root_codes),
        fields(book = %book_uri, action = "setState")
    )]
    pub async fn set_page_state(
        &self,
        book_uri: &Url,
        root_codes: &[String],
        target_state: &str,
    ) -> AppResult<StateChangeReport> {
        self.apply_state(book_uri, root_codes, target_state).await
    }

    /// Delete every closed page below each root code.
    ///
    /// # Errors
    ///
    /// Fails on authentication, menu load, a malformed menu chain, or any
    /// deletion that still fails after retries.
    #[instrument(
        name = "book_manager.delete_entries",
        skip(self, book_uri, root_codes),
        fields(book = %book_uri, action = "delete")
    )]
    pub async fn delete_entries(
        &self,
        book_uri: &Url,
        root_codes: &[String],
    ) -> AppResult<DeleteReport> {
        self.delete_closed(book_uri, root_codes).await
    }

    async fn prepare(&self, book_uri: &Url) -> AppResult<(Session, Menu)> {
        let session = self
            .authenticator
            .authenticate()
            .await
            .map_err(|source| AppError::Authenticate { source })?;
        let menu = load_menu(&self.invoker, book_uri, &session).await?;
        Ok((session, menu))
    }

    async fn apply_state(
        &self,
        book_uri: &Url,
        root_codes: &[String],
        target_state: &str,
    ) -> AppResult<StateChangeReport> {
        let (session, menu) = self.prepare(book_uri).await?;
        let update_uri = command_uri(book_uri, UseCase::UpdatePage)?;
        let mut report = StateChangeReport {
            state: target_state.to_string(),
            ..StateChangeReport::default()
        };

        for root in root_codes {
            let Some(pages) = select(&menu, root)? else {
                report.missing_roots.push(root.clone());
                continue;
            };
            let to_change = filter_excluding(&pages, target_state);
            report.skipped.extend(
                pages
                    .iter()
                    .filter(|page| page.state == target_state)
                    .map(|page| page.code.clone()),
            );
            info!(root = %root, count = to_change.len(), "pages to change");
            for page in &to_change {
                debug!(%page, "page to change");
            }

            for page in to_change {
                let payload = json!({ "code": page.code, "state": target_state });
                self.invoker
                    .post(&update_uri, Some(&payload), &session)
                    .await
                    .map_err(|source| AppError::remote(UseCase::UpdatePage.as_str(), source))?;
                info!(
                    code = %page.code,
                    from = %page.state,
                    to = target_state,
                    "page state updated"
                );
                report.updated.push(page.code);
            }
        }

        let index_uri = command_uri(book_uri, UseCase::UpdateBookIndex)?;
        self.invoker
            .post(&index_uri, None, &session)
            .await
            .map_err(|source| AppError::remote(UseCase::UpdateBookIndex.as_str(), source))?;
        info!("book index refresh requested");
        report.index_refreshed = true;
        Ok(report)
    }

    async fn delete_closed(
        &self,
        book_uri: &Url,
        root_codes: &[String],
    ) -> AppResult<DeleteReport> {
        let (session, menu) = self.prepare(book_uri).await?;
        let delete_uri = command_uri(book_uri, UseCase::DeletePage)?;
        let mut report = DeleteReport::default();

        for root in root_codes {
            let Some(pages) = select(&menu, root)? else {
                report.missing_roots.push(root.clone());
                continue;
            };
            info!(root = %root, count = pages.len(), "pages to delete");

            for page in pages {
                if !is_deletable(&page) {
                    error!(
                        code = %page.code,
                        state = %page.state,
                        "page {} won't be deleted because it is not in closed state",
                        page.code
                    );
                    report.ineligible.push(page);
                    continue;
                }
                let payload = json!({ "code": page.code });
                self.invoker
                    .post(&delete_uri, Some(&payload), &session)
                    .await
                    .map_err(|source| AppError::remote(UseCase::DeletePage.as_str(), source))?;
                info!(code = %page.code, "page deleted");
                report.deleted.push(page.code);
            }
        }
        Ok(report)
    }
}

/// Subtree below `root`, or `None` when the root page does not exist.
fn select(menu: &Menu, root: &str) -> AppResult<Option<Vec<BookPage>>> {
    let pages = extract_subtree(menu, root).map_err(|source| AppError::Menu {
        root: root.to_string(),
        source,
    })?;
    if pages.is_empty() {
        return Ok(None);
    }
    info!(root = %root, count = pages.len(), "selected subtree");
    for page in &pages {
        debug!(%page, "selected page");
    }
    Ok(Some(pages))
}

fn command_uri(book_uri: &Url, use_case: UseCase) -> AppResult<Url> {
    use_case_uri(book_uri, use_case).map_err(|source| AppError::remote(use_case.as_str(), source))
}
