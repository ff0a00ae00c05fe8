use bookkit_app::BookManager;
use bookkit_client::{Authenticator, Transport};
use tracing::info;
use url::Url;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};
use crate::output::render_state_report;

pub(crate) async fn handle_set_state<A: Authenticator, T: Transport>(
    manager: &BookManager<A, T>,
    book: &Url,
    root_pages: &[String],
    state: &str,
    format: OutputFormat,
) -> CliResult<()> {
    let report = manager
        .set_page_state(book, root_pages, state)
        .await
        .map_err(CliError::failure)?;
    info!(
        updated = report.updated.len(),
        unchanged = report.skipped.len(),
        "state change finished"
    );
    render_state_report(&report, format)
}
