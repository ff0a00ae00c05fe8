use bookkit_app::BookManager;
use bookkit_client::{Authenticator, Transport};
use tracing::info;
use url::Url;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};
use crate::output::render_delete_report;

pub(crate) async fn handle_delete<A: Authenticator, T: Transport>(
    manager: &BookManager<A, T>,
    book: &Url,
    root_pages: &[String],
    format: OutputFormat,
) -> CliResult<()> {
    let report = manager
        .delete_entries(book, root_pages)
        .await
        .map_err(CliError::failure)?;
    info!(
        deleted = report.deleted.len(),
        kept = report.ineligible.len(),
        "delete finished"
    );
    render_delete_report(&report, format)
}
