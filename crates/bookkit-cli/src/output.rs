//! Renderers for run reports.

use std::fmt::Write as _;

use bookkit_app::{DeleteReport, StateChangeReport};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

pub(crate) fn render_state_report(
    report: &StateChangeReport,
    format: OutputFormat,
) -> CliResult<()> {
    let text = match format {
        OutputFormat::Json => to_json(report)?,
        OutputFormat::Table => state_table(report),
    };
    println!("{text}");
    Ok(())
}

pub(crate) fn render_delete_report(report: &DeleteReport, format: OutputFormat) -> CliResult<()> {
    let text = match format {
        OutputFormat::Json => to_json(report)?,
        OutputFormat::Table => delete_table(report),
    };
    println!("{text}");
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value).map_err(CliError::failure)
}

fn state_table(report: &StateChangeReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<40} RESULT", "PAGE");
    for code in &report.updated {
        let _ = writeln!(out, "{code:<40} set to {}", report.state);
    }
    for code in &report.skipped {
        let _ = writeln!(out, "{code:<40} already {}", report.state);
    }
    push_missing(&mut out, &report.missing_roots);
    let _ = write!(
        out,
        "updated: {}, unchanged: {}, index refreshed: {}",
        report.updated.len(),
        report.skipped.len(),
        if report.index_refreshed { "yes" } else { "no" }
    );
    out
}

fn delete_table(report: &DeleteReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<40} RESULT", "PAGE");
    for code in &report.deleted {
        let _ = writeln!(out, "{code:<40} deleted");
    }
    for page in &report.ineligible {
        let _ = writeln!(out, "{:<40} kept ({})", page.code, page.state);
    }
    push_missing(&mut out, &report.missing_roots);
    let _ = write!(
        out,
        "deleted: {}, kept: {}",
        report.deleted.len(),
        report.ineligible.len()
    );
    out
}

fn push_missing(out: &mut String, missing_roots: &[String]) {
    for code in missing_roots {
        let _ = writeln!(out, "{code:<40} root page not found");
    }
}
