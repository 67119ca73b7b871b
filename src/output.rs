//! Output formatting for walk results.
//!
//! Renders visited lines and the final [`TraversalOutcome`] either as plain
//! text or as newline-delimited JSON records.

use crate::error::TreelisterError;
use crate::types::{FailureKind, ListingFailure, TraversalOutcome};
use serde::Serialize;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum Record<'a> {
    Line { path: &'a str },
    Complete { outcome: &'a TraversalOutcome },
}

/// Formats one visited path as a single record.
pub fn format_line(
    line: &str,
    format: OutputFormat,
    pretty: bool,
) -> Result<String, TreelisterError> {
    match format {
        OutputFormat::Text => Ok(line.to_owned()),
        OutputFormat::Json => to_json(&Record::Line { path: line }, pretty),
    }
}

/// Formats the end-of-walk report.
///
/// For [`OutputFormat::Text`] this is one line per failure followed by the
/// summary line.
pub fn format_outcome(
    outcome: &TraversalOutcome,
    format: OutputFormat,
    pretty: bool,
) -> Result<String, TreelisterError> {
    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            for failure in outcome.failures() {
                out.push_str(&format_failure(failure));
                out.push('\n');
            }
            out.push_str(&format_summary(outcome));
            Ok(out)
        }
        OutputFormat::Json => to_json(&Record::Complete { outcome }, pretty),
    }
}

pub fn format_failure(failure: &ListingFailure) -> String {
    match &failure.kind {
        FailureKind::Io => format!("error: {}: {}", failure.path.display(), failure.message),
        FailureKind::SymlinkLoop { ancestor } => format!(
            "error: {}: symlink loop back to {}",
            failure.path.display(),
            ancestor.display()
        ),
    }
}

/// One-line human summary, e.g. `3 directories, 12 files, 1 error`.
pub fn format_summary(outcome: &TraversalOutcome) -> String {
    if let Some(error) = outcome.root_error() {
        return format!("error: {}", error);
    }
    let stats = outcome.stats();
    let mut out = format!(
        "{} {}, {} {}",
        stats.directories,
        plural(stats.directories, "directory", "directories"),
        stats.files,
        plural(stats.files, "file", "files")
    );
    let errors = outcome.failures().len() as u64;
    if errors > 0 {
        out.push_str(&format!(
            ", {} {}",
            errors,
            plural(errors, "error", "errors")
        ));
    }
    if outcome.is_cancelled() {
        out.push_str(" (cancelled)");
    }
    out
}

fn plural(n: u64, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 { one } else { many }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, TreelisterError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
