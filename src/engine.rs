use crate::error::RootError;
use crate::options::{WalkOptions, WalkOptionsBuilder};
use crate::sink::LineSink;
use crate::types::{CancelToken, FailureKind, ListingFailure, TraversalOutcome, WalkStats};
use ignore::WalkBuilder;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
#[cfg(feature = "logging")]
use tracing;
struct Walker {
    inner: ignore::Walk,
}
impl Walker {
    fn new(options: &WalkOptions) -> Self {
        let mut builder = WalkBuilder::new(&options.root);
        builder
            .standard_filters(false)
            .follow_links(options.follow_links);
        if options.sort_entries {
            builder.sort_by_file_name(|a, b| a.cmp(b));
        }
        Self {
            inner: builder.build(),
        }
    }
}
fn validate_root(root: &Path) -> Result<(), RootError> {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(RootError::NotADirectory {
            path: root.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(RootError::NotFound {
            path: root.to_path_buf(),
        }),
        Err(e) => Err(RootError::Inaccessible {
            path: root.to_path_buf(),
            message: e.to_string(),
        }),
    }
}
/// Unwraps the depth/path layers `ignore` puts around walkdir errors.
fn failure_from_walk_error(err: &ignore::Error, fallback: &Path) -> ListingFailure {
    let mut tagged: Option<PathBuf> = None;
    let mut current = err;
    loop {
        match current {
            ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
                current = &**err;
            }
            ignore::Error::WithPath { path, err } => {
                tagged.get_or_insert_with(|| path.clone());
                current = &**err;
            }
            ignore::Error::Loop { ancestor, child } => {
                return ListingFailure {
                    path: child.clone(),
                    kind: FailureKind::SymlinkLoop {
                        ancestor: ancestor.clone(),
                    },
                    message: current.to_string(),
                };
            }
            other => {
                return ListingFailure {
                    path: tagged.unwrap_or_else(|| fallback.to_path_buf()),
                    kind: FailureKind::Io,
                    message: other.to_string(),
                };
            }
        }
    }
}
fn run_walk<S: LineSink>(
    options: &WalkOptions,
    sink: &mut S,
    cancel: &CancelToken,
) -> TraversalOutcome {
    if let Err(error) = validate_root(&options.root) {
        #[cfg(feature = "logging")]
        tracing::warn!("Rejecting walk: {}", error);
        return TraversalOutcome::Failed { error };
    }
    let mut stats = WalkStats::default();
    let mut failures = Vec::new();
    let mut walker = Walker::new(options).inner;
    loop {
        if cancel.is_cancelled() {
            #[cfg(feature = "logging")]
            tracing::info!(
                "Walk of {} cancelled after {} entries",
                options.root.display(),
                stats.total()
            );
            return TraversalOutcome::Cancelled { stats, failures };
        }
        let Some(result) = walker.next() else {
            break;
        };
        match result {
            Ok(entry) => {
                if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                    stats.directories += 1;
                } else {
                    stats.files += 1;
                }
                sink.on_line(&entry.path().to_string_lossy());
            }
            Err(err) => {
                let failure = failure_from_walk_error(&err, &options.root);
                #[cfg(feature = "logging")]
                tracing::warn!(
                    path = %failure.path.display(),
                    "Skipping subtree: {}",
                    failure.message
                );
                failures.push(failure);
            }
        }
    }
    #[cfg(feature = "logging")]
    tracing::debug!(
        "Walk of {} finished: {} directories, {} files, {} failures",
        options.root.display(),
        stats.directories,
        stats.files,
        failures.len()
    );
    TraversalOutcome::Completed { stats, failures }
}
/// Walks `options.root` depth-first, pre-order, pushing each visited path to
/// `sink` as soon as it is reached.
///
/// Listing failures below the root are collected into the outcome and the walk
/// carries on with the remaining siblings. `cancel` is checked before every
/// entry; once it is set no further lines are emitted and the outcome is
/// [`TraversalOutcome::Cancelled`]. `sink.on_complete` is called exactly once,
/// after the last line, whatever the outcome.
pub fn walk_with<S: LineSink>(
    options: &WalkOptions,
    mut sink: S,
    cancel: &CancelToken,
) -> TraversalOutcome {
    #[cfg(feature = "logging")]
    tracing::debug!(
        "Starting walk at {} (follow_links={}, sort_entries={})",
        options.root.display(),
        options.follow_links,
        options.sort_entries
    );
    let outcome = run_walk(options, &mut sink, cancel);
    sink.on_complete(&outcome);
    outcome
}
/// [`walk_with`] using default options and no cancellation.
pub fn walk<S: LineSink>(root: impl Into<PathBuf>, sink: S) -> TraversalOutcome {
    let options = WalkOptionsBuilder::new(root).build();
    walk_with(&options, sink, &CancelToken::new())
}
