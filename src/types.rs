use crate::error::RootError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// What went wrong below the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Listing a directory or reading an entry's metadata failed.
    Io,
    /// A followed symlink points at one of its own ancestors.
    SymlinkLoop { ancestor: PathBuf },
}

/// A non-fatal error recorded during a walk, tagged with the path that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingFailure {
    pub path: PathBuf,
    pub kind: FailureKind,
    pub message: String,
}

/// Counts of emitted lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkStats {
    pub directories: u64,
    pub files: u64,
}

impl WalkStats {
    pub fn total(&self) -> u64 {
        self.directories + self.files
    }
}

/// Terminal state of one walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TraversalOutcome {
    /// The whole tree was visited. Any failures are from subtrees that could
    /// not be listed.
    Completed {
        stats: WalkStats,
        failures: Vec<ListingFailure>,
    },
    /// The walk observed a cancellation request and stopped early.
    Cancelled {
        stats: WalkStats,
        failures: Vec<ListingFailure>,
    },
    /// The root failed validation. Nothing was emitted.
    Failed { error: RootError },
}

impl TraversalOutcome {
    /// Completed with zero failures.
    pub fn is_success(&self) -> bool {
        matches!(self, TraversalOutcome::Completed { failures, .. } if failures.is_empty())
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, TraversalOutcome::Cancelled { .. })
    }

    pub fn failures(&self) -> &[ListingFailure] {
        match self {
            TraversalOutcome::Completed { failures, .. }
            | TraversalOutcome::Cancelled { failures, .. } => failures,
            TraversalOutcome::Failed { .. } => &[],
        }
    }

    pub fn stats(&self) -> WalkStats {
        match self {
            TraversalOutcome::Completed { stats, .. }
            | TraversalOutcome::Cancelled { stats, .. } => *stats,
            TraversalOutcome::Failed { .. } => WalkStats::default(),
        }
    }

    pub fn root_error(&self) -> Option<&RootError> {
        match self {
            TraversalOutcome::Failed { error } => Some(error),
            _ => None,
        }
    }

    /// Process exit status for this outcome: 0 clean, 2 with failures,
    /// 1 for a root error, 130 when cancelled.
    pub fn exit_status(&self) -> u8 {
        match self {
            TraversalOutcome::Failed { .. } => 1,
            TraversalOutcome::Cancelled { .. } => 130,
            TraversalOutcome::Completed { failures, .. } if !failures.is_empty() => 2,
            TraversalOutcome::Completed { .. } => 0,
        }
    }
}

/// Cooperative cancellation flag shared between a walk and whoever may stop it.
///
/// Clones share the same flag. Once set it stays set.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
