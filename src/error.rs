use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Why a walk could not start at its root.
///
/// Plain data rather than a wrapped [`std::io::Error`], so it can travel
/// inside a [`TraversalOutcome`](crate::TraversalOutcome) and be serialized
/// with it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootError {
    #[error("root not found: {path}")]
    NotFound { path: PathBuf },
    #[error("root is not a directory: {path}")]
    NotADirectory { path: PathBuf },
    #[error("cannot access root {path}: {message}")]
    Inaccessible { path: PathBuf, message: String },
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to spawn walker thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("walker thread panicked")]
    WorkerPanicked,
    #[error("walker channel closed before completion")]
    Disconnected,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        ConfigError::Parse {
            path: path.into(),
            source,
        }
    }
}

#[derive(Debug, Error)]
pub enum TreelisterError {
    #[error(transparent)]
    Run(#[from] RunError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("write failed: {0}")]
    Output(#[from] std::io::Error),
}

impl TreelisterError {
    /// The reader of our output went away, e.g. `treelister | head -1`.
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, TreelisterError::Output(e) if e.kind() == std::io::ErrorKind::BrokenPipe)
    }
}
