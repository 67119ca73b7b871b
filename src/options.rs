use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkOptions {
    pub root: PathBuf,
    /// Treat symlinks as their target. Links that point back at an ancestor
    /// are reported instead of followed.
    pub follow_links: bool,
    /// Sort siblings by file name instead of using the filesystem's order.
    pub sort_entries: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            follow_links: true,
            sort_entries: false,
        }
    }
}

impl WalkOptions {
    /// Loads options from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        serde_json::from_str(&raw).map_err(|e| ConfigError::parse(path, e))
    }
}

#[derive(Debug, Default)]
pub struct WalkOptionsBuilder {
    options: WalkOptions,
}

impl WalkOptionsBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            options: WalkOptions {
                root: root.into(),
                ..Default::default()
            },
        }
    }
    pub fn from_options(options: WalkOptions) -> Self {
        Self { options }
    }
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.options.root = root.into();
        self
    }
    pub fn follow_links(mut self, yes: bool) -> Self {
        self.options.follow_links = yes;
        self
    }
    pub fn sort_entries(mut self, yes: bool) -> Self {
        self.options.sort_entries = yes;
        self
    }
    pub fn build(self) -> WalkOptions {
        self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let options: WalkOptions = serde_json::from_str(r#"{ "sort_entries": true }"#).unwrap();
        assert_eq!(options.root, PathBuf::from("."));
        assert!(options.follow_links);
        assert!(options.sort_entries);
    }

    #[test]
    fn builder_overrides_loaded_options() {
        let base = WalkOptions {
            root: PathBuf::from("/srv"),
            follow_links: true,
            sort_entries: true,
        };
        let options = WalkOptionsBuilder::from_options(base)
            .follow_links(false)
            .build();
        assert_eq!(options.root, PathBuf::from("/srv"));
        assert!(!options.follow_links);
        assert!(options.sort_entries);
    }
}
