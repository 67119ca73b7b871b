//! # Treelister
//!
//! `treelister` walks a directory tree depth-first, pre-order, and streams every
//! visited directory and file path to a [`LineSink`] as it is reached. Errors
//! below the root do not stop the walk; they are collected into the final
//! [`TraversalOutcome`].
//!
//! It provides a blocking API ([`walk`], [`walk_with`]) and a background API
//! ([`start_traversal`]) that runs the walk on its own thread and hands lines
//! back over a channel, with cooperative cancellation through a [`RunHandle`].
//!
//! # Features
//!
//! - `logging`: Enables debug logging via the `tracing` crate (on by default).
//!
//! # Example
//!
//! ```no_run
//! use treelister::{WalkOptionsBuilder, start_traversal};
//!
//! let options = WalkOptionsBuilder::new(".")
//!     .sort_entries(true)
//!     .build();
//!
//! let mut handle = start_traversal(options).expect("Failed to start walk");
//! let mut lines: Vec<String> = Vec::new();
//! let outcome = handle.drain_into(&mut lines).expect("Walker thread failed");
//!
//! for line in &lines {
//!     println!("{}", line);
//! }
//! println!("{}", treelister::output::format_summary(&outcome));
//! ```

mod engine;
mod error;
mod options;
pub mod output;
mod run;
mod sink;
mod types;

pub use engine::{walk, walk_with};
pub use error::{ConfigError, RootError, RunError, TreelisterError};
pub use options::{WalkOptions, WalkOptionsBuilder};
pub use run::{RunHandle, start, start_traversal};
pub use sink::{ChannelSink, FnSink, LineSink, WalkEvent};
pub use types::{CancelToken, FailureKind, ListingFailure, TraversalOutcome, WalkStats};
