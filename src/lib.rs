//! Reconcile - identity-aware list reconciliation.
//!
//! Given an old and a new ordered sequence of records, compute a script of
//! inserts, removes, moves and updates that turns one into the other without
//! rebuilding the whole sequence. The caller says which records are the same
//! entity and which of those changed content; the engine never looks inside
//! a record otherwise.
//!
//! # Quick Start
//!
//! ```
//! use reconcile::{reconcile, Edit};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Row { id: u32, title: &'static str }
//!
//! let old = vec![Row { id: 1, title: "one" }, Row { id: 2, title: "two" }];
//! let new = vec![Row { id: 2, title: "two" }, Row { id: 3, title: "three" }];
//!
//! let script = reconcile(&old, &new, |a, b| a.id == b.id, |a, b| a.title == b.title);
//!
//! assert_eq!(script.edits()[0], Edit::Remove { old_index: 0 });
//! assert_eq!(script.apply(&old).unwrap(), new);
//! ```
//!
//! # Presenting the result
//!
//! A list widget wants positions in the rows it currently shows rather than
//! old and new indices. [`EditScript::dispatch_updates_to`] replays a script
//! as [`ListUpdateCallback`] notifications, and
//! [`EditScript::dispatch_batched_to`] merges adjacent ones into ranges.

pub mod dispatch;
pub mod edit;
pub mod error;
pub mod matching;
pub mod options;
mod reconcile;
mod replay;

pub use dispatch::BatchingCallback;
pub use dispatch::ListUpdateCallback;
pub use dispatch::Notification;
pub use dispatch::RecordingCallback;
pub use edit::Edit;
pub use edit::EditCounts;
pub use edit::EditScript;
pub use error::ApplyError;
pub use matching::Pairing;
pub use options::ReconcileOptions;
pub use reconcile::*;
