//! Reference list reconcilers.
//!
//! This crate provides deliberately simple reconcilers that produce the same
//! kind of [`EditScript`] as the production engine. They are useful for:
//!
//! - Learning what a reconciler has to get right before it gets fast
//! - Comparing script sizes between strategies
//! - Running conformance tests against a known-good baseline
//!
//! # Implementations
//!
//! | Implementation | Strategy | Edits used |
//! |----------------|----------|------------|
//! | [`Rebuild`] | Throw the old list away | Remove, Insert |
//! | [`Lcs`] | Longest common subsequence on identity | Remove, Insert, Update |
//! | [`Engine`] | `reconcile::reconcile_by_key_with` | all four |
//!
//! # Example
//!
//! ```
//! use pedagogy::{Differ, Keyed, Lcs, Rebuild};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Row { id: u32, title: &'static str }
//!
//! impl Keyed for Row {
//!     type Key = u32;
//!     fn key(&self) -> u32 { self.id }
//! }
//!
//! let old = vec![Row { id: 1, title: "a" }, Row { id: 2, title: "b" }];
//! let new = vec![Row { id: 2, title: "B" }];
//!
//! let rebuild = Rebuild.diff(&old, &new).unwrap();
//! let lcs = Lcs.diff(&old, &new).unwrap();
//! assert_eq!(rebuild.len(), 3);
//! assert_eq!(lcs.len(), 2);
//! assert_eq!(lcs.apply(&old).unwrap(), new);
//! ```

pub mod differ;
pub mod lcs;

pub use differ::Differ;
pub use differ::Engine;
pub use differ::Keyed;
pub use differ::Rebuild;
pub use lcs::Lcs;
