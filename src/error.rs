//! Errors raised when an edit script does not fit the sequence it is applied to.

use thiserror::Error;

/// A script was applied to (or dispatched against) a sequence it was not
/// computed from.
///
/// Scripts produced by [`crate::reconcile()`] never fail against their own
/// `old` sequence. These errors exist for scripts that were deserialized,
/// hand-built, or replayed against the wrong list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApplyError {
    #[error("remove of old index {index} is out of bounds (len {len})")]
    RemoveOutOfBounds { index: usize, len: usize },

    #[error("insert at position {index} is out of bounds (len {len})")]
    InsertOutOfBounds { index: usize, len: usize },

    #[error("no record with old index {index} is present")]
    UnknownOldIndex { index: usize },

    #[error("update expects old index {old_index} at position {new_index}")]
    UpdateMismatch { old_index: usize, new_index: usize },
}
