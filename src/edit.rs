//! Edit operations and the scripts built from them.
//!
//! An [`EditScript`] is canonical: every `Remove` comes first, in descending
//! old index, and the remaining edits follow in ascending new index. Under
//! that ordering every index in the script is also the position the edit
//! touches at the moment it is applied:
//!
//! - `Remove { old_index }` removes the entry at `old_index`. Removing from
//!   the back keeps every lower index where it was.
//! - `Insert { new_index, .. }` inserts at `new_index`. Positions before it
//!   already hold the new sequence's prefix.
//! - `Move { old_index, new_index }` detaches the entry that came from
//!   `old_index` (always somewhere right of `new_index`) and reinserts it at
//!   `new_index`.
//! - `Update { old_index, new_index, .. }` replaces the content of the entry
//!   at `new_index`, which came from `old_index`. If the same pair also moved,
//!   the `Update` directly follows its `Move`.

use std::borrow::Borrow;

use crate::error::ApplyError;
use crate::replay::Slot;

/// A single edit. `T` is the record payload: `&R` straight out of
/// [`crate::reconcile()`], or an owned `R` after [`EditScript::cloned`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Edit<T> {
    /// A record with no counterpart in the old sequence.
    Insert { new_index: usize, record: T },
    /// An old record with no counterpart in the new sequence.
    Remove { old_index: usize },
    /// Same identity, different position.
    Move { old_index: usize, new_index: usize },
    /// Same identity, different content.
    Update {
        old_index: usize,
        new_index: usize,
        record: T,
    },
}

impl<T> Edit<T> {
    /// Transform the record payload, keeping the indices.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Edit<U> {
        return match self {
            Edit::Insert { new_index, record } => Edit::Insert {
                new_index,
                record: f(record),
            },
            Edit::Remove { old_index } => Edit::Remove { old_index },
            Edit::Move { old_index, new_index } => Edit::Move { old_index, new_index },
            Edit::Update {
                old_index,
                new_index,
                record,
            } => Edit::Update {
                old_index,
                new_index,
                record: f(record),
            },
        };
    }

    /// True for `Insert`.
    pub fn is_insert(&self) -> bool {
        return matches!(self, Edit::Insert { .. });
    }

    /// True for `Remove`.
    pub fn is_remove(&self) -> bool {
        return matches!(self, Edit::Remove { .. });
    }

    /// True for `Move`.
    pub fn is_move(&self) -> bool {
        return matches!(self, Edit::Move { .. });
    }

    /// True for `Update`.
    pub fn is_update(&self) -> bool {
        return matches!(self, Edit::Update { .. });
    }
}

/// Per-kind totals of a script.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditCounts {
    pub inserts: usize,
    pub removes: usize,
    pub moves: usize,
    pub updates: usize,
}

impl EditCounts {
    /// All edits of every kind.
    pub fn total(&self) -> usize {
        return self.inserts + self.removes + self.moves + self.updates;
    }
}

/// The result of reconciling two sequences: the ordered edits plus the
/// position mapping between them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EditScript<T> {
    edits: Vec<Edit<T>>,
    old_to_new: Vec<Option<usize>>,
    new_to_old: Vec<Option<usize>>,
}

impl<T> EditScript<T> {
    pub(crate) fn new(
        edits: Vec<Edit<T>>,
        old_to_new: Vec<Option<usize>>,
        new_to_old: Vec<Option<usize>>,
    ) -> EditScript<T> {
        return EditScript {
            edits,
            old_to_new,
            new_to_old,
        };
    }

    /// The edits, in application order.
    pub fn edits(&self) -> &[Edit<T>] {
        return &self.edits;
    }

    /// Take the edits, dropping the position maps.
    pub fn into_edits(self) -> Vec<Edit<T>> {
        return self.edits;
    }

    /// Iterate over the edits in application order.
    pub fn iter(&self) -> std::slice::Iter<'_, Edit<T>> {
        return self.edits.iter();
    }

    /// Number of edits.
    pub fn len(&self) -> usize {
        return self.edits.len();
    }

    /// True when the old and new sequences were already identical.
    pub fn is_empty(&self) -> bool {
        return self.edits.is_empty();
    }

    /// Length of the sequence this script applies to.
    pub fn old_len(&self) -> usize {
        return self.old_to_new.len();
    }

    /// Length of the sequence this script produces.
    pub fn new_len(&self) -> usize {
        return self.new_to_old.len();
    }

    /// Where the record at `old_index` ends up, or `None` if it was removed
    /// (or `old_index` is out of range).
    pub fn old_to_new(&self, old_index: usize) -> Option<usize> {
        return self.old_to_new.get(old_index).copied().flatten();
    }

    /// Where the record at `new_index` came from, or `None` if it was
    /// inserted (or `new_index` is out of range).
    pub fn new_to_old(&self, new_index: usize) -> Option<usize> {
        return self.new_to_old.get(new_index).copied().flatten();
    }

    /// Count the edits of each kind.
    pub fn counts(&self) -> EditCounts {
        let mut counts = EditCounts::default();
        for edit in &self.edits {
            match edit {
                Edit::Insert { .. } => counts.inserts += 1,
                Edit::Remove { .. } => counts.removes += 1,
                Edit::Move { .. } => counts.moves += 1,
                Edit::Update { .. } => counts.updates += 1,
            }
        }
        return counts;
    }

    /// Transform every record payload.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> EditScript<U> {
        return EditScript {
            edits: self.edits.into_iter().map(|edit| edit.map(&mut f)).collect(),
            old_to_new: self.old_to_new,
            new_to_old: self.new_to_old,
        };
    }

    /// Apply the script to `old`, producing the new sequence.
    ///
    /// Edits are resolved against a list of old-index tags, so a `Move` finds
    /// its record by identity rather than by a position that earlier edits
    /// may have shifted. A script from [`crate::reconcile()`] applies in
    /// O((N+M) log N); hand-built scripts in other orders cost O(N) per edit.
    pub fn apply<R>(&self, old: &[R]) -> Result<Vec<R>, ApplyError>
    where
        T: Borrow<R>,
        R: Clone,
    {
        let replay = self.replay(old.len())?;
        let mut records = Vec::with_capacity(replay.placed.len());
        for slot in &replay.placed {
            let record: &R = match *slot {
                Slot::Old(old_index) => match replay.updated[old_index] {
                    Some(fresh) => Borrow::<R>::borrow(fresh),
                    None => &old[old_index],
                },
                Slot::Fresh(fresh) => Borrow::<R>::borrow(fresh),
            };
            records.push(record.clone());
        }
        return Ok(records);
    }

    /// Build a script from hand-written edits against a sequence of
    /// `old_len` records. The edits are checked by replaying them, and the
    /// position maps are read off the result.
    pub fn from_edits(edits: Vec<Edit<T>>, old_len: usize) -> Result<EditScript<T>, ApplyError> {
        let mut script = EditScript {
            edits,
            old_to_new: vec![None; old_len],
            new_to_old: Vec::new(),
        };
        let placed: Vec<Option<usize>> = {
            let replay = script.replay(old_len)?;
            replay.placed.iter().map(|slot| slot.old_index()).collect()
        };
        for (new_index, old_index) in placed.iter().enumerate() {
            if let Some(old_index) = *old_index {
                script.old_to_new[old_index] = Some(new_index);
            }
        }
        script.new_to_old = placed;
        return Ok(script);
    }
}

impl<T: Clone> EditScript<&T> {
    /// Detach the script from the borrowed new sequence.
    pub fn cloned(self) -> EditScript<T> {
        return self.map(|record| record.clone());
    }
}

impl<'s, T> IntoIterator for &'s EditScript<T> {
    type Item = &'s Edit<T>;
    type IntoIter = std::slice::Iter<'s, Edit<T>>;

    fn into_iter(self) -> Self::IntoIter {
        return self.edits.iter();
    }
}

impl<T> IntoIterator for EditScript<T> {
    type Item = Edit<T>;
    type IntoIter = std::vec::IntoIter<Edit<T>>;

    fn into_iter(self) -> Self::IntoIter {
        return self.edits.into_iter();
    }
}
