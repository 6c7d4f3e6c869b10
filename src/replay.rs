//! Resolving a script to the positions its edits touch.
//!
//! Applying a script, dispatching it to a list widget and building one from
//! hand-written edits all need the same thing: the position each edit
//! touches when the edits run in order, plus where every record ends up.
//!
//! Scripts from [`crate::reconcile()`] are canonical: removes first in
//! descending old index, then everything else by ascending new index. While
//! such a script runs, the list is always a finished prefix followed by the
//! old records not placed yet, still in old order. That makes a move's
//! current position the prefix length plus the number of pending records
//! ahead of it, which a prefix-count tree answers in O(log n). Any other
//! script falls back to editing a shadow list of old-index tags, which costs
//! O(n) per edit.

use crate::edit::Edit;
use crate::edit::EditScript;
use crate::error::ApplyError;

/// An edit resolved to the position it touches when applied in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    Removed { position: usize },
    Inserted { position: usize },
    Moved { from: usize, to: usize },
    Changed { position: usize },
}

/// One entry of the list being rebuilt.
#[derive(Debug)]
pub(crate) enum Slot<'e, T> {
    /// The record that sat at this old index.
    Old(usize),
    /// A record carried by an `Insert`.
    Fresh(&'e T),
}

impl<T> Clone for Slot<'_, T> {
    fn clone(&self) -> Self {
        return *self;
    }
}

impl<T> Copy for Slot<'_, T> {}

impl<T> Slot<'_, T> {
    pub(crate) fn old_index(&self) -> Option<usize> {
        return match self {
            Slot::Old(old_index) => Some(*old_index),
            Slot::Fresh(_) => None,
        };
    }
}

/// The outcome of running a script against a list of `old_len` records.
pub(crate) struct Replay<'e, T> {
    /// One step per edit, in edit order.
    pub(crate) steps: Vec<Step>,
    /// The final list.
    pub(crate) placed: Vec<Slot<'e, T>>,
    /// Latest `Update` payload for each old index.
    pub(crate) updated: Vec<Option<&'e T>>,
}

impl<T> EditScript<T> {
    /// Resolve every edit against a list of `old_len` records, or report the
    /// first edit that does not fit.
    pub(crate) fn replay(&self, old_len: usize) -> Result<Replay<'_, T>, ApplyError> {
        if let Some(replay) = self.replay_in_order(old_len) {
            return Ok(replay);
        }
        return self.replay_shadow(old_len);
    }

    /// The fast path for canonical scripts. Returns `None` as soon as an edit
    /// breaks the canonical shape, including edits that would fail.
    pub(crate) fn replay_in_order(&self, old_len: usize) -> Option<Replay<'_, T>> {
        let edits = self.edits();
        let removes = edits.iter().take_while(|edit| edit.is_remove()).count();
        let (head, tail) = edits.split_at(removes);

        let mut steps = Vec::with_capacity(edits.len());
        let mut removed = vec![false; old_len];
        let mut floor = old_len;
        for edit in head {
            let Edit::Remove { old_index } = edit else {
                return None;
            };
            if *old_index >= floor {
                return None;
            }
            floor = *old_index;
            removed[*old_index] = true;
            steps.push(Step::Removed { position: *old_index });
        }

        let survivors: Vec<usize> = (0..old_len).filter(|&old_index| !removed[old_index]).collect();
        let mut list = Prefix::new(survivors, old_len);
        let mut updated = vec![None; old_len];

        for edit in tail {
            match edit {
                Edit::Remove { .. } => return None,
                Edit::Insert { new_index, record } => {
                    list.reach(*new_index)?;
                    list.placed.push(Slot::Fresh(record));
                    steps.push(Step::Inserted { position: *new_index });
                }
                Edit::Move { old_index, new_index } => {
                    list.reach(*new_index)?;
                    let slot = list.slot_of(*old_index)?;
                    let from = *new_index + list.pending.count_before(slot);
                    list.take(slot);
                    steps.push(Step::Moved {
                        from,
                        to: *new_index,
                    });
                }
                Edit::Update {
                    old_index,
                    new_index,
                    record,
                } => {
                    if *new_index >= list.placed.len() {
                        list.reach(*new_index)?;
                        let slot = list.next_pending()?;
                        list.take(slot);
                    }
                    if list.placed[*new_index].old_index() != Some(*old_index) {
                        return None;
                    }
                    updated[*old_index] = Some(record);
                    steps.push(Step::Changed { position: *new_index });
                }
            }
        }

        while let Some(slot) = list.next_pending() {
            list.take(slot);
        }
        return Some(Replay {
            steps,
            placed: list.placed,
            updated,
        });
    }

    /// The general path: edit a shadow list of slots one edit at a time.
    pub(crate) fn replay_shadow(&self, old_len: usize) -> Result<Replay<'_, T>, ApplyError> {
        let mut steps = Vec::with_capacity(self.len());
        let mut shadow: Vec<Slot<'_, T>> = (0..old_len).map(Slot::Old).collect();
        let mut updated = vec![None; old_len];

        for edit in self.edits() {
            match edit {
                Edit::Remove { old_index } => {
                    let index = *old_index;
                    match shadow.get(index) {
                        Some(slot) if slot.old_index() == Some(index) => {}
                        Some(_) => return Err(ApplyError::UnknownOldIndex { index }),
                        None => {
                            return Err(ApplyError::RemoveOutOfBounds {
                                index,
                                len: shadow.len(),
                            });
                        }
                    }
                    shadow.remove(index);
                    steps.push(Step::Removed { position: index });
                }
                Edit::Insert { new_index, record } => {
                    let index = *new_index;
                    if index > shadow.len() {
                        return Err(ApplyError::InsertOutOfBounds {
                            index,
                            len: shadow.len(),
                        });
                    }
                    shadow.insert(index, Slot::Fresh(record));
                    steps.push(Step::Inserted { position: index });
                }
                Edit::Move { old_index, new_index } => {
                    let from = shadow
                        .iter()
                        .position(|slot| slot.old_index() == Some(*old_index))
                        .ok_or(ApplyError::UnknownOldIndex { index: *old_index })?;
                    if *new_index >= shadow.len() {
                        return Err(ApplyError::InsertOutOfBounds {
                            index: *new_index,
                            len: shadow.len() - 1,
                        });
                    }
                    let entry = shadow.remove(from);
                    shadow.insert(*new_index, entry);
                    steps.push(Step::Moved {
                        from,
                        to: *new_index,
                    });
                }
                Edit::Update {
                    old_index,
                    new_index,
                    record,
                } => {
                    let found = shadow.get(*new_index).and_then(|slot| slot.old_index());
                    if found != Some(*old_index) {
                        return Err(ApplyError::UpdateMismatch {
                            old_index: *old_index,
                            new_index: *new_index,
                        });
                    }
                    updated[*old_index] = Some(record);
                    steps.push(Step::Changed { position: *new_index });
                }
            }
        }

        return Ok(Replay {
            steps,
            placed: shadow,
            updated,
        });
    }
}

/// A list that is a finished prefix followed by the survivors of the removes
/// that have not been placed yet, in old order.
struct Prefix<'e, T> {
    /// Surviving old indices in old order.
    survivors: Vec<usize>,
    /// Survivor slot of each old index, if it survived.
    slot: Vec<Option<usize>>,
    /// Survivor slots already placed.
    taken: Vec<bool>,
    pending: PendingCounts,
    /// No survivor slot before this one is still pending.
    cursor: usize,
    placed: Vec<Slot<'e, T>>,
}

impl<'e, T> Prefix<'e, T> {
    fn new(survivors: Vec<usize>, old_len: usize) -> Prefix<'e, T> {
        let mut slot = vec![None; old_len];
        for (index, &old_index) in survivors.iter().enumerate() {
            slot[old_index] = Some(index);
        }
        let len = survivors.len();
        return Prefix {
            survivors,
            slot,
            taken: vec![false; len],
            pending: PendingCounts::new(len),
            cursor: 0,
            placed: Vec::with_capacity(len),
        };
    }

    /// Place pending survivors in order until the prefix is `len` long.
    /// `None` if the prefix is already longer or the survivors run out.
    fn reach(&mut self, len: usize) -> Option<()> {
        if len < self.placed.len() {
            return None;
        }
        while self.placed.len() < len {
            let slot = self.next_pending()?;
            self.take(slot);
        }
        return Some(());
    }

    fn next_pending(&mut self) -> Option<usize> {
        while self.cursor < self.taken.len() && self.taken[self.cursor] {
            self.cursor += 1;
        }
        if self.cursor < self.taken.len() {
            return Some(self.cursor);
        }
        return None;
    }

    /// Survivor slot of a pending `old_index`.
    fn slot_of(&self, old_index: usize) -> Option<usize> {
        let slot = self.slot.get(old_index).copied().flatten()?;
        if self.taken[slot] {
            return None;
        }
        return Some(slot);
    }

    fn take(&mut self, slot: usize) {
        self.taken[slot] = true;
        self.pending.remove(slot);
        self.placed.push(Slot::Old(self.survivors[slot]));
    }
}

/// Counts of pending survivor slots as a Fenwick tree: `tree[i - 1]` holds
/// the count over slots `(i - lowbit(i), i]`, one-based.
struct PendingCounts {
    tree: Vec<usize>,
}

impl PendingCounts {
    /// Every one of `len` slots pending.
    fn new(len: usize) -> PendingCounts {
        let tree = (1..=len).map(|i| i & i.wrapping_neg()).collect();
        return PendingCounts { tree };
    }

    fn remove(&mut self, slot: usize) {
        let mut i = slot + 1;
        while i <= self.tree.len() {
            self.tree[i - 1] -= 1;
            i += i & i.wrapping_neg();
        }
    }

    /// Pending slots strictly before `slot`.
    fn count_before(&self, slot: usize) -> usize {
        let mut count = 0;
        let mut i = slot;
        while i > 0 {
            count += self.tree[i - 1];
            i -= i & i.wrapping_neg();
        }
        return count;
    }
}
