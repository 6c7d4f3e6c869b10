//! Longest common subsequence on identity.
//!
//! The textbook dynamic program: `table[i][j]` is the length of the longest
//! common subsequence of `old[i..]` and `new[j..]`, compared by key. Walking
//! the table from the top left recovers one such subsequence. Records on it
//! stay in place; every other old record is removed and every other new
//! record inserted.
//!
//! Without moves this is the smallest script there is, but the table costs
//! O(N×M) time and memory.

use reconcile::{ApplyError, Edit, EditScript};

use crate::differ::{Differ, Keyed};

/// Keeps one longest common subsequence in place; never moves.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lcs;

impl Lcs {
    /// The `(old_index, new_index)` pairs of one longest common subsequence,
    /// ascending in both indices.
    pub fn common<R: Keyed>(old: &[R], new: &[R]) -> Vec<(usize, usize)> {
        let old_keys: Vec<R::Key> = old.iter().map(Keyed::key).collect();
        let new_keys: Vec<R::Key> = new.iter().map(Keyed::key).collect();
        let (n, m) = (old.len(), new.len());

        let width = m + 1;
        let mut table = vec![0usize; (n + 1) * width];
        for i in (0..n).rev() {
            for j in (0..m).rev() {
                table[i * width + j] = if old_keys[i] == new_keys[j] {
                    table[(i + 1) * width + j + 1] + 1
                } else {
                    table[(i + 1) * width + j].max(table[i * width + j + 1])
                };
            }
        }

        let mut pairs = Vec::with_capacity(table[0]);
        let (mut i, mut j) = (0, 0);
        while i < n && j < m {
            if old_keys[i] == new_keys[j] {
                pairs.push((i, j));
                i += 1;
                j += 1;
            } else if table[(i + 1) * width + j] >= table[i * width + j + 1] {
                i += 1;
            } else {
                j += 1;
            }
        }
        return pairs;
    }
}

impl Differ for Lcs {
    fn name(&self) -> &'static str {
        return "lcs";
    }

    fn diff<'a, R: Keyed + PartialEq>(
        &self,
        old: &[R],
        new: &'a [R],
    ) -> Result<EditScript<&'a R>, ApplyError> {
        let mut new_to_old = vec![None; new.len()];
        let mut kept = vec![false; old.len()];
        for (old_index, new_index) in Lcs::common(old, new) {
            new_to_old[new_index] = Some(old_index);
            kept[old_index] = true;
        }

        let mut edits = Vec::new();
        for old_index in (0..old.len()).rev() {
            if !kept[old_index] {
                edits.push(Edit::Remove { old_index });
            }
        }
        for (new_index, record) in new.iter().enumerate() {
            match new_to_old[new_index] {
                None => edits.push(Edit::Insert { new_index, record }),
                Some(old_index) if old[old_index] != *record => edits.push(Edit::Update {
                    old_index,
                    new_index,
                    record,
                }),
                Some(_) => {}
            }
        }
        return EditScript::from_edits(edits, old.len());
    }
}
