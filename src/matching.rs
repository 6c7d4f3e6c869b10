//! Identity pairing between an old and a new sequence.
//!
//! A [`Pairing`] links each new position to at most one old position and
//! vice versa. Both builders apply the same tie-break for duplicate
//! identities: the first old record with a given identity pairs with the
//! first new record with that identity, and every later duplicate on either
//! side stays unpaired.
//!
//! - [`Pairing::by_predicate`]: scans `old` for every new record, so it is
//!   O(N×M) but needs nothing beyond an equality predicate.
//! - [`Pairing::by_key`]: hashes identity keys once, O(N+M) on average.

use std::hash::Hash;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// Old positions sharing one identity key. Almost always a single entry.
type Positions = SmallVec<[usize; 2]>;

/// Which old record each new record continues, and the reverse.
///
/// ```
/// use reconcile::Pairing;
///
/// let old = ["a", "b", "a"];
/// let new = ["a", "c", "a"];
/// let pairing = Pairing::by_key(&old, &new, |record| *record);
///
/// // The second "a" on each side loses to the first.
/// assert_eq!(pairing.matched(), 1);
/// assert_eq!(pairing.new_to_old(0), Some(0));
/// assert_eq!(pairing.new_to_old(2), None);
/// assert_eq!(pairing.old_to_new(1), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pairing {
    old_to_new: Vec<Option<usize>>,
    new_to_old: Vec<Option<usize>>,
}

impl Pairing {
    /// A pairing of two sequences where nothing matches.
    pub(crate) fn unmatched(old_len: usize, new_len: usize) -> Pairing {
        return Pairing {
            old_to_new: vec![None; old_len],
            new_to_old: vec![None; new_len],
        };
    }

    /// Pair records using an identity predicate.
    pub fn by_predicate<R>(
        old: &[R],
        new: &[R],
        same_identity: impl Fn(&R, &R) -> bool,
    ) -> Pairing {
        let mut pairing = Pairing::unmatched(old.len(), new.len());
        for (new_index, record) in new.iter().enumerate() {
            let first = old.iter().position(|candidate| same_identity(candidate, record));
            if let Some(old_index) = first {
                pairing.link(old_index, new_index);
            }
        }
        return pairing;
    }

    /// Pair records using a hashable identity key.
    pub fn by_key<R, K: Hash + Eq>(old: &[R], new: &[R], key: impl Fn(&R) -> K) -> Pairing {
        let mut index: FxHashMap<K, Positions> = FxHashMap::default();
        index.reserve(old.len());
        for (old_index, record) in old.iter().enumerate() {
            index.entry(key(record)).or_default().push(old_index);
        }

        let duplicates = old.len() - index.len();
        if duplicates > 0 {
            tracing::debug!(
                duplicates,
                old_len = old.len(),
                "old sequence repeats identity keys, first occurrence wins"
            );
        }

        let mut pairing = Pairing::unmatched(old.len(), new.len());
        for (new_index, record) in new.iter().enumerate() {
            let first = index.get(&key(record)).and_then(|positions| positions.first());
            if let Some(&old_index) = first {
                pairing.link(old_index, new_index);
            }
        }
        return pairing;
    }

    /// Pair `old_index` with `new_index` unless the old record is already
    /// claimed by an earlier new record.
    fn link(&mut self, old_index: usize, new_index: usize) {
        if self.old_to_new[old_index].is_some() {
            return;
        }
        self.old_to_new[old_index] = Some(new_index);
        self.new_to_old[new_index] = Some(old_index);
    }

    fn unlink_new(&mut self, new_index: usize) {
        if let Some(old_index) = self.new_to_old[new_index].take() {
            self.old_to_new[old_index] = None;
        }
    }

    /// Keep only the longest run of pairs whose old indices increase along
    /// the new sequence; every other pair is dropped.
    ///
    /// What remains can be reached without moving anything: removing the
    /// unpaired old records leaves the survivors already in new order.
    pub fn retain_increasing(&mut self) {
        let pairs: Vec<(usize, usize)> = self
            .new_to_old
            .iter()
            .enumerate()
            .filter_map(|(new_index, old_index)| old_index.map(|old_index| (new_index, old_index)))
            .collect();

        let keep = longest_increasing(&pairs);
        for (&(new_index, _), kept) in pairs.iter().zip(keep) {
            if !kept {
                self.unlink_new(new_index);
            }
        }
    }

    /// Length of the old sequence.
    pub fn old_len(&self) -> usize {
        return self.old_to_new.len();
    }

    /// Length of the new sequence.
    pub fn new_len(&self) -> usize {
        return self.new_to_old.len();
    }

    /// The new position paired with `old_index`, if any.
    pub fn old_to_new(&self, old_index: usize) -> Option<usize> {
        return self.old_to_new.get(old_index).copied().flatten();
    }

    /// The old position paired with `new_index`, if any.
    pub fn new_to_old(&self, new_index: usize) -> Option<usize> {
        return self.new_to_old.get(new_index).copied().flatten();
    }

    /// Number of paired records.
    pub fn matched(&self) -> usize {
        return self.new_to_old.iter().filter(|slot| slot.is_some()).count();
    }

    pub(crate) fn into_maps(self) -> (Vec<Option<usize>>, Vec<Option<usize>>) {
        return (self.old_to_new, self.new_to_old);
    }
}

/// Mark the members of one longest strictly increasing subsequence of the
/// old indices in `pairs`. Patience sorting, O(n log n).
fn longest_increasing(pairs: &[(usize, usize)]) -> Vec<bool> {
    // tails[k] is the pair ending the best run of length k + 1 found so far.
    let mut tails: Vec<usize> = Vec::new();
    let mut previous: Vec<Option<usize>> = vec![None; pairs.len()];

    for (n, &(_, old_index)) in pairs.iter().enumerate() {
        let run = tails.partition_point(|&t| pairs[t].1 < old_index);
        if run > 0 {
            previous[n] = Some(tails[run - 1]);
        }
        if run == tails.len() {
            tails.push(n);
        } else {
            tails[run] = n;
        }
    }

    let mut keep = vec![false; pairs.len()];
    let mut cursor = tails.last().copied();
    while let Some(n) = cursor {
        keep[n] = true;
        cursor = previous[n];
    }
    return keep;
}
