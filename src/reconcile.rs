//! The reconciliation engine.
//!
//! Reconciling runs in two stages. First the old and new sequences are
//! paired by identity (see [`crate::matching`]). Then a single walk over the
//! new sequence turns the pairing into edits. The list being edited is
//! never materialized: past the placed prefix it is just the paired old
//! records not placed yet, in old order, so one cursor tracks it.
//!
//! 1. Unpaired old records are removed, highest index first.
//! 2. For each new position `j`, in order, the prefix `0..j` already matches.
//!    An unpaired record is inserted at `j`. A paired record that is not at
//!    `j` yet is moved there. A paired record whose content differs also
//!    gets an update, right after its move if it had one.
//!
//! Inserts and removes never cause moves: the cursor already accounts for
//! them, so appending, prepending or deleting records leaves every other
//! record where the walk expects it. Moves are always towards the front. A
//! record that travels towards the back is carried there by the records
//! moving in front of it, so a rotation by one costs N-1 moves; the script
//! is correct but not minimal.

use tracing::debug;

use crate::edit::Edit;
use crate::edit::EditScript;
use crate::matching::Pairing;
use crate::options::ReconcileOptions;

/// Compute the edits that turn `old` into `new`.
///
/// `same_identity` decides whether two records are the same logical entity;
/// `same_content` decides whether such a pair still displays the same data.
/// Both should be equivalence relations. If they are not, the result is
/// unspecified, but reconciling never panics.
///
/// ```
/// use reconcile::{reconcile, Edit};
///
/// let old = [(1, "a"), (2, "b")];
/// let new = [(2, "b"), (1, "A"), (3, "c")];
/// let script = reconcile(&old, &new, |a, b| a.0 == b.0, |a, b| a.1 == b.1);
///
/// assert_eq!(script.apply(&old).unwrap(), new.to_vec());
/// assert!(script.iter().any(|edit| matches!(edit, Edit::Insert { new_index: 2, .. })));
/// ```
pub fn reconcile<'a, R>(
    old: &[R],
    new: &'a [R],
    same_identity: impl Fn(&R, &R) -> bool,
    same_content: impl Fn(&R, &R) -> bool,
) -> EditScript<&'a R> {
    return reconcile_with(old, new, same_identity, same_content, ReconcileOptions::default());
}

/// [`reconcile`] with explicit options.
pub fn reconcile_with<'a, R>(
    old: &[R],
    new: &'a [R],
    same_identity: impl Fn(&R, &R) -> bool,
    same_content: impl Fn(&R, &R) -> bool,
    options: ReconcileOptions,
) -> EditScript<&'a R> {
    let pairing = Pairing::by_predicate(old, new, same_identity);
    return emit(old, new, pairing, same_content, options);
}

/// Compute the edits that turn `old` into `new`, pairing records by a
/// hashable identity key.
///
/// Produces the same script as [`reconcile`] with
/// `same_identity = |a, b| key(a) == key(b)`. Pairing hashes each key once
/// and emission is a single linear walk, so the whole call takes O(N+M)
/// average time, where [`reconcile`] spends O(N×M) on pairing.
///
/// ```
/// use reconcile::reconcile_by_key;
///
/// let old = vec!["apple", "banana", "cherry"];
/// let new = vec!["cherry", "apple"];
/// let script = reconcile_by_key(&old, &new, |fruit| *fruit, |a, b| a == b);
///
/// assert_eq!(script.counts().removes, 1);
/// assert_eq!(script.apply(&old).unwrap(), new);
/// ```
pub fn reconcile_by_key<'a, R, K>(
    old: &[R],
    new: &'a [R],
    key: impl Fn(&R) -> K,
    same_content: impl Fn(&R, &R) -> bool,
) -> EditScript<&'a R>
where
    K: std::hash::Hash + Eq,
{
    return reconcile_by_key_with(old, new, key, same_content, ReconcileOptions::default());
}

/// [`reconcile_by_key`] with explicit options.
pub fn reconcile_by_key_with<'a, R, K>(
    old: &[R],
    new: &'a [R],
    key: impl Fn(&R) -> K,
    same_content: impl Fn(&R, &R) -> bool,
    options: ReconcileOptions,
) -> EditScript<&'a R>
where
    K: std::hash::Hash + Eq,
{
    let pairing = Pairing::by_key(old, new, key);
    return emit(old, new, pairing, same_content, options);
}

fn emit<'a, R>(
    old: &[R],
    new: &'a [R],
    mut pairing: Pairing,
    same_content: impl Fn(&R, &R) -> bool,
    options: ReconcileOptions,
) -> EditScript<&'a R> {
    if !options.detect_moves {
        pairing.retain_increasing();
    }

    let mut edits = Vec::new();

    for old_index in (0..old.len()).rev() {
        if pairing.old_to_new(old_index).is_none() {
            edits.push(Edit::Remove { old_index });
        }
    }

    // Paired old indices in old order. Everything before `cursor` is either
    // placed or was moved ahead, so `survivors[cursor]` (skipping moved
    // entries) is the record the walk finds at the current position.
    let survivors: Vec<usize> = (0..old.len())
        .filter(|&old_index| pairing.old_to_new(old_index).is_some())
        .collect();
    let mut moved = vec![false; old.len()];
    let mut cursor = 0;

    for (new_index, record) in new.iter().enumerate() {
        let Some(old_index) = pairing.new_to_old(new_index) else {
            edits.push(Edit::Insert { new_index, record });
            continue;
        };

        while cursor < survivors.len() && moved[survivors[cursor]] {
            cursor += 1;
        }
        if survivors.get(cursor) == Some(&old_index) {
            cursor += 1;
        } else {
            moved[old_index] = true;
            edits.push(Edit::Move { old_index, new_index });
        }

        if options.detect_updates && !same_content(&old[old_index], record) {
            edits.push(Edit::Update {
                old_index,
                new_index,
                record,
            });
        }
    }

    let (old_to_new, new_to_old) = pairing.into_maps();
    let script = EditScript::new(edits, old_to_new, new_to_old);

    let counts = script.counts();
    debug!(
        old_len = old.len(),
        new_len = new.len(),
        inserts = counts.inserts,
        removes = counts.removes,
        moves = counts.moves,
        updates = counts.updates,
        "reconciled sequences"
    );

    return script;
}
