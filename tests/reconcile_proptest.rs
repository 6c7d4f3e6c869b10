//! Property-based tests for reconciliation.

use proptest::prelude::*;
use reconcile::{
    reconcile, reconcile_by_key, reconcile_by_key_with, reconcile_with, Edit, EditScript,
    Notification, ReconcileOptions,
};

// =============================================================================
// Test helpers
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
struct Row {
    id: u8,
    val: u8,
}

/// Rows drawn from a small id space so duplicates and overlaps are common.
fn arbitrary_rows() -> impl Strategy<Value = Vec<Row>> {
    return prop::collection::vec((0u8..12, 0u8..3), 0..24)
        .prop_map(|pairs| pairs.into_iter().map(|(id, val)| Row { id, val }).collect());
}

/// Rows with distinct ids, in arbitrary order.
fn unique_rows() -> impl Strategy<Value = Vec<Row>> {
    return prop::collection::btree_map(0u8..64, 0u8..3, 0..24)
        .prop_map(|map| map.into_iter().map(|(id, val)| Row { id, val }).collect::<Vec<_>>())
        .prop_shuffle();
}

fn same_id(a: &Row, b: &Row) -> bool {
    return a.id == b.id;
}

fn same_val(a: &Row, b: &Row) -> bool {
    return a.val == b.val;
}

fn diff<'a>(old: &[Row], new: &'a [Row]) -> EditScript<&'a Row> {
    return reconcile(old, new, same_id, same_val);
}

/// Play notifications against the old rows the way a list widget would:
/// structural changes move rows around, inserted and changed rows are marked
/// stale and rebound from the new sequence at the end.
fn replay(old: &[Row], new: &[Row], notifications: &[Notification]) -> Vec<Row> {
    let mut rows: Vec<Option<Row>> = old.iter().cloned().map(Some).collect();
    for notification in notifications {
        match *notification {
            Notification::Inserted { position, count } => {
                for offset in 0..count {
                    rows.insert(position + offset, None);
                }
            }
            Notification::Removed { position, count } => {
                rows.drain(position..position + count);
            }
            Notification::Moved { from, to } => {
                let row = rows.remove(from);
                rows.insert(to, row);
            }
            Notification::Changed { position, count } => {
                for row in &mut rows[position..position + count] {
                    *row = None;
                }
            }
        }
    }
    assert_eq!(rows.len(), new.len());
    return rows
        .into_iter()
        .zip(new)
        .map(|(row, fresh)| row.unwrap_or_else(|| fresh.clone()))
        .collect();
}

fn unbatched(script: &EditScript<&Row>) -> Vec<Notification> {
    let mut recording = reconcile::RecordingCallback::new();
    script.dispatch_updates_to(&mut recording).unwrap();
    return recording.notifications;
}

// =============================================================================
// Round-trip properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Applying the script to old always reproduces new.
    #[test]
    fn apply_reproduces_new(old in arbitrary_rows(), new in arbitrary_rows()) {
        let script = diff(&old, &new);
        prop_assert_eq!(script.apply(&old).unwrap(), new);
    }

    /// The same holds with move detection off.
    #[test]
    fn apply_reproduces_new_without_moves(old in arbitrary_rows(), new in arbitrary_rows()) {
        let options = ReconcileOptions::new().detect_moves(false);
        let script = reconcile_with(&old, &new, same_id, same_val, options);
        prop_assert!(script.iter().all(|edit| !edit.is_move()));
        prop_assert_eq!(script.apply(&old).unwrap(), new);
    }

    /// Keyed pairing produces exactly the predicate script.
    #[test]
    fn keyed_agrees_with_predicate(old in arbitrary_rows(), new in arbitrary_rows(), detect_moves in any::<bool>()) {
        let options = ReconcileOptions::new().detect_moves(detect_moves);
        let by_predicate = reconcile_with(&old, &new, same_id, same_val, options);
        let by_key = reconcile_by_key_with(&old, &new, |row| row.id, same_val, options);
        prop_assert_eq!(by_predicate, by_key);
    }

    /// Removes lead the script in descending old index; everything after
    /// them is ordered by ascending new index.
    #[test]
    fn script_is_canonical(old in arbitrary_rows(), new in arbitrary_rows()) {
        let script = diff(&old, &new);
        let removes: Vec<usize> = script
            .iter()
            .take_while(|edit| edit.is_remove())
            .filter_map(|edit| match edit {
                Edit::Remove { old_index } => Some(*old_index),
                _ => None,
            })
            .collect();
        prop_assert!(removes.windows(2).all(|w| w[0] > w[1]));

        let positions: Vec<usize> = script
            .iter()
            .skip(removes.len())
            .map(|edit| match edit {
                Edit::Insert { new_index, .. } => *new_index,
                Edit::Move { new_index, .. } => *new_index,
                Edit::Update { new_index, .. } => *new_index,
                Edit::Remove { .. } => usize::MAX,
            })
            .collect();
        prop_assert!(positions.iter().all(|&p| p != usize::MAX));
        prop_assert!(positions.windows(2).all(|w| w[0] <= w[1]));
    }

    /// Every paired position survives both lookups.
    #[test]
    fn position_maps_are_inverse(old in arbitrary_rows(), new in arbitrary_rows()) {
        let script = diff(&old, &new);
        for old_index in 0..old.len() {
            if let Some(new_index) = script.old_to_new(old_index) {
                prop_assert_eq!(script.new_to_old(new_index), Some(old_index));
                prop_assert_eq!(old[old_index].id, new[new_index].id);
            }
        }
    }
}

// =============================================================================
// Properties that assume distinct identities
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// A sequence reconciled against itself needs no edits.
    #[test]
    fn identical_is_empty(rows in unique_rows()) {
        prop_assert!(diff(&rows, &rows).is_empty());
    }

    /// Appending one row is exactly one insert.
    #[test]
    fn append_is_one_insert(rows in unique_rows(), val in 0u8..3) {
        let mut new = rows.clone();
        new.push(Row { id: 200, val });
        let script = diff(&rows, &new);
        prop_assert_eq!(script.len(), 1);
        prop_assert!(script.edits()[0].is_insert());
    }

    /// Deleting one row is exactly one remove at its old index.
    #[test]
    fn delete_is_one_remove(rows in unique_rows(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!rows.is_empty());
        let victim = pick.index(rows.len());
        let mut new = rows.clone();
        new.remove(victim);
        let script = diff(&rows, &new);
        let expected: Vec<Edit<&Row>> = vec![Edit::Remove { old_index: victim }];
        prop_assert_eq!(script.edits(), expected.as_slice());
    }

    /// A permutation is reached by moves alone.
    #[test]
    fn permutation_is_moves_only(rows in unique_rows(), seed in any::<u64>()) {
        let mut new = rows.clone();
        let len = new.len();
        if len > 1 {
            new.rotate_left((seed as usize) % len);
            new.swap(0, (seed as usize / 7) % len);
        }
        let script = diff(&rows, &new);
        prop_assert!(script.iter().all(|edit| edit.is_move()));
        prop_assert_eq!(script.apply(&rows).unwrap(), new);
    }
}

// =============================================================================
// Dispatch properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Replaying notifications on the old rows and rebinding stale rows
    /// yields the new rows, batched or not.
    #[test]
    fn dispatch_replays_to_new(old in arbitrary_rows(), new in arbitrary_rows()) {
        let script = reconcile_by_key(&old, &new, |row| row.id, same_val);

        let plain = unbatched(&script);
        prop_assert_eq!(replay(&old, &new, &plain), new.clone());

        let batched = script.notifications().unwrap();
        prop_assert!(batched.len() <= plain.len());
        prop_assert_eq!(replay(&old, &new, &batched), new);
    }
}

// =============================================================================
// Predicates that are not equivalence relations
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// An asymmetric, intransitive identity and a content check that never
    /// holds for equal values give an unspecified script, but reconciling,
    /// dispatching and applying it still succeed and keep the new length.
    #[test]
    fn inconsistent_predicates_never_panic(
        old in arbitrary_rows(),
        new in arbitrary_rows(),
        salt in any::<u8>(),
        detect_moves in any::<bool>(),
    ) {
        let options = ReconcileOptions::new().detect_moves(detect_moves);
        let same_identity = |a: &Row, b: &Row| a.id <= b.id || (a.id ^ salt) % 3 == 0;
        let same_content = |a: &Row, b: &Row| a.val < b.val;

        let script = reconcile_with(&old, &new, same_identity, same_content, options);
        let notifications = script.notifications().unwrap();
        prop_assert!(notifications.len() <= script.len());
        prop_assert_eq!(script.apply(&old).unwrap().len(), new.len());
        prop_assert_eq!(script.new_len(), new.len());
    }
}
