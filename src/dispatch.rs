//! Positional update notifications for a presentation layer.
//!
//! An [`EditScript`] names records by their old and new indices. A list
//! widget instead wants to hear "three rows were inserted at position 4"
//! in terms of the rows it currently shows. [`EditScript::dispatch_updates_to`]
//! performs that translation, and [`BatchingCallback`] folds runs of adjacent
//! notifications into ranges.

use crate::edit::EditScript;
use crate::replay::Step;
use crate::error::ApplyError;

/// Receives positional updates. Every position refers to the presented list
/// as it stands when the notification arrives.
pub trait ListUpdateCallback {
    /// `count` entries were inserted starting at `position`.
    fn on_inserted(&mut self, position: usize, count: usize);
    /// `count` entries starting at `position` were removed.
    fn on_removed(&mut self, position: usize, count: usize);
    /// The entry at `from` now sits at `to`.
    fn on_moved(&mut self, from: usize, to: usize);
    /// `count` entries starting at `position` show new content.
    fn on_changed(&mut self, position: usize, count: usize);
}

impl<C: ListUpdateCallback + ?Sized> ListUpdateCallback for &mut C {
    fn on_inserted(&mut self, position: usize, count: usize) {
        (**self).on_inserted(position, count);
    }

    fn on_removed(&mut self, position: usize, count: usize) {
        (**self).on_removed(position, count);
    }

    fn on_moved(&mut self, from: usize, to: usize) {
        (**self).on_moved(from, to);
    }

    fn on_changed(&mut self, position: usize, count: usize) {
        (**self).on_changed(position, count);
    }
}

/// One positional update, as delivered to a [`ListUpdateCallback`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Notification {
    Inserted { position: usize, count: usize },
    Removed { position: usize, count: usize },
    Moved { from: usize, to: usize },
    Changed { position: usize, count: usize },
}

impl Notification {
    /// Deliver this notification to `callback`.
    pub fn send_to(self, callback: &mut impl ListUpdateCallback) {
        match self {
            Notification::Inserted { position, count } => callback.on_inserted(position, count),
            Notification::Removed { position, count } => callback.on_removed(position, count),
            Notification::Moved { from, to } => callback.on_moved(from, to),
            Notification::Changed { position, count } => callback.on_changed(position, count),
        }
    }
}

/// Collects notifications in arrival order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordingCallback {
    pub notifications: Vec<Notification>,
}

impl RecordingCallback {
    /// An empty recording.
    pub fn new() -> RecordingCallback {
        return RecordingCallback::default();
    }
}

impl ListUpdateCallback for RecordingCallback {
    fn on_inserted(&mut self, position: usize, count: usize) {
        self.notifications.push(Notification::Inserted { position, count });
    }

    fn on_removed(&mut self, position: usize, count: usize) {
        self.notifications.push(Notification::Removed { position, count });
    }

    fn on_moved(&mut self, from: usize, to: usize) {
        self.notifications.push(Notification::Moved { from, to });
    }

    fn on_changed(&mut self, position: usize, count: usize) {
        self.notifications.push(Notification::Changed { position, count });
    }
}

/// Wraps a callback and merges consecutive inserts, removes or changes that
/// touch adjacent positions into one ranged notification.
///
/// A merged notification is held back until something that cannot extend it
/// arrives, or until [`BatchingCallback::flush`]. Moves are never merged.
#[derive(Debug)]
pub struct BatchingCallback<C: ListUpdateCallback> {
    inner: C,
    pending: Option<Notification>,
}

impl<C: ListUpdateCallback> BatchingCallback<C> {
    /// Batch the notifications meant for `inner`.
    pub fn new(inner: C) -> BatchingCallback<C> {
        return BatchingCallback {
            inner,
            pending: None,
        };
    }

    /// Deliver the held-back notification, if any.
    pub fn flush(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.send_to(&mut self.inner);
        }
    }

    /// Flush and hand back the wrapped callback.
    pub fn into_inner(mut self) -> C {
        self.flush();
        return self.inner;
    }

    fn hold(&mut self, notification: Notification) {
        self.flush();
        self.pending = Some(notification);
    }
}

impl<C: ListUpdateCallback> ListUpdateCallback for BatchingCallback<C> {
    fn on_inserted(&mut self, position: usize, count: usize) {
        if let Some(Notification::Inserted { position: start, count: pending }) = &mut self.pending {
            if position >= *start && position <= *start + *pending {
                *pending += count;
                return;
            }
        }
        self.hold(Notification::Inserted { position, count });
    }

    fn on_removed(&mut self, position: usize, count: usize) {
        if let Some(Notification::Removed { position: start, count: pending }) = &mut self.pending {
            if *start >= position && *start <= position + count {
                *start = position;
                *pending += count;
                return;
            }
        }
        self.hold(Notification::Removed { position, count });
    }

    fn on_moved(&mut self, from: usize, to: usize) {
        self.flush();
        self.inner.on_moved(from, to);
    }

    fn on_changed(&mut self, position: usize, count: usize) {
        if let Some(Notification::Changed { position: start, count: pending }) = &mut self.pending {
            let end = *start + *pending;
            if position <= end && position + count >= *start {
                let merged_start = (*start).min(position);
                let merged_end = end.max(position + count);
                *start = merged_start;
                *pending = merged_end - merged_start;
                return;
            }
        }
        self.hold(Notification::Changed { position, count });
    }
}

impl<T> EditScript<T> {
    /// Replay the script as positional notifications.
    ///
    /// Removes, inserts and updates already carry the position they touch. A
    /// move names its record by old index, so its current position is
    /// resolved before anything is delivered. A script that does not fit
    /// delivers nothing.
    pub fn dispatch_updates_to(&self, callback: &mut impl ListUpdateCallback) -> Result<(), ApplyError> {
        let replay = self.replay(self.old_len())?;
        for step in replay.steps {
            match step {
                Step::Removed { position } => callback.on_removed(position, 1),
                Step::Inserted { position } => callback.on_inserted(position, 1),
                Step::Moved { from, to } => callback.on_moved(from, to),
                Step::Changed { position } => callback.on_changed(position, 1),
            }
        }
        return Ok(());
    }

    /// Like [`EditScript::dispatch_updates_to`], with adjacent notifications
    /// merged into ranges.
    pub fn dispatch_batched_to(&self, callback: &mut impl ListUpdateCallback) -> Result<(), ApplyError> {
        let mut batching = BatchingCallback::new(callback);
        let result = self.dispatch_updates_to(&mut batching);
        batching.flush();
        return result;
    }

    /// The positional notifications for this script, merged into ranges.
    pub fn notifications(&self) -> Result<Vec<Notification>, ApplyError> {
        let mut recording = RecordingCallback::new();
        self.dispatch_batched_to(&mut recording)?;
        return Ok(recording.notifications);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::reconcile;

    fn batched(calls: impl FnOnce(&mut BatchingCallback<RecordingCallback>)) -> Vec<Notification> {
        let mut batching = BatchingCallback::new(RecordingCallback::new());
        calls(&mut batching);
        return batching.into_inner().notifications;
    }

    #[test]
    fn consecutive_inserts_merge() {
        let notes = batched(|cb| {
            cb.on_inserted(2, 1);
            cb.on_inserted(3, 1);
            cb.on_inserted(4, 2);
        });
        assert_eq!(notes, vec![Notification::Inserted { position: 2, count: 4 }]);
    }

    #[test]
    fn descending_removes_merge() {
        let notes = batched(|cb| {
            cb.on_removed(5, 1);
            cb.on_removed(4, 1);
            cb.on_removed(1, 1);
        });
        assert_eq!(
            notes,
            vec![
                Notification::Removed { position: 4, count: 2 },
                Notification::Removed { position: 1, count: 1 },
            ]
        );
    }

    #[test]
    fn overlapping_changes_merge() {
        let notes = batched(|cb| {
            cb.on_changed(3, 2);
            cb.on_changed(1, 2);
            cb.on_changed(9, 1);
        });
        assert_eq!(
            notes,
            vec![
                Notification::Changed { position: 1, count: 4 },
                Notification::Changed { position: 9, count: 1 },
            ]
        );
    }

    #[test]
    fn moves_flush_and_pass_through() {
        let notes = batched(|cb| {
            cb.on_inserted(0, 1);
            cb.on_moved(4, 1);
            cb.on_inserted(1, 1);
        });
        assert_eq!(
            notes,
            vec![
                Notification::Inserted { position: 0, count: 1 },
                Notification::Moved { from: 4, to: 1 },
                Notification::Inserted { position: 1, count: 1 },
            ]
        );
    }

    #[test]
    fn move_reports_current_position() {
        let old = ["a", "b", "c"];
        let new = ["x", "c", "a", "b"];
        let script = reconcile(&old, &new, |a, b| a == b, |a, b| a == b);
        let notes = script.notifications().unwrap();
        // "c" sits at 3 once "x" is inserted in front of it.
        assert_eq!(
            notes,
            vec![
                Notification::Inserted { position: 0, count: 1 },
                Notification::Moved { from: 3, to: 1 },
            ]
        );
    }

    #[test]
    fn script_dispatch_batches_runs() {
        let old = ["a", "b", "c", "d"];
        let new = ["a", "x", "y", "z"];
        let script = reconcile(&old, &new, |a, b| a == b, |a, b| a == b);
        let notes = script.notifications().unwrap();
        assert_eq!(
            notes,
            vec![
                Notification::Removed { position: 1, count: 3 },
                Notification::Inserted { position: 1, count: 3 },
            ]
        );
    }
}
