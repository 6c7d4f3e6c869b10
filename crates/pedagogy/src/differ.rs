//! The `Differ` trait and its two trivial implementations.
//!
//! Every implementation turns an old and a new sequence into an
//! [`EditScript`] that reproduces the new sequence when applied to the old
//! one. They differ only in how many edits they spend doing it.

use std::hash::Hash;

use reconcile::{reconcile_by_key_with, ApplyError, Edit, EditScript, ReconcileOptions};

/// A record with an identity key. Content equality is `PartialEq`.
pub trait Keyed {
    type Key: Hash + Eq;

    /// The identity that survives across versions of this record.
    fn key(&self) -> Self::Key;
}

/// A strategy for reconciling two sequences.
///
/// Reference implementations assemble their scripts by hand and build them
/// with [`EditScript::from_edits`], which replays the edits. An `Err` means
/// the implementation emitted an inconsistent script.
pub trait Differ {
    /// Short name for test and benchmark output.
    fn name(&self) -> &'static str;

    /// Edits that turn `old` into `new`.
    fn diff<'a, R: Keyed + PartialEq>(
        &self,
        old: &[R],
        new: &'a [R],
    ) -> Result<EditScript<&'a R>, ApplyError>;
}

/// Remove every old record, then insert every new one. The baseline any
/// reconciler has to beat. Identical sequences are left alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct Rebuild;

impl Differ for Rebuild {
    fn name(&self) -> &'static str {
        return "rebuild";
    }

    fn diff<'a, R: Keyed + PartialEq>(
        &self,
        old: &[R],
        new: &'a [R],
    ) -> Result<EditScript<&'a R>, ApplyError> {
        if old == new {
            return EditScript::from_edits(Vec::new(), old.len());
        }
        let mut edits = Vec::with_capacity(old.len() + new.len());
        for old_index in (0..old.len()).rev() {
            edits.push(Edit::Remove { old_index });
        }
        for (new_index, record) in new.iter().enumerate() {
            edits.push(Edit::Insert { new_index, record });
        }
        return EditScript::from_edits(edits, old.len());
    }
}

/// The production engine, keyed by [`Keyed::key`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Engine {
    pub options: ReconcileOptions,
}

impl Engine {
    /// The engine with explicit options.
    pub fn new(options: ReconcileOptions) -> Engine {
        return Engine { options };
    }
}

impl Differ for Engine {
    fn name(&self) -> &'static str {
        if self.options.detect_moves {
            return "engine";
        }
        return "engine-no-moves";
    }

    fn diff<'a, R: Keyed + PartialEq>(
        &self,
        old: &[R],
        new: &'a [R],
    ) -> Result<EditScript<&'a R>, ApplyError> {
        return Ok(reconcile_by_key_with(old, new, R::key, |a, b| a == b, self.options));
    }
}
