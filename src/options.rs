//! Knobs for a reconciliation call.

/// Options controlling which kinds of edits the engine may emit.
///
/// The defaults detect both moves and content updates.
///
/// ```
/// use reconcile::ReconcileOptions;
///
/// let options = ReconcileOptions::new().detect_moves(false);
/// assert!(!options.detect_moves);
/// assert!(options.detect_updates);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct ReconcileOptions {
    /// Emit `Move` for matched records that changed relative order.
    ///
    /// When off, only the longest run of matched records that kept their
    /// relative order stays matched; every other pair is removed and
    /// re-inserted instead.
    pub detect_moves: bool,
    /// Consult the content predicate and emit `Update` when it fails.
    pub detect_updates: bool,
}

impl ReconcileOptions {
    /// The default options: moves and updates both detected.
    pub fn new() -> ReconcileOptions {
        return ReconcileOptions {
            detect_moves: true,
            detect_updates: true,
        };
    }

    /// Allow or forbid `Move` edits.
    pub fn detect_moves(mut self, enabled: bool) -> ReconcileOptions {
        self.detect_moves = enabled;
        return self;
    }

    /// Allow or forbid `Update` edits.
    pub fn detect_updates(mut self, enabled: bool) -> ReconcileOptions {
        self.detect_updates = enabled;
        return self;
    }
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        return Self::new();
    }
}
