//! Dependency-gated effects.
//!
//! Unlike [`create_effect`](super::create_effect), which re-runs whenever a
//! signal it read is written, a [`DepsEffect`] is driven explicitly: each
//! render hands it the current dependency list and it runs only when that list
//! differs from the snapshot taken at its previous run.
//!
//! ```ignore
//! let mut effect = DepsEffect::new();
//! effect.run_if_changed(false, || fetch());   // first call: runs
//! effect.run_if_changed(false, || fetch());   // unchanged: skipped
//! effect.run_if_changed(true, || fetch());    // changed: runs
//! ```
//!
//! Multi-value dependency lists are tuples; the effect runs when any element
//! differs.

use tracing::trace;

/// A side effect gated on an explicit dependency snapshot.
#[derive(Debug, Clone)]
pub struct DepsEffect<D> {
    snapshot: Option<D>,
    runs: u64,
}

impl<D: PartialEq + Clone> DepsEffect<D> {
    /// An effect that has never run.
    pub fn new() -> Self {
        Self {
            snapshot: None,
            runs: 0,
        }
    }

    /// Whether `deps` would cause a run: true before the first run and
    /// whenever `deps` differs from the last snapshot.
    pub fn should_run(&self, deps: &D) -> bool {
        self.snapshot.as_ref() != Some(deps)
    }

    /// Run `f` if `deps` changed, recording `deps` as the new snapshot.
    ///
    /// Returns `f`'s output, or `None` when the run was skipped.
    pub fn run_if_changed<R>(&mut self, deps: D, f: impl FnOnce() -> R) -> Option<R> {
        if !self.should_run(&deps) {
            trace!(runs = self.runs, "effect deps unchanged, skipping");
            return None;
        }
        self.snapshot = Some(deps);
        self.runs += 1;
        trace!(runs = self.runs, "effect deps changed, running");
        Some(f())
    }

    /// The dependency values seen at the last run.
    pub fn snapshot(&self) -> Option<&D> {
        self.snapshot.as_ref()
    }

    /// Number of times the effect body has executed.
    pub fn run_count(&self) -> u64 {
        self.runs
    }

    /// Forget the snapshot so the next call runs, as on a fresh mount.
    pub fn reset(&mut self) {
        self.snapshot = None;
    }
}

impl<D: PartialEq + Clone> Default for DepsEffect<D> {
    fn default() -> Self {
        Self::new()
    }
}
