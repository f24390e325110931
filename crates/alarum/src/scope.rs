//! Scoped override of the engine's filter, dedup, and handler state.
//!
//! Entering a scope snapshots the whole [`EngineState`] under the state
//! lock; releasing the guard swaps the snapshot back, again under the
//! lock, on every exit path — normal return, early `?`, or unwinding.
//! Scopes nest as a stack and each guard restores exactly the snapshot it
//! captured, independent of what happened inside.
//!
//! The snapshot deep-copies the filter chain and dedup registry but keeps
//! only a reference to the handler slot, so a handler swapped inside the
//! scope is dropped on restore while the previous one survives untouched.

use tracing::debug;

use crate::dedup::DedupRegistry;
use crate::engine::{Engine, EngineState};
use crate::handler::{CapturedWarnings, SharedHandler};

/// Guard restoring the pre-scope engine state on drop.
///
/// Obtained from [`Engine::scoped`] or [`Engine::scoped_capture`].
#[must_use = "dropping the guard immediately restores the previous state"]
pub struct ScopeGuard {
    engine: Engine,
    snapshot: Option<EngineState>,
}

impl ScopeGuard {
    /// Release the scope now instead of at end of block.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        if let Some(snapshot) = self.snapshot.take() {
            *self.engine.lock_state() = snapshot;
            debug!("warning scope released, prior state restored");
        }
    }
}

impl Engine {
    /// Enter a scope: mutations to the chain, dedup registry, and handler
    /// made while the returned guard lives are undone when it drops.
    pub fn scoped(&self) -> ScopeGuard {
        let snapshot = self.lock_state().clone();
        debug!("entered warning scope");
        ScopeGuard {
            engine: self.clone(),
            snapshot: Some(snapshot),
        }
    }

    /// Enter a scope and redirect delivery into a capture buffer.
    ///
    /// The dedup registry is replaced with a fresh one so warnings already
    /// delivered outside the scope are not suppressed as repeats inside
    /// it; the pre-scope registry comes back with the rest of the
    /// snapshot. The buffer stays readable after the guard drops; the
    /// previous handler is restored along with the rest of the snapshot.
    pub fn scoped_capture(&self) -> (ScopeGuard, CapturedWarnings) {
        let buffer = CapturedWarnings::new();
        let snapshot = {
            let mut state = self.lock_state();
            let snapshot = state.clone();
            state.handler = SharedHandler::capture(buffer.clone());
            state.dedup = DedupRegistry::new();
            snapshot
        };
        debug!("entered capturing warning scope");
        (
            ScopeGuard {
                engine: self.clone(),
                snapshot: Some(snapshot),
            },
            buffer,
        )
    }
}
