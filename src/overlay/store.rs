//! Overlay store
//!
//! Owns the currently-displayed overlay set and the recognized-word log.
//! The set is replaced wholesale, never edited in place; readers take `Arc`
//! snapshots, so a renderer keeps drawing a stable set while the next cycle
//! commits.

use std::sync::Arc;

use parking_lot::RwLock;

use super::OverlaySet;

#[derive(Debug)]
struct StoreState {
    overlays: Arc<OverlaySet>,
    recognized: Vec<String>,
    cycles: u64,
}

/// Shared store for overlay state and the recognized-word log
#[derive(Debug)]
pub struct OverlayStore {
    state: RwLock<StoreState>,
}

impl OverlayStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState {
                overlays: Arc::new(OverlaySet::default()),
                recognized: Vec::new(),
                cycles: 0,
            }),
        }
    }

    /// Replace the displayed set.
    ///
    /// The swap is indivisible with respect to `snapshot`: readers see the
    /// old set or the new one, never a mix of the two.
    pub fn replace(&self, set: OverlaySet) -> u64 {
        let mut state = self.state.write();
        install(&mut state, set)
    }

    /// Append one entry to the recognized-word log
    pub fn append_word(&self, label: impl Into<String>) {
        self.state.write().recognized.push(label.into());
    }

    /// Replace the set and append the cycle's labels under one lock.
    ///
    /// A detection cycle performs exactly this one mutation; batching both
    /// writes keeps the log aligned with the set that produced it.
    pub fn commit(&self, set: OverlaySet, labels: Vec<String>) -> u64 {
        let mut state = self.state.write();
        let cycle = install(&mut state, set);
        state.recognized.extend(labels);
        cycle
    }

    /// Current set for rendering
    pub fn snapshot(&self) -> Arc<OverlaySet> {
        self.state.read().overlays.clone()
    }

    /// Copy of the recognized-word log
    pub fn recognized_words(&self) -> Vec<String> {
        self.state.read().recognized.clone()
    }

    /// Number of entries in the recognized-word log
    pub fn recognized_count(&self) -> usize {
        self.state.read().recognized.len()
    }

    /// Number of sets installed since startup
    pub fn completed_cycles(&self) -> u64 {
        self.state.read().cycles
    }
}

impl Default for OverlayStore {
    fn default() -> Self {
        Self::new()
    }
}

fn install(state: &mut StoreState, mut set: OverlaySet) -> u64 {
    state.cycles += 1;
    set.cycle = state.cycles;
    state.overlays = Arc::new(set);
    state.cycles
}
