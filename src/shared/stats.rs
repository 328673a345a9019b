//! Pipeline runtime counters
//!
//! Lock-free counters shared by the capture, worker, and UI threads.
//! Snapshots feed the end-of-session summary and keep tests honest about
//! what the admission gate actually did.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one pipeline instance
#[derive(Debug, Default)]
pub struct PipelineStats {
    frames_offered: AtomicU64,
    frames_accepted: AtomicU64,
    frames_dropped: AtomicU64,
    cycles_completed: AtomicU64,
    empty_cycles: AtomicU64,
    detection_failures: AtomicU64,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_offered(&self) {
        self.frames_offered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_accepted(&self) {
        self.frames_accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped(&self) {
        self.frames_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cycle(&self, empty: bool) {
        self.cycles_completed.fetch_add(1, Ordering::Relaxed);
        if empty {
            self.empty_cycles.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_failure(&self) {
        self.detection_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            frames_offered: self.frames_offered.load(Ordering::Relaxed),
            frames_accepted: self.frames_accepted.load(Ordering::Relaxed),
            frames_dropped: self.frames_dropped.load(Ordering::Relaxed),
            cycles_completed: self.cycles_completed.load(Ordering::Relaxed),
            empty_cycles: self.empty_cycles.load(Ordering::Relaxed),
            detection_failures: self.detection_failures.load(Ordering::Relaxed),
        }
    }
}

/// Counter values at one instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Frames the source pushed at the gate
    pub frames_offered: u64,
    /// Frames the gate admitted for detection
    pub frames_accepted: u64,
    /// Frames refused while a request was in flight
    pub frames_dropped: u64,
    /// Detection cycles that ran to completion
    pub cycles_completed: u64,
    /// Completed cycles that observed no text
    pub empty_cycles: u64,
    /// Cycles that ended in an engine error
    pub detection_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let stats = PipelineStats::new();
        stats.record_offered();
        stats.record_offered();
        stats.record_accepted();
        stats.record_dropped();
        stats.record_cycle(false);
        stats.record_cycle(true);
        stats.record_failure();

        let snap = stats.snapshot();
        assert_eq!(snap.frames_offered, 2);
        assert_eq!(snap.frames_accepted, 1);
        assert_eq!(snap.frames_dropped, 1);
        assert_eq!(snap.cycles_completed, 2);
        assert_eq!(snap.empty_cycles, 1);
        assert_eq!(snap.detection_failures, 1);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let stats = PipelineStats::new();
        let before = stats.snapshot();
        stats.record_offered();
        assert_eq!(before.frames_offered, 0);
        assert_eq!(stats.snapshot().frames_offered, 1);
    }
}
