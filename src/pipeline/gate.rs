//! Detection admission control
//!
//! The gate sits between the capture thread and the detection worker. It
//! admits a frame only while no detection request is outstanding; everything
//! else is dropped on the spot, never queued, which keeps the overlay's
//! latency bounded at one detector round-trip regardless of frame rate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use tracing::{debug, trace};

use crate::capture::{Frame, FrameSink};
use crate::shared::PipelineStats;

/// Admission-controlled entry to the detection worker.
///
/// Clones share one in-flight flag and one worker channel; any clone may
/// submit from any thread. The worker holds no clone, so dropping every
/// gate closes the channel and stops the worker.
#[derive(Clone)]
pub struct DetectionGate {
    in_flight: Arc<AtomicBool>,
    jobs: Sender<Frame>,
    stats: Arc<PipelineStats>,
}

impl DetectionGate {
    pub(crate) fn new(
        in_flight: Arc<AtomicBool>,
        jobs: Sender<Frame>,
        stats: Arc<PipelineStats>,
    ) -> Self {
        Self {
            in_flight,
            jobs,
            stats,
        }
    }

    /// Try to admit a frame for detection.
    ///
    /// Returns false, dropping the frame, when a request is already in
    /// flight or the worker has shut down. The in-flight flag is released
    /// by the worker once the cycle finishes, on success and failure alike.
    pub fn submit(&self, frame: Frame) -> bool {
        self.stats.record_offered();

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.stats.record_dropped();
            trace!("frame {} dropped: detection in flight", frame.sequence);
            return false;
        }

        let sequence = frame.sequence;
        if self.jobs.send(frame).is_err() {
            self.in_flight.store(false, Ordering::Release);
            self.stats.record_dropped();
            debug!("frame {sequence} dropped: worker shut down");
            return false;
        }

        self.stats.record_accepted();
        trace!("frame {sequence} accepted for detection");
        true
    }

    /// Whether a request is currently outstanding
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl FrameSink for DetectionGate {
    fn on_frame(&self, frame: Frame) {
        self.submit(frame);
    }
}

/// Reopens the gate when dropped, covering every completion path of a cycle.
pub(crate) struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    pub(crate) fn new(flag: Arc<AtomicBool>) -> Self {
        Self { flag }
    }

    /// Reopen the gate now rather than at scope end
    pub(crate) fn release(self) {}
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
