//! Detection pipeline
//!
//! Wires the admission gate to a detection worker thread. For each admitted
//! frame the worker runs the engine, maps the observations to view space,
//! commits the result to the overlay store, reopens the gate, and notifies
//! the render thread. At most one request is in flight, so completion order
//! is submission order and results can never arrive stale.

pub mod gate;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, info, trace, warn};

use crate::capture::Frame;
use crate::overlay::{map_observations, OverlayStore, Viewport};
use crate::shared::{PipelineEvent, PipelineStats};
use crate::vision::{DetectorOptions, TextDetector};

pub use gate::DetectionGate;

use gate::InFlightGuard;

/// Running detection pipeline
pub struct TextPipeline {
    gate: DetectionGate,
    events: Option<Receiver<PipelineEvent>>,
    worker: Option<JoinHandle<()>>,
}

impl TextPipeline {
    /// Spawn the detection worker and return the running pipeline.
    ///
    /// `options` are fixed for the pipeline's lifetime; there is no
    /// per-frame tuning.
    pub fn start(
        detector: Box<dyn TextDetector>,
        store: Arc<OverlayStore>,
        viewport: Arc<Viewport>,
        options: DetectorOptions,
        stats: Arc<PipelineStats>,
    ) -> Self {
        let (jobs_tx, jobs_rx) = unbounded::<Frame>();
        let (events_tx, events_rx) = unbounded::<PipelineEvent>();
        let in_flight = Arc::new(AtomicBool::new(false));

        let gate = DetectionGate::new(in_flight.clone(), jobs_tx, stats.clone());

        let worker = Worker {
            detector,
            jobs: jobs_rx,
            store,
            viewport,
            options,
            stats,
            events: events_tx,
            in_flight,
        };
        let handle = thread::spawn(move || worker.run());

        Self {
            gate,
            events: Some(events_rx),
            worker: Some(handle),
        }
    }

    /// Cloneable submission handle for frame sources
    pub fn gate(&self) -> DetectionGate {
        self.gate.clone()
    }

    /// Take the UI event receiver. Yields `None` after the first call.
    pub fn take_events(&mut self) -> Option<Receiver<PipelineEvent>> {
        self.events.take()
    }

    /// Stop accepting work and join the worker.
    ///
    /// An in-flight cycle completes first; teardown never abandons the
    /// store mid-commit. Gate clones held elsewhere keep the worker alive,
    /// so frame sources must be stopped before calling this.
    pub fn shutdown(self) {
        let TextPipeline {
            gate,
            events,
            worker,
        } = self;
        drop(gate);
        drop(events);
        if let Some(worker) = worker {
            let _ = worker.join();
        }
    }
}

struct Worker {
    detector: Box<dyn TextDetector>,
    jobs: Receiver<Frame>,
    store: Arc<OverlayStore>,
    viewport: Arc<Viewport>,
    options: DetectorOptions,
    stats: Arc<PipelineStats>,
    events: Sender<PipelineEvent>,
    in_flight: Arc<AtomicBool>,
}

impl Worker {
    fn run(mut self) {
        info!("detection worker started: engine '{}'", self.detector.name());
        while let Ok(frame) = self.jobs.recv() {
            self.process(frame);
        }
        debug!("detection worker exiting: gate closed");
    }

    fn process(&mut self, frame: Frame) {
        let guard = InFlightGuard::new(self.in_flight.clone());
        let sequence = frame.sequence;
        let (width, height) = frame.dimensions();
        if let Some(intrinsics) = frame.intrinsics {
            trace!(
                "frame {sequence} carries calibration, focal {:?} principal {:?}",
                intrinsics.focal_length,
                intrinsics.principal_point
            );
        }

        match self.detector.detect(&frame, &self.options) {
            Ok(observations) => {
                // the frame is not retained past detection
                drop(frame);

                let view = self.viewport.get();
                let mapped = map_observations(&observations, view);
                let empty = observations.is_empty();
                // an empty cycle has nothing to append to the word log
                let cycle = if mapped.labels.is_empty() {
                    self.store.replace(mapped.overlays)
                } else {
                    self.store.commit(mapped.overlays, mapped.labels)
                };
                self.stats.record_cycle(empty);

                // reopen the gate before notifying, so the UI never observes
                // a committed cycle that still blocks admission
                guard.release();
                debug!(
                    "frame {sequence}: {} regions committed as cycle {cycle}",
                    observations.len()
                );
                let _ = self.events.send(PipelineEvent::OverlaysUpdated { cycle });
            }
            Err(err) => {
                self.stats.record_failure();
                guard.release();
                warn!("frame {sequence} ({width}x{height}): detection failed: {err}");
                let _ = self.events.send(PipelineEvent::DetectionFailed {
                    message: err.to_string(),
                });
            }
        }
    }
}
