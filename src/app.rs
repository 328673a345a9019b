//! Session Coordinator
//!
//! Wires the capture source, detection pipeline, overlay store, and render
//! loop together for one live run, then tears everything down in order:
//! source first, pipeline second, render loop last.

use std::sync::Arc;
use std::thread;

use anyhow::{anyhow, Context, Result};
use tracing::info;

use crate::capture::{CaptureConfig, SyntheticCamera};
use crate::config::AppConfig;
use crate::overlay::{run_render_loop, OverlayRenderer, OverlayStore, ViewSize, Viewport};
use crate::pipeline::TextPipeline;
use crate::shared::{PipelineStats, StatsSnapshot};
use crate::vision::{
    BlockDetector, BlockDetectorConfig, DetectionEngine, DetectorOptions, NoopDetector,
    TextDetector,
};

/// What a finished session leaves behind
#[derive(Debug)]
pub struct SessionSummary {
    /// Final counter values
    pub stats: StatsSnapshot,
    /// Recognized-word log, one entry per region ever committed
    pub recognized_words: Vec<String>,
}

/// A live capture-detect-render session
pub struct LiveSession {
    config: AppConfig,
    frame_budget: u64,
}

impl LiveSession {
    pub fn new(config: AppConfig, frame_budget: u64) -> Self {
        Self {
            config,
            frame_budget,
        }
    }

    /// Run the session to completion.
    ///
    /// The calling thread becomes the UI thread: it runs the render loop
    /// until the capture budget is exhausted and the pipeline drains.
    pub fn run(&self, renderer: &mut dyn OverlayRenderer) -> Result<SessionSummary> {
        let store = Arc::new(OverlayStore::new());
        let viewport = Arc::new(Viewport::new(ViewSize::new(
            self.config.overlay.view_width,
            self.config.overlay.view_height,
        )));
        let stats = Arc::new(PipelineStats::new());

        let detector: Box<dyn TextDetector> = match self.config.detection.engine {
            DetectionEngine::Block => Box::new(BlockDetector::new(BlockDetectorConfig {
                cell_size: self.config.detection.cell_size,
                luma_threshold: self.config.detection.luma_threshold,
            })),
            DetectionEngine::Noop => Box::new(NoopDetector),
        };
        let options = DetectorOptions {
            report_character_boxes: true,
            min_confidence: self.config.detection.min_confidence,
        };

        let mut pipeline =
            TextPipeline::start(detector, store.clone(), viewport, options, stats.clone());
        let events = pipeline
            .take_events()
            .context("pipeline events already taken")?;

        let camera = SyntheticCamera::new(CaptureConfig {
            width: self.config.capture.width,
            height: self.config.capture.height,
            fps: self.config.capture.fps,
        })
        .with_frame_budget(self.frame_budget);

        let capture = camera.start(Box::new(pipeline.gate()))?;
        info!("session started: {} frames budgeted", self.frame_budget);

        // Tear down from a helper thread once the source is exhausted; the
        // render loop below ends when the event channel closes behind it.
        let teardown = thread::spawn(move || {
            capture.join();
            pipeline.shutdown();
        });

        run_render_loop(&store, renderer, &events);

        teardown
            .join()
            .map_err(|_| anyhow!("teardown thread panicked"))?;

        let summary = SessionSummary {
            stats: stats.snapshot(),
            recognized_words: store.recognized_words(),
        };
        info!(
            "session complete: {} frames offered, {} accepted, {} dropped, {} cycles, {} words logged",
            summary.stats.frames_offered,
            summary.stats.frames_accepted,
            summary.stats.frames_dropped,
            store.completed_cycles(),
            store.recognized_count()
        );
        Ok(summary)
    }
}
