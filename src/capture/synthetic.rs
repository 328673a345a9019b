//! Synthetic frame source
//!
//! Generates text-like frames on a dedicated capture thread so the pipeline
//! can run without a camera device. Bright blocks on a dark background stand
//! in for lines of text; they drift horizontally so consecutive detection
//! cycles see different geometry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use tracing::{debug, info};

use super::{CameraIntrinsics, CaptureConfig, CaptureError, Frame, FrameSink};

const BACKGROUND: Rgba<u8> = Rgba([12, 12, 16, 255]);
const INK: Rgba<u8> = Rgba([235, 235, 235, 255]);

/// Synthetic camera delivering generated frames at a fixed rate
pub struct SyntheticCamera {
    config: CaptureConfig,
    frame_budget: Option<u64>,
}

impl SyntheticCamera {
    /// Create a synthetic camera with the given configuration
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            frame_budget: None,
        }
    }

    /// Stop delivering after `frames` frames
    pub fn with_frame_budget(mut self, frames: u64) -> Self {
        self.frame_budget = Some(frames);
        self
    }

    /// Start the capture thread, pushing frames into `sink`.
    ///
    /// Fails before any frame is delivered when the configuration cannot
    /// describe a device.
    pub fn start(self, sink: Box<dyn FrameSink>) -> Result<CaptureHandle, CaptureError> {
        if self.config.width == 0 || self.config.height == 0 {
            return Err(CaptureError::invalid("frame dimensions must be non-zero"));
        }
        if self.config.fps == 0 {
            return Err(CaptureError::invalid("fps must be non-zero"));
        }

        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();
        let config = self.config.clone();
        let budget = self.frame_budget;

        let thread = thread::spawn(move || capture_loop(config, budget, sink, stop_flag));

        info!(
            "synthetic camera started: {}x{} @ {} fps",
            self.config.width, self.config.height, self.config.fps
        );
        Ok(CaptureHandle {
            thread: Some(thread),
            stop,
        })
    }
}

fn capture_loop(
    config: CaptureConfig,
    budget: Option<u64>,
    sink: Box<dyn FrameSink>,
    stop: Arc<AtomicBool>,
) {
    let interval = Duration::from_secs_f64(1.0 / config.fps as f64);
    let mut sequence = 0u64;

    loop {
        if stop.load(Ordering::Relaxed) {
            break;
        }
        if let Some(limit) = budget {
            if sequence >= limit {
                break;
            }
        }

        let started = Instant::now();
        let frame = paint_frame(&config, sequence);
        sink.on_frame(frame);
        sequence += 1;

        // hold the configured rate, deducting generation time
        if let Some(remaining) = interval.checked_sub(started.elapsed()) {
            thread::sleep(remaining);
        }
    }

    debug!("capture thread exiting after {} frames", sequence);
}

/// Paint one synthetic frame: two text-like lines of bright blocks that
/// drift one pixel per frame.
fn paint_frame(config: &CaptureConfig, sequence: u64) -> Frame {
    let mut canvas = RgbaImage::from_pixel(config.width, config.height, BACKGROUND);
    let drift = (sequence % 64) as i32;

    for (line, blocks) in [(0.2f32, 5u32), (0.6, 3)] {
        let y = (config.height as f32 * line) as i32;
        let block_h = (config.height / 12).max(4);
        let block_w = (config.width / 16).max(4);
        let gap = block_w / 2;
        let mut x = drift + (config.width / 10) as i32;
        for _ in 0..blocks {
            draw_filled_rect_mut(&mut canvas, Rect::at(x, y).of_size(block_w, block_h), INK);
            x += (block_w + gap) as i32;
        }
    }

    let intrinsics = CameraIntrinsics {
        focal_length: (config.width as f32, config.width as f32),
        principal_point: (config.width as f32 / 2.0, config.height as f32 / 2.0),
    };
    Frame::new(canvas.into_raw(), config.width, config.height, sequence).with_intrinsics(intrinsics)
}

/// Handle to a running capture thread
#[derive(Debug)]
pub struct CaptureHandle {
    thread: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
}

impl CaptureHandle {
    /// Ask the capture thread to stop after the current frame
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Block until the capture thread has exited and its sink is dropped
    pub fn join(mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for CaptureHandle {
    fn drop(&mut self) {
        self.stop();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config() -> CaptureConfig {
        CaptureConfig {
            width: 64,
            height: 48,
            fps: 240,
        }
    }

    #[test]
    fn test_camera_delivers_frame_budget() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let camera = SyntheticCamera::new(fast_config()).with_frame_budget(3);
        let handle = camera.start(Box::new(tx)).unwrap();
        handle.join();

        let frames: Vec<Frame> = rx.try_iter().collect();
        assert_eq!(frames.len(), 3);
        for (index, frame) in frames.iter().enumerate() {
            assert_eq!(frame.sequence, index as u64);
            assert_eq!(frame.dimensions(), (64, 48));
            assert_eq!(frame.data.len(), frame.expected_len());
            assert!(frame.intrinsics.is_some());
        }
    }

    #[test]
    fn test_camera_stop_halts_delivery() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let camera = SyntheticCamera::new(fast_config());
        let handle = camera.start(Box::new(tx)).unwrap();

        // at least one frame arrives, then the stop request lands
        let first = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(first.sequence, 0);
        handle.stop();
        handle.join();

        // channel disconnects once the thread drops its sink
        rx.try_iter().for_each(drop);
        assert_eq!(
            rx.try_recv().unwrap_err(),
            crossbeam_channel::TryRecvError::Disconnected
        );
    }

    #[test]
    fn test_camera_rejects_zero_fps() {
        let (tx, _rx) = crossbeam_channel::unbounded();
        let config = CaptureConfig {
            fps: 0,
            ..fast_config()
        };
        let err = SyntheticCamera::new(config).start(Box::new(tx)).unwrap_err();
        assert!(matches!(err, CaptureError::InvalidConfig { .. }));
    }

    #[test]
    fn test_camera_rejects_zero_dimensions() {
        let (tx, _rx) = crossbeam_channel::unbounded();
        let config = CaptureConfig {
            width: 0,
            ..fast_config()
        };
        let err = SyntheticCamera::new(config).start(Box::new(tx)).unwrap_err();
        assert!(matches!(err, CaptureError::InvalidConfig { .. }));
    }

    #[test]
    fn test_painted_frame_contains_bright_blocks() {
        let config = fast_config();
        let frame = paint_frame(&config, 0);
        let canvas = RgbaImage::from_raw(frame.width, frame.height, frame.data).unwrap();

        // first line starts at x = width / 10 = 6, y = height * 0.2 = 9
        let ink = canvas.get_pixel(7, 10);
        assert_eq!(ink.0, [235, 235, 235, 255]);
        let background = canvas.get_pixel(0, 0);
        assert_eq!(background.0, [12, 12, 16, 255]);
    }
}
