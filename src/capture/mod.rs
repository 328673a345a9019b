//! Capture Layer
//!
//! The push interface between a frame source and the detection pipeline.
//! Real camera devices live behind the `FrameSink` seam; the bundled
//! `SyntheticCamera` generates frames for demos and tests.

pub mod frame;
pub mod synthetic;

use thiserror::Error;

pub use frame::{CameraIntrinsics, Frame};
pub use synthetic::SyntheticCamera;

/// Frame source configuration
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Frames per second delivered by the source
    pub fps: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fps: 30,
        }
    }
}

/// Errors raised while opening or running a frame source
#[derive(Debug, Error)]
pub enum CaptureError {
    /// No capture device could be opened. Fatal to startup; callers report
    /// it and exit rather than retry.
    #[error("no capture device available")]
    DeviceUnavailable,
    #[error("invalid capture configuration: {message}")]
    InvalidConfig { message: String },
}

impl CaptureError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Receiving end of a frame source.
///
/// `on_frame` runs on the capture thread at device rate. There is no rate
/// contract between source and sink: implementations must tolerate frames
/// arriving faster than they can be consumed and must return quickly.
pub trait FrameSink: Send {
    fn on_frame(&self, frame: Frame);
}

/// Frames can be piped straight into a channel, mainly for tests.
impl FrameSink for crossbeam_channel::Sender<Frame> {
    fn on_frame(&self, frame: Frame) {
        let _ = self.send(frame);
    }
}
