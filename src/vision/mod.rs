//! Vision Layer
//!
//! Interface to text-region detection engines. An engine consumes one frame
//! and produces geometric observations in unit-square coordinates; the rest
//! of the pipeline never looks at pixels. Only geometry is consumed here -
//! recognizing the characters themselves is out of scope.

pub mod block;

use thiserror::Error;

use crate::capture::Frame;

pub use block::{BlockDetector, BlockDetectorConfig};

/// Detection engine selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionEngine {
    /// Bundled luma-threshold block detector
    #[default]
    Block,
    /// Engine that reports nothing, for exercising the pipeline alone
    Noop,
}

/// A point in the detector's normalized coordinate space.
///
/// Unit square `[0, 1] x [0, 1]`, origin bottom-left, y increasing upward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitPoint {
    pub x: f32,
    pub y: f32,
}

impl UnitPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A bounding quadrilateral in unit-square coordinates.
///
/// Engines report arbitrary quads. Corners are named for the upright case
/// but no axis alignment is assumed; consumers that need a rectangle must
/// take the envelope over all four corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedQuad {
    pub top_left: UnitPoint,
    pub top_right: UnitPoint,
    pub bottom_left: UnitPoint,
    pub bottom_right: UnitPoint,
}

impl NormalizedQuad {
    /// Axis-aligned quad from its bottom-left corner and extent
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            top_left: UnitPoint::new(x, y + height),
            top_right: UnitPoint::new(x + width, y + height),
            bottom_left: UnitPoint::new(x, y),
            bottom_right: UnitPoint::new(x + width, y),
        }
    }

    fn corners(&self) -> [UnitPoint; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_left,
            self.bottom_right,
        ]
    }

    /// Leftmost x over all four corners
    pub fn min_x(&self) -> f32 {
        self.corners().iter().map(|p| p.x).fold(f32::INFINITY, f32::min)
    }

    /// Rightmost x over all four corners
    pub fn max_x(&self) -> f32 {
        self.corners()
            .iter()
            .map(|p| p.x)
            .fold(f32::NEG_INFINITY, f32::max)
    }

    /// Lowest y over all four corners
    pub fn min_y(&self) -> f32 {
        self.corners().iter().map(|p| p.y).fold(f32::INFINITY, f32::min)
    }

    /// Highest y over all four corners
    pub fn max_y(&self) -> f32 {
        self.corners()
            .iter()
            .map(|p| p.y)
            .fold(f32::NEG_INFINITY, f32::max)
    }
}

/// One detected text region
#[derive(Debug, Clone)]
pub struct RawObservation {
    /// Bounding quad of the whole region
    pub region: NormalizedQuad,
    /// Per-character sub-boxes in reading order. Empty when the engine was
    /// not asked for them or could not segment the region.
    pub character_boxes: Vec<NormalizedQuad>,
    /// Classification label, when the engine provides one
    pub label: Option<String>,
    /// Detection confidence (0.0 - 1.0)
    pub confidence: f32,
}

/// Options submitted with every detection request.
///
/// Fixed for the lifetime of a pipeline; there is no per-frame tuning.
#[derive(Debug, Clone, Copy)]
pub struct DetectorOptions {
    /// Ask the engine for per-character sub-boxes
    pub report_character_boxes: bool,
    /// Engines drop observations below this confidence (0.0 - 1.0)
    pub min_confidence: f32,
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self {
            report_character_boxes: true,
            min_confidence: 0.0,
        }
    }
}

/// Errors reported by a detection engine
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("frame data length {provided} is smaller than width * height * 4 ({required})")]
    InsufficientFrameData { provided: usize, required: usize },
    #[error("detection backend error: {message}")]
    Backend { message: String },
}

impl DetectionError {
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Common interface for text-region detection engines.
///
/// Implementations may keep per-call state (warmed models, scratch buffers),
/// hence `&mut self`. The pipeline calls `detect` from a dedicated worker
/// thread, one request at a time.
pub trait TextDetector: Send {
    /// Engine name for logs
    fn name(&self) -> &'static str;

    /// Run detection on one frame
    fn detect(
        &mut self,
        frame: &Frame,
        options: &DetectorOptions,
    ) -> Result<Vec<RawObservation>, DetectionError>;
}

/// Engine that never finds anything, used where a real backend is not wired
#[derive(Debug, Default)]
pub struct NoopDetector;

impl TextDetector for NoopDetector {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn detect(
        &mut self,
        _frame: &Frame,
        _options: &DetectorOptions,
    ) -> Result<Vec<RawObservation>, DetectionError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_from_rect_corners() {
        let quad = NormalizedQuad::from_rect(0.1, 0.2, 0.3, 0.4);
        assert_eq!(quad.bottom_left, UnitPoint::new(0.1, 0.2));
        assert_eq!(quad.bottom_right, UnitPoint::new(0.4, 0.2));
        assert_eq!(quad.top_left, UnitPoint::new(0.1, 0.6));
        assert_eq!(quad.top_right, UnitPoint::new(0.4, 0.6));
    }

    #[test]
    fn test_axis_aligned_envelope() {
        let quad = NormalizedQuad::from_rect(0.25, 0.5, 0.5, 0.25);
        assert_eq!(quad.min_x(), 0.25);
        assert_eq!(quad.max_x(), 0.75);
        assert_eq!(quad.min_y(), 0.5);
        assert_eq!(quad.max_y(), 0.75);
    }

    #[test]
    fn test_skewed_envelope_considers_every_corner() {
        // extremes deliberately spread over all four corners
        let quad = NormalizedQuad {
            top_left: UnitPoint::new(0.1, 0.9),
            top_right: UnitPoint::new(0.8, 0.95),
            bottom_left: UnitPoint::new(0.05, 0.2),
            bottom_right: UnitPoint::new(0.75, 0.15),
        };
        assert_eq!(quad.min_x(), 0.05);
        assert_eq!(quad.max_x(), 0.8);
        assert_eq!(quad.min_y(), 0.15);
        assert_eq!(quad.max_y(), 0.95);
    }

    #[test]
    fn test_noop_detector_finds_nothing() {
        let mut detector = NoopDetector;
        let frame = Frame::new(vec![0u8; 16], 2, 2, 0);
        let observations = detector.detect(&frame, &DetectorOptions::default()).unwrap();
        assert!(observations.is_empty());
        assert_eq!(detector.name(), "noop");
    }

    #[test]
    fn test_detection_error_messages() {
        let err = DetectionError::InsufficientFrameData {
            provided: 8,
            required: 16,
        };
        assert_eq!(
            err.to_string(),
            "frame data length 8 is smaller than width * height * 4 (16)"
        );

        let err = DetectionError::backend("model not loaded");
        assert_eq!(err.to_string(), "detection backend error: model not loaded");
    }
}
