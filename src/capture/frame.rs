//! Frame data structures for captured video content

use std::time::Instant;

/// Camera calibration metadata attached to a frame by the capture device.
///
/// Delivered opportunistically; sources that have no calibration data
/// simply leave it off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraIntrinsics {
    /// Focal length in pixels (fx, fy)
    pub focal_length: (f32, f32),
    /// Principal point in pixels (cx, cy)
    pub principal_point: (f32, f32),
}

/// A captured video frame.
///
/// Owned by exactly one stage at a time: the source hands it to the sink,
/// the sink either drops it or moves it into a detection job.
#[derive(Debug)]
pub struct Frame {
    /// Raw RGBA pixel data
    pub data: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Monotonic index assigned by the source
    pub sequence: u64,
    /// Timestamp when the frame was captured
    pub timestamp: Instant,
    /// Optional calibration metadata from the device
    pub intrinsics: Option<CameraIntrinsics>,
}

impl Frame {
    /// Create a new frame from RGBA pixel data
    pub fn new(data: Vec<u8>, width: u32, height: u32, sequence: u64) -> Self {
        Self {
            data,
            width,
            height,
            sequence,
            timestamp: Instant::now(),
            intrinsics: None,
        }
    }

    /// Attach calibration metadata to the frame
    pub fn with_intrinsics(mut self, intrinsics: CameraIntrinsics) -> Self {
        self.intrinsics = Some(intrinsics);
        self
    }

    /// Get frame dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of bytes a full RGBA frame at these dimensions occupies
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_dimensions() {
        let frame = Frame::new(vec![0u8; 16], 2, 2, 7);
        assert_eq!(frame.dimensions(), (2, 2));
        assert_eq!(frame.sequence, 7);
        assert_eq!(frame.expected_len(), 16);
        assert!(frame.intrinsics.is_none());
    }

    #[test]
    fn test_frame_with_intrinsics() {
        let intrinsics = CameraIntrinsics {
            focal_length: (640.0, 640.0),
            principal_point: (320.0, 240.0),
        };
        let frame = Frame::new(vec![0u8; 16], 2, 2, 0).with_intrinsics(intrinsics);
        assert_eq!(frame.intrinsics, Some(intrinsics));
    }
}
