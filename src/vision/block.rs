//! Luma-threshold block detector
//!
//! A deterministic stand-in for a real text-detection engine. It averages
//! luma over a coarse cell grid and merges horizontal runs of bright cells
//! into regions; each cell in a run doubles as one character box. Output is
//! unit-square geometry with the engine convention (origin bottom-left), so
//! downstream code sees exactly what a real backend would hand it.

use std::time::Instant;

use image::{DynamicImage, GrayImage, RgbaImage};
use tracing::debug;

use crate::capture::Frame;

use super::{DetectionError, DetectorOptions, NormalizedQuad, RawObservation, TextDetector};

/// Tuning for the block detector
#[derive(Debug, Clone, Copy)]
pub struct BlockDetectorConfig {
    /// Grid cell edge in pixels
    pub cell_size: u32,
    /// Minimum mean luma (0 - 255) for a cell to count as ink
    pub luma_threshold: u8,
}

impl Default for BlockDetectorConfig {
    fn default() -> Self {
        Self {
            cell_size: 16,
            luma_threshold: 160,
        }
    }
}

/// One horizontal run of bright cells on a grid row
#[derive(Debug, Clone, Copy)]
struct CellRun {
    row: u32,
    start_col: u32,
    end_col: u32,
}

/// Deterministic luma-based text-region detector
pub struct BlockDetector {
    config: BlockDetectorConfig,
}

impl BlockDetector {
    /// Create a detector with the given tuning
    pub fn new(config: BlockDetectorConfig) -> Self {
        Self { config }
    }

    /// Scan one grid row for runs of bright cells and emit a region per run
    fn scan_row(
        &self,
        gray: &GrayImage,
        frame: &Frame,
        options: &DetectorOptions,
        row: u32,
        cols: u32,
        out: &mut Vec<RawObservation>,
    ) {
        let cell = self.config.cell_size.max(1);
        let threshold = self.config.luma_threshold as f32;
        let mut run_start: Option<u32> = None;

        for col in 0..cols {
            let bright = mean_luma(gray, col * cell, row * cell, cell, cell) >= threshold;
            match (run_start, bright) {
                (None, true) => run_start = Some(col),
                (Some(start_col), false) => {
                    let run = CellRun {
                        row,
                        start_col,
                        end_col: col - 1,
                    };
                    out.extend(self.region_for_run(gray, frame, options, run));
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start_col) = run_start {
            let run = CellRun {
                row,
                start_col,
                end_col: cols - 1,
            };
            out.extend(self.region_for_run(gray, frame, options, run));
        }
    }

    /// Build one observation from a run of bright cells, unless it falls
    /// under the confidence bar
    fn region_for_run(
        &self,
        gray: &GrayImage,
        frame: &Frame,
        options: &DetectorOptions,
        run: CellRun,
    ) -> Option<RawObservation> {
        let cell = self.config.cell_size.max(1);
        let px_x = run.start_col * cell;
        let px_right = ((run.end_col + 1) * cell).min(frame.width);
        let px_y = run.row * cell;
        let px_bottom = ((run.row + 1) * cell).min(frame.height);
        let px_w = px_right - px_x;
        let px_h = px_bottom - px_y;

        let confidence = mean_luma(gray, px_x, px_y, px_w, px_h) / 255.0;
        if confidence < options.min_confidence {
            return None;
        }

        let region = unit_quad(px_x, px_y, px_w, px_h, frame.width, frame.height);
        let character_boxes = if options.report_character_boxes {
            (run.start_col..=run.end_col)
                .map(|col| {
                    let cx = col * cell;
                    let cw = ((col + 1) * cell).min(frame.width) - cx;
                    unit_quad(cx, px_y, cw, px_h, frame.width, frame.height)
                })
                .collect()
        } else {
            Vec::new()
        };

        Some(RawObservation {
            region,
            character_boxes,
            label: None,
            confidence,
        })
    }
}

impl Default for BlockDetector {
    fn default() -> Self {
        Self::new(BlockDetectorConfig::default())
    }
}

impl TextDetector for BlockDetector {
    fn name(&self) -> &'static str {
        "block"
    }

    fn detect(
        &mut self,
        frame: &Frame,
        options: &DetectorOptions,
    ) -> Result<Vec<RawObservation>, DetectionError> {
        let required = frame.expected_len();
        if frame.data.len() < required {
            return Err(DetectionError::InsufficientFrameData {
                provided: frame.data.len(),
                required,
            });
        }

        let start = Instant::now();

        let rgba = RgbaImage::from_raw(frame.width, frame.height, frame.data[..required].to_vec())
            .ok_or_else(|| DetectionError::backend("frame buffer rejected by image codec"))?;
        let gray = DynamicImage::ImageRgba8(rgba).to_luma8();

        let cell = self.config.cell_size.max(1);
        let cols = frame.width.div_ceil(cell);
        let rows = frame.height.div_ceil(cell);

        let mut observations = Vec::new();
        for row in 0..rows {
            self.scan_row(&gray, frame, options, row, cols, &mut observations);
        }

        debug!(
            "block detection complete in {:?}: {} regions",
            start.elapsed(),
            observations.len()
        );

        Ok(observations)
    }
}

/// Mean luma over a rectangle, clamped to the image bounds
fn mean_luma(gray: &GrayImage, x0: u32, y0: u32, w: u32, h: u32) -> f32 {
    let (img_w, img_h) = gray.dimensions();
    let x1 = (x0 + w).min(img_w);
    let y1 = (y0 + h).min(img_h);
    if x0 >= x1 || y0 >= y1 {
        return 0.0;
    }

    let mut sum = 0u64;
    for y in y0..y1 {
        for x in x0..x1 {
            sum += gray.get_pixel(x, y).0[0] as u64;
        }
    }
    sum as f32 / ((x1 - x0) as u64 * (y1 - y0) as u64) as f32
}

/// Pixel rectangle to a unit-square quad, flipping y to the bottom-left origin
fn unit_quad(px_x: u32, px_y: u32, px_w: u32, px_h: u32, frame_w: u32, frame_h: u32) -> NormalizedQuad {
    let fw = frame_w as f32;
    let fh = frame_h as f32;
    NormalizedQuad::from_rect(
        px_x as f32 / fw,
        1.0 - (px_y + px_h) as f32 / fh,
        px_w as f32 / fw,
        px_h as f32 / fh,
    )
}
