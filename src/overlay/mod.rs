//! Overlay Presentation Layer
//!
//! View-space geometry for the rendering surface, plus the store that owns
//! the displayed overlay set. Rectangles here are in view pixels, origin
//! top-left, y increasing downward; the flip from engine space happens in
//! the mapper and nowhere else.

pub mod mapper;
pub mod render;
pub mod store;
pub mod style;

use parking_lot::RwLock;

pub use mapper::map_observations;
pub use render::{run_render_loop, ConsoleRenderer, OverlayRenderer};
pub use store::OverlayStore;
pub use style::OverlayStyles;

/// Axis-aligned rectangle on the rendering surface
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ViewRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Zero extent on either axis; drawn as nothing but still counted
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Size of the rendering surface in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSize {
    pub width: f32,
    pub height: f32,
}

impl ViewSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Shared view size, written by the rendering surface on resize and read by
/// the detection worker at the moment it maps a completed cycle.
#[derive(Debug)]
pub struct Viewport {
    size: RwLock<ViewSize>,
}

impl Viewport {
    pub fn new(size: ViewSize) -> Self {
        Self {
            size: RwLock::new(size),
        }
    }

    /// Current surface size
    pub fn get(&self) -> ViewSize {
        *self.size.read()
    }

    /// Record a resize
    pub fn set(&self, size: ViewSize) {
        *self.size.write() = size;
    }
}

/// The complete set of overlays from one detection cycle.
///
/// Installed into the store wholesale and never mutated in place. `cycle`
/// is stamped by the store at install time; 0 means nothing was ever
/// installed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OverlaySet {
    /// Detection cycle that produced this set
    pub cycle: u64,
    /// Word-level rectangles in observation order
    pub words: Vec<ViewRect>,
    /// Character-level rectangles, grouped by region in observation order
    pub characters: Vec<ViewRect>,
}

impl OverlaySet {
    /// Total rectangle count across both partitions
    pub fn len(&self) -> usize {
        self.words.len() + self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.characters.is_empty()
    }
}
