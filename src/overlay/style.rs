//! Render styles for overlay rectangles

/// Style for one class of overlay rectangle
#[derive(Debug, Clone, Copy)]
pub struct RectStyle {
    /// Border width in view pixels
    pub border_width: f32,
    /// Border color as RGBA (0.0 - 1.0)
    pub color: [f32; 4],
}

impl RectStyle {
    /// Border color as a hex RGB string for text renderers
    pub fn hex_color(&self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}",
            (self.color[0].clamp(0.0, 1.0) * 255.0) as u8,
            (self.color[1].clamp(0.0, 1.0) * 255.0) as u8,
            (self.color[2].clamp(0.0, 1.0) * 255.0) as u8,
        )
    }
}

/// Styles for the two overlay partitions.
///
/// Defaults keep word boxes visually dominant: a thicker red border for
/// words, a thinner blue one for the character boxes inside them.
#[derive(Debug, Clone, Copy)]
pub struct OverlayStyles {
    /// Word-level rectangles
    pub word: RectStyle,
    /// Character-level rectangles
    pub character: RectStyle,
}

impl Default for OverlayStyles {
    fn default() -> Self {
        Self {
            word: RectStyle {
                border_width: 2.0,
                color: [1.0, 0.0, 0.0, 1.0],
            },
            character: RectStyle {
                border_width: 1.0,
                color: [0.0, 0.0, 1.0, 1.0],
            },
        }
    }
}
