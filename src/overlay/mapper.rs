//! Observation-to-overlay mapping
//!
//! Pure geometry: converts one detection cycle's unit-square observations
//! into view-pixel rectangles and the word labels logged alongside them.
//! Engine space has its origin bottom-left with y up; view space top-left
//! with y down. The vertical flip happens here and nowhere else.

use crate::vision::{NormalizedQuad, RawObservation};

use super::{OverlaySet, ViewRect, ViewSize};

/// Output of mapping one detection cycle
#[derive(Debug, Clone, Default)]
pub struct MappedCycle {
    /// Overlay set ready for the store
    pub overlays: OverlaySet,
    /// One label per region, empty string where the engine gave none
    pub labels: Vec<String>,
}

/// Map a cycle of observations into view-space overlays.
///
/// Word rectangles are the envelope of the region's character boxes; a
/// region without character boxes falls back to its own quad. Degenerate
/// boxes map to zero-area rectangles rather than being dropped, so the
/// label list stays index-aligned with the observation order.
pub fn map_observations(observations: &[RawObservation], view: ViewSize) -> MappedCycle {
    let mut overlays = OverlaySet::default();
    let mut labels = Vec::with_capacity(observations.len());

    for observation in observations {
        overlays.words.push(word_rect(observation, view));
        for sub in &observation.character_boxes {
            overlays.characters.push(quad_to_view(sub, view));
        }
        labels.push(observation.label.clone().unwrap_or_default());
    }

    MappedCycle { overlays, labels }
}

/// Envelope of all character boxes, or the region quad when there are none
fn word_rect(observation: &RawObservation, view: ViewSize) -> ViewRect {
    if observation.character_boxes.is_empty() {
        return quad_to_view(&observation.region, view);
    }

    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for sub in &observation.character_boxes {
        min_x = min_x.min(sub.min_x());
        max_x = max_x.max(sub.max_x());
        min_y = min_y.min(sub.min_y());
        max_y = max_y.max(sub.max_y());
    }

    envelope_to_view(min_x, min_y, max_x, max_y, view)
}

/// Transform one quad through its own envelope
fn quad_to_view(quad: &NormalizedQuad, view: ViewSize) -> ViewRect {
    envelope_to_view(quad.min_x(), quad.min_y(), quad.max_x(), quad.max_y(), view)
}

/// Unit-square envelope to view pixels, flipping y to the top-left origin
fn envelope_to_view(min_x: f32, min_y: f32, max_x: f32, max_y: f32, view: ViewSize) -> ViewRect {
    ViewRect::new(
        min_x * view.width,
        (1.0 - max_y) * view.height,
        (max_x - min_x) * view.width,
        (max_y - min_y) * view.height,
    )
}
