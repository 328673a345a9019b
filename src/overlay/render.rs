//! Renderer adapter and UI-thread loop
//!
//! The actual drawing surface is external; `OverlayRenderer` is the seam it
//! plugs into. Redraw work always happens on the thread running
//! `run_render_loop`, never on the detection worker: the worker only sends
//! an event, the loop pulls a fresh snapshot from the store.

use crossbeam_channel::Receiver;
use tracing::{debug, warn};

use crate::shared::PipelineEvent;

use super::store::OverlayStore;
use super::style::OverlayStyles;
use super::OverlaySet;

/// A surface that can display one overlay set.
///
/// Each `render` call replaces everything previously drawn. Word rectangles
/// draw with the word style, character rectangles with the character style,
/// in set order; the surface's own base layer (camera preview, page
/// background) is not this trait's concern.
pub trait OverlayRenderer: Send {
    fn render(&mut self, set: &OverlaySet);
}

/// Renderer that prints overlay sets, standing in for a real surface
pub struct ConsoleRenderer {
    styles: OverlayStyles,
    show_characters: bool,
    redraws: u64,
}

impl ConsoleRenderer {
    pub fn new(styles: OverlayStyles, show_characters: bool) -> Self {
        Self {
            styles,
            show_characters,
            redraws: 0,
        }
    }

    /// Number of redraws performed so far
    pub fn redraws(&self) -> u64 {
        self.redraws
    }
}

impl OverlayRenderer for ConsoleRenderer {
    fn render(&mut self, set: &OverlaySet) {
        self.redraws += 1;
        debug!("redraw {}: {} rectangles", self.redraws, set.len());
        if set.is_empty() {
            println!("cycle {:>4}: no text", set.cycle);
            return;
        }
        println!(
            "cycle {:>4}: {} words, {} characters",
            set.cycle,
            set.words.len(),
            set.characters.len()
        );
        for (index, word) in set.words.iter().enumerate() {
            if word.is_degenerate() {
                continue;
            }
            println!(
                "  word[{index}] {:.0}x{:.0} at ({:.0}, {:.0}) border {:.1} {}",
                word.width,
                word.height,
                word.x,
                word.y,
                self.styles.word.border_width,
                self.styles.word.hex_color()
            );
        }
        if self.show_characters {
            for ch in &set.characters {
                if ch.is_degenerate() {
                    continue;
                }
                println!(
                    "    char {:.0}x{:.0} at ({:.0}, {:.0}) border {:.1} {}",
                    ch.width,
                    ch.height,
                    ch.x,
                    ch.y,
                    self.styles.character.border_width,
                    self.styles.character.hex_color()
                );
            }
        }
    }
}

/// Drive a renderer from pipeline events until the channel closes.
///
/// The calling thread becomes the UI thread. Bursts of updates coalesce
/// into a single redraw of the newest snapshot, so the surface only ever
/// shows the latest set.
pub fn run_render_loop(
    store: &OverlayStore,
    renderer: &mut dyn OverlayRenderer,
    events: &Receiver<PipelineEvent>,
) {
    while let Ok(first) = events.recv() {
        let mut redraw = false;
        handle_event(first, &mut redraw);
        // drain whatever queued up while we were blocked
        while let Ok(event) = events.try_recv() {
            handle_event(event, &mut redraw);
        }
        if redraw {
            renderer.render(&store.snapshot());
        }
    }
    debug!("render loop exiting: pipeline closed");
}

fn handle_event(event: PipelineEvent, redraw: &mut bool) {
    match event {
        PipelineEvent::OverlaysUpdated { cycle } => {
            debug!("overlays updated for cycle {cycle}");
            *redraw = true;
        }
        PipelineEvent::DetectionFailed { message } => {
            warn!("detection failed, keeping previous overlays: {message}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::ViewRect;
    use crossbeam_channel::unbounded;

    struct RecordingRenderer {
        sets: Vec<OverlaySet>,
    }

    impl OverlayRenderer for RecordingRenderer {
        fn render(&mut self, set: &OverlaySet) {
            self.sets.push(set.clone());
        }
    }

    fn one_word_set(marker: f32) -> OverlaySet {
        OverlaySet {
            cycle: 0,
            words: vec![ViewRect::new(marker, 0.0, 10.0, 10.0)],
            characters: Vec::new(),
        }
    }

    #[test]
    fn test_burst_of_updates_coalesces_to_one_redraw() {
        let store = OverlayStore::new();
        let first = store.replace(one_word_set(1.0));
        let second = store.replace(one_word_set(2.0));

        let (tx, rx) = unbounded();
        tx.send(PipelineEvent::OverlaysUpdated { cycle: first }).unwrap();
        tx.send(PipelineEvent::OverlaysUpdated { cycle: second }).unwrap();
        drop(tx);

        let mut renderer = RecordingRenderer { sets: Vec::new() };
        run_render_loop(&store, &mut renderer, &rx);

        // both queued events collapse into one redraw of the newest set
        assert_eq!(renderer.sets.len(), 1);
        assert_eq!(renderer.sets[0].cycle, 2);
        assert_eq!(renderer.sets[0].words[0].x, 2.0);
    }

    #[test]
    fn test_failure_events_do_not_redraw() {
        let store = OverlayStore::new();
        let (tx, rx) = unbounded();
        tx.send(PipelineEvent::DetectionFailed {
            message: "backend offline".to_string(),
        })
        .unwrap();
        drop(tx);

        let mut renderer = RecordingRenderer { sets: Vec::new() };
        run_render_loop(&store, &mut renderer, &rx);
        assert!(renderer.sets.is_empty());
    }

    #[test]
    fn test_loop_exits_when_pipeline_closes() {
        let store = OverlayStore::new();
        let (tx, rx) = unbounded::<PipelineEvent>();
        drop(tx);

        let mut renderer = RecordingRenderer { sets: Vec::new() };
        // returns immediately instead of blocking on a dead channel
        run_render_loop(&store, &mut renderer, &rx);
        assert!(renderer.sets.is_empty());
    }

    #[test]
    fn test_console_renderer_counts_redraws() {
        let mut renderer = ConsoleRenderer::new(OverlayStyles::default(), false);
        renderer.render(&one_word_set(1.0));
        renderer.render(&one_word_set(2.0));
        assert_eq!(renderer.redraws(), 2);
    }
}
