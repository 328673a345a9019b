//! TextSight - Live text-region overlay
//!
//! Captures video frames, runs them through a text-region detection engine
//! under an at-most-one-in-flight admission policy, and keeps a rendering
//! surface updated with the latest word and character overlays.

mod app;
mod capture;
mod config;
mod overlay;
mod pipeline;
mod shared;
mod vision;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::app::LiveSession;
use crate::config::AppConfig;
use crate::overlay::{ConsoleRenderer, OverlayStyles};

/// TextSight - live text-region detection overlay
#[derive(Parser, Debug)]
#[command(name = "textsight")]
#[command(about = "Tracks detected text regions over a live frame stream")]
struct Args {
    /// Number of frames to capture before exiting
    #[arg(short = 'n', long, default_value = "120")]
    frames: u64,

    /// Override the configured capture frame rate
    #[arg(long)]
    fps: Option<u32>,

    /// Override the configured view width in pixels
    #[arg(long)]
    view_width: Option<f32>,

    /// Override the configured view height in pixels
    #[arg(long)]
    view_height: Option<f32>,

    /// Print the recognized-word log when the session ends
    #[arg(long)]
    dump_words: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    // Load or create configuration, then apply CLI overrides
    let mut config = load_or_create_config();
    if let Some(fps) = args.fps {
        config.capture.fps = fps;
    }
    if let Some(width) = args.view_width {
        config.overlay.view_width = width;
    }
    if let Some(height) = args.view_height {
        config.overlay.view_height = height;
    }

    info!("TextSight starting...");
    info!(
        "capture {}x{} @ {} fps, view {}x{}",
        config.capture.width,
        config.capture.height,
        config.capture.fps,
        config.overlay.view_width,
        config.overlay.view_height
    );

    let mut renderer =
        ConsoleRenderer::new(OverlayStyles::default(), config.overlay.show_characters);
    let session = LiveSession::new(config, args.frames);
    let summary = session.run(&mut renderer)?;

    println!(
        "frames: {} offered, {} accepted, {} dropped",
        summary.stats.frames_offered, summary.stats.frames_accepted, summary.stats.frames_dropped
    );
    println!(
        "cycles: {} completed ({} empty, {} failed), {} redraws",
        summary.stats.cycles_completed,
        summary.stats.empty_cycles,
        summary.stats.detection_failures,
        renderer.redraws()
    );
    println!("recognized words logged: {}", summary.recognized_words.len());
    if args.dump_words {
        for (index, word) in summary.recognized_words.iter().enumerate() {
            let shown = if word.is_empty() { "<unlabeled>" } else { word.as_str() };
            println!("  [{index}] {shown}");
        }
    }

    info!("TextSight shutdown complete");

    Ok(())
}

/// Load configuration from file, writing the defaults on first run
fn load_or_create_config() -> AppConfig {
    if let Ok(config_dir) = config::config_dir() {
        let config_path = config_dir.join("config.toml");
        if config_path.exists() {
            if let Ok(config) = config::load_config(&config_path) {
                info!("Loaded configuration from {:?}", config_path);
                return config;
            }
        } else {
            let config = AppConfig::default();
            if config::save_config(&config, &config_path).is_ok() {
                info!("Wrote default configuration to {:?}", config_path);
            }
            return config;
        }
    }
    info!("Using default configuration");
    AppConfig::default()
}
