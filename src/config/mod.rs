//! Application Configuration
//!
//! User settings stored in TOML format.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::vision::DetectionEngine;

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Frame source settings
    pub capture: CaptureSettings,
    /// Detection engine settings
    pub detection: DetectionSettings,
    /// Overlay surface settings
    pub overlay: OverlaySettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            capture: CaptureSettings::default(),
            detection: DetectionSettings::default(),
            overlay: OverlaySettings::default(),
        }
    }
}

/// Capture-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSettings {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Frames per second delivered by the source
    pub fps: u32,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fps: 30,
        }
    }
}

/// Detection-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionSettings {
    /// Which detection engine to run
    pub engine: DetectionEngine,
    /// Minimum confidence for a region to be kept (0.0 - 1.0)
    pub min_confidence: f32,
    /// Grid cell edge in pixels for the block detector
    pub cell_size: u32,
    /// Minimum mean luma (0 - 255) for a cell to count as ink
    pub luma_threshold: u8,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            engine: DetectionEngine::Block,
            min_confidence: 0.5,
            cell_size: 16,
            luma_threshold: 160,
        }
    }
}

/// Overlay-related settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlaySettings {
    /// Rendering surface width in pixels
    pub view_width: f32,
    /// Rendering surface height in pixels
    pub view_height: f32,
    /// Draw character-level rectangles in addition to word-level ones
    pub show_characters: bool,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            view_width: 1280.0,
            view_height: 720.0,
            show_characters: true,
        }
    }
}

/// Load configuration from file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to file
pub fn save_config(config: &AppConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Get the configuration directory, creating it if needed
pub fn config_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "textsight", "TextSight")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    let dir = proj_dirs.config_dir().to_path_buf();
    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_app_config() {
        let config = AppConfig::default();

        // Check capture defaults
        assert_eq!(config.capture.width, 640);
        assert_eq!(config.capture.height, 480);
        assert_eq!(config.capture.fps, 30);

        // Check detection defaults
        assert_eq!(config.detection.engine, DetectionEngine::Block);
        assert!((config.detection.min_confidence - 0.5).abs() < 0.01);
        assert_eq!(config.detection.cell_size, 16);
        assert_eq!(config.detection.luma_threshold, 160);

        // Check overlay defaults
        assert!((config.overlay.view_width - 1280.0).abs() < 0.01);
        assert!((config.overlay.view_height - 720.0).abs() < 0.01);
        assert!(config.overlay.show_characters);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = AppConfig::default();

        // Serialize to TOML
        let toml_str = toml::to_string_pretty(&config).unwrap();

        // Deserialize back
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        // Verify values match
        assert_eq!(config.capture.fps, parsed.capture.fps);
        assert_eq!(config.detection.cell_size, parsed.detection.cell_size);
        assert_eq!(config.overlay.show_characters, parsed.overlay.show_characters);
    }

    #[test]
    fn test_config_with_custom_values() {
        let mut config = AppConfig::default();
        config.capture.fps = 60;
        config.detection.engine = DetectionEngine::Noop;
        config.detection.min_confidence = 0.8;
        config.overlay.view_width = 1920.0;

        // Serialize and deserialize
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("engine = \"noop\""));
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.capture.fps, 60);
        assert_eq!(parsed.detection.engine, DetectionEngine::Noop);
        assert!((parsed.detection.min_confidence - 0.8).abs() < 0.01);
        assert!((parsed.overlay.view_width - 1920.0).abs() < 0.01);
    }

    #[test]
    fn test_save_and_load_config() {
        let config = AppConfig::default();

        // Create a temporary file
        let temp_file = NamedTempFile::new().unwrap();

        // Save config
        save_config(&config, temp_file.path()).unwrap();

        // Load config
        let loaded = load_config(temp_file.path()).unwrap();

        // Verify
        assert_eq!(config.capture.width, loaded.capture.width);
        assert_eq!(config.detection.luma_threshold, loaded.detection.luma_threshold);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "this is not valid toml {{{{").unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }
}
