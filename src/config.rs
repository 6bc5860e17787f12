//! Demo configuration
//!
//! Loaded from a JSON file. Every field has a default, so a partial file
//! (or `{}`) is valid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::display::{DEFAULT_HEIGHT, DEFAULT_WIDTH};

pub const DEFAULT_CONFIG_PATH: &str = "sprite_demo.json";

/// Straight (non-premultiplied) RGBA color as written in the config file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
    /// Extra bytes at the end of every canvas row
    pub row_padding: usize,
    pub background: Rgba,
    pub sprite_radius: u32,
    /// Width of the sprite's soft edge in pixels
    pub sprite_feather: f32,
    pub sprite_color: Rgba,
    /// Sprite velocity in pixels per second
    pub velocity: (f32, f32),
    /// How far past each window edge the sprite travels before bouncing,
    /// as a fraction of its diameter
    pub overshoot: f32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            vsync: true,
            row_padding: 64,
            background: Rgba::new(16, 24, 48, 255),
            sprite_radius: 48,
            sprite_feather: 6.0,
            sprite_color: Rgba::new(240, 200, 80, 160),
            velocity: (180.0, 130.0),
            overshoot: 0.5,
        }
    }
}

impl DemoConfig {
    /// Save config to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Load config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let json = fs::read_to_string(path).map_err(|e| e.to_string())?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: Self = serde_json::from_str(json).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!("window size {}x{} is empty", self.width, self.height));
        }
        if self.sprite_radius == 0 {
            return Err("sprite_radius must be at least 1".to_string());
        }
        if !self.overshoot.is_finite() || self.overshoot < 0.0 {
            return Err(format!("overshoot {} must be >= 0", self.overshoot));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        assert_eq!(DemoConfig::from_json("{}").unwrap(), DemoConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config =
            DemoConfig::from_json(r#"{"width": 320, "sprite_color": {"r": 1, "g": 2, "b": 3}}"#)
                .unwrap();
        assert_eq!(config.width, 320);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.sprite_color, Rgba::new(1, 2, 3, 255));
    }

    #[test]
    fn test_rejects_zero_radius() {
        assert!(DemoConfig::from_json(r#"{"sprite_radius": 0}"#).is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(DemoConfig::from_json("{width: 3").is_err());
    }

    #[test]
    fn test_save_load_file() {
        let path = std::env::temp_dir().join(format!("sprite_demo_{}.json", std::process::id()));
        let mut config = DemoConfig::default();
        config.row_padding = 0;
        config.velocity = (-10.0, 5.5);
        config.save(&path).unwrap();
        let loaded = DemoConfig::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(DemoConfig::load("/nonexistent/sprite_demo.json").is_err());
    }
}
