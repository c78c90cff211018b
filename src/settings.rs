//! Session configuration
//!
//! Loaded once at session start; the field size stays constant afterwards.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// RGB color, one byte per channel
pub type Color = [u8; 3];

/// Problems reading or validating a [`Config`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Gameplay tuning for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // === Field ===
    /// Width of the toroidal play field
    pub field_width: f32,
    /// Height of the toroidal play field
    pub field_height: f32,

    // === Rules ===
    /// Maximum shots in flight
    pub shot_limit: usize,
    /// Distance a shot travels before burning out
    pub max_shot_range: f32,
    /// Shot speed (units per tick)
    pub shot_speed: f32,
    /// Points per asteroid hit
    pub asteroid_points: u64,
    /// Ships at the start of a game
    pub starting_lives: u32,
    /// Level (and asteroid count) stops increasing here
    pub max_level: u32,
    /// Inset of the asteroid spawn positions from the field edges
    pub spawn_border: f32,
    /// Simulation rate the motion constants are tuned for
    pub target_fps: f32,

    // === Colors ===
    pub ship_color: Color,
    pub asteroid_color: Color,
    /// Debris fades toward this color over its lifetime
    pub debris_fade_to: Color,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            field_width: 1024.0,
            field_height: 768.0,

            shot_limit: 10,
            max_shot_range: 620.0,
            shot_speed: 6.0,
            asteroid_points: 10,
            starting_lives: 3,
            max_level: 9,
            spawn_border: 55.0,
            target_fps: crate::consts::TARGET_FPS,

            ship_color: [50, 255, 50],
            asteroid_color: [200, 200, 200],
            debris_fade_to: [0, 0, 0],
        }
    }
}

impl Config {
    /// Parse and validate a JSON config; missing keys fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.field_width > 0.0 && self.field_height > 0.0) {
            return Err(ConfigError::Invalid("field dimensions must be positive"));
        }
        if self.shot_limit == 0 {
            return Err(ConfigError::Invalid("shot_limit must be at least 1"));
        }
        if !(self.max_shot_range > 0.0) {
            return Err(ConfigError::Invalid("max_shot_range must be positive"));
        }
        if !(self.target_fps > 0.0) {
            return Err(ConfigError::Invalid("target_fps must be positive"));
        }
        if self.max_level == 0 {
            return Err(ConfigError::Invalid("max_level must be at least 1"));
        }
        Ok(())
    }

    /// Field dimensions as a vector
    #[inline]
    pub fn field(&self) -> Vec2 {
        Vec2::new(self.field_width, self.field_height)
    }

    /// Field center, where ships spawn
    pub fn field_center(&self) -> Vec2 {
        Vec2::new(
            (self.field_width / 2.0).floor(),
            (self.field_height / 2.0).floor(),
        )
    }

    /// The twelve asteroid spawn slots along the field border
    pub fn spawn_positions(&self) -> Vec<Vec2> {
        let b = self.spawn_border;
        let (w, h) = (self.field_width, self.field_height);
        let (w3, h3) = ((w / 3.0).floor(), (h / 3.0).floor());
        vec![
            Vec2::new(b, b),
            Vec2::new(w3, b),
            Vec2::new(w3 * 2.0, b),
            Vec2::new(w - b, b),
            Vec2::new(b, h - b),
            Vec2::new(w3, h - b),
            Vec2::new(w3 * 2.0, h - b),
            Vec2::new(w - b, h - b),
            Vec2::new(b, h3),
            Vec2::new(b, h3 * 2.0),
            Vec2::new(w - b, h3),
            Vec2::new(w - b, h3 * 2.0),
        ]
    }
}
