//! Polyroids - simulation core of a screen-wrapping asteroids game
//!
//! Core modules:
//! - `sim`: Polygon geometry, collision engine, entities and the per-tick step
//! - `settings`: Data-driven session configuration
//! - `error`: Construction-time contract violations
//!
//! Rendering, audio and input mapping live outside this crate. They call
//! [`sim::tick::tick`] once per frame and read back [`sim::GameState::renderables`].

pub mod error;
pub mod settings;
pub mod sim;

pub use error::GeometryError;
pub use settings::{Config, ConfigError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation rate the motion constants are tuned for
    pub const TARGET_FPS: f32 = 60.0;

    /// Ship speed cap (units per tick)
    pub const SHIP_MAX_SPEED: f32 = 15.0;
    /// Degrees per tick while a rotate command is held
    pub const SHIP_TURN_RATE: f32 = 1.5;
    /// Thrust added per tick while the thrust command is held
    pub const SHIP_THRUST: f32 = 0.1;

    /// Radius of a level-start asteroid
    pub const ASTEROID_START_RADIUS: i32 = 50;
    /// Vertex count of a level-start asteroid
    pub const ASTEROID_START_VERTICES: usize = 11;
    /// Children are only spawned while half the parent radius exceeds this
    pub const ASTEROID_MIN_SPLIT_RADIUS: i32 = 10;

    /// Debris burst radius for a destroyed shot
    pub const SHOT_DEBRIS_RADIUS: i32 = 5;
    /// Debris burst radius for a destroyed ship
    pub const SHIP_DEBRIS_RADIUS: i32 = 20;

    /// Score display saturates here
    pub const MAX_SCORE: u64 = 99_999_999;
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Rotate a vector counter-clockwise by `degrees`
#[inline]
pub fn rotate_deg(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// Unit heading for a polygon rotated by `degrees` (local "up" is -y)
#[inline]
pub fn heading(degrees: f32) -> Vec2 {
    rotate_deg(Vec2::NEG_Y, degrees)
}
