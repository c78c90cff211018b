//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Motion scaled by an explicit speed factor only
//! - Seeded RNG only, owned by the game state
//! - Stable iteration order (insertion order of each entity list)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod geometry;
pub mod polygon;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{NarrowPhaseStats, collides, collides_traced, collides_wrapped, wrap_offsets};
pub use entity::{Entity, EntityKind, EntityTag};
pub use geometry::{Aabb, point_in_polygon, segments_intersect};
pub use polygon::Polygon;
pub use state::{GameEvent, GameState, Renderable};
pub use tick::{TickInput, speed_factor, tick};
