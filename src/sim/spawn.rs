//! Entity spawning: debris bursts, asteroid splits and level waves
//!
//! Every function draws from the RNG it is handed, so a seeded generator
//! replays the same spawns.

use glam::Vec2;
use rand::Rng;
use rand::seq::SliceRandom;

use super::entity::{Entity, jitter_color};
use crate::consts::*;
use crate::error::GeometryError;
use crate::rotate_deg;
use crate::settings::{Color, Config};

/// Color jitter (per channel) for spawned asteroids and debris
const COLOR_JITTER: i32 = 15;

/// How debris leaves a destroyed entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DebrisSpeed {
    /// Keep the randomly drawn debris speed
    Random,
    /// `base / U[2.5, 3.5]`
    Scaled(f32),
}

/// Shape of a debris burst
#[derive(Debug, Clone, Copy)]
pub struct DebrisBurst {
    pub center: Vec2,
    /// Fragment count and outer spawn radius
    pub radius: i32,
    /// Fragments spawn no closer to the center than `radius * inner_ratio`
    pub inner_ratio: f32,
    pub color: Color,
    pub speed: DebrisSpeed,
}

impl DebrisBurst {
    /// Burst for a destroyed asteroid
    pub fn asteroid(asteroid: &Entity, radius: i32) -> Self {
        let (_, destruction_speed) = asteroid.destruction();
        Self {
            center: asteroid.translation(),
            radius,
            inner_ratio: 0.25,
            color: asteroid.color,
            speed: DebrisSpeed::Scaled(destruction_speed + asteroid.speed),
        }
    }

    /// Burst for a destroyed shot
    pub fn shot(shot: &Entity) -> Self {
        Self {
            center: shot.translation(),
            radius: SHOT_DEBRIS_RADIUS,
            inner_ratio: 0.5,
            color: shot.color,
            speed: DebrisSpeed::Random,
        }
    }

    /// Burst for a destroyed ship, driven by the ship's own speed
    pub fn ship(ship: &Entity) -> Self {
        Self {
            center: ship.translation(),
            radius: SHIP_DEBRIS_RADIUS,
            inner_ratio: 0.25,
            color: ship.color,
            speed: DebrisSpeed::Scaled(ship.speed),
        }
    }
}

/// Scatter `burst.radius` debris fragments around the burst center
pub fn spawn_debris_burst(burst: &DebrisBurst, fade_to: Color, rng: &mut impl Rng) -> Vec<Entity> {
    let count = burst.radius.max(0) as usize;
    let outer = burst.radius as f32;
    let inner = outer * burst.inner_ratio;

    (0..count)
        .map(|_| {
            let distance = rng.random_range(inner..=outer);
            let spread = rotate_deg(Vec2::Y, rng.random_range(0.0..360.0));
            let position = burst.center + spread * distance;
            let color = jitter_color(burst.color, COLOR_JITTER, rng);

            let mut debris = Entity::debris(position, color, fade_to, rng);
            debris.direction =
                rotate_deg(spread, rng.random_range(-15.0..=15.0)).normalize_or_zero();
            if let DebrisSpeed::Scaled(base) = burst.speed {
                debris.speed = base / rng.random_range(2.5..=3.5);
            }
            debris
        })
        .collect()
}

/// Two smaller asteroids from a destroyed one, or none if it is too small
///
/// Children sit on either side of the parent along the perpendicular of the
/// destruction vector and fly apart along it.
pub fn split_asteroid(
    parent: &Entity,
    config: &Config,
    rng: &mut impl Rng,
) -> Result<Vec<Entity>, GeometryError> {
    let Some(radius) = parent.asteroid_radius() else {
        return Ok(Vec::new());
    };
    let half = radius / 2;
    if half <= ASTEROID_MIN_SPLIT_RADIUS {
        return Ok(Vec::new());
    }

    let num_vertices = parent.body.num_vertices().saturating_sub(2).max(3);
    let (destruction_vector, destruction_speed) = parent.destruction();
    let axis = rotate_deg(destruction_vector.normalize_or_zero(), 90.0);
    let center = parent.translation();
    let base_speed = destruction_speed + parent.speed;

    let mut children = Vec::with_capacity(2);
    for side in [1.0f32, -1.0] {
        let child_radius = half + rng.random_range(-4..=4);
        let position = center + axis * side * (child_radius as f32 * 1.5);
        let turn = if side > 0.0 { 0.0 } else { 180.0 };
        let direction = rotate_deg(axis, turn + rng.random_range(-30.0..=30.0));

        let color = jitter_color(config.asteroid_color, COLOR_JITTER, rng);
        let mut child = Entity::asteroid(child_radius, num_vertices, color, rng)?;
        child.body.set_translation(position);
        child.direction = direction;
        child.speed = base_speed / rng.random_range(2.0..=3.0);
        children.push(child);
    }

    log::debug!(
        "Asteroid r={} split into r={:?}",
        radius,
        children.iter().filter_map(Entity::asteroid_radius).collect::<Vec<_>>()
    );
    Ok(children)
}

/// Asteroids for the start of `level`: one per level, placed at the border
/// slots farthest from the ship and from each other, heading roughly at the
/// field center
pub fn spawn_level_asteroids(
    level: u32,
    ship_position: Vec2,
    config: &Config,
    rng: &mut impl Rng,
) -> Result<Vec<Entity>, GeometryError> {
    let mut slots = config.spawn_positions();
    slots.shuffle(rng);
    let center = config.field_center();

    let mut asteroids: Vec<Entity> = Vec::with_capacity(level as usize);
    for _ in 0..level {
        let color = jitter_color(config.asteroid_color, COLOR_JITTER, rng);
        let mut asteroid = Entity::asteroid(
            ASTEROID_START_RADIUS,
            ASTEROID_START_VERTICES,
            color,
            rng,
        )?;

        let spawn = farthest_slot(&slots, ship_position, &asteroids);
        asteroid.body.set_translation(spawn);

        let toward_center = rotate_deg(center - spawn, rng.random_range(-35.0..=35.0));
        asteroid.direction = toward_center.normalize_or_zero();
        asteroid.speed += level as f32 / 10.0;
        asteroids.push(asteroid);
    }
    Ok(asteroids)
}

/// Slot maximizing the minimum squared distance to the ship and `placed`
fn farthest_slot(slots: &[Vec2], ship_position: Vec2, placed: &[Entity]) -> Vec2 {
    let mut best = Vec2::ZERO;
    let mut best_dist = 0.0;
    for &slot in slots {
        let min_dist = placed
            .iter()
            .map(|a| a.translation().distance_squared(slot))
            .fold(ship_position.distance_squared(slot), f32::min);
        if min_dist > best_dist {
            best_dist = min_dist;
            best = slot;
        }
    }
    best
}
