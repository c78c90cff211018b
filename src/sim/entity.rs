//! Game entities
//!
//! Every object on the field is an [`Entity`]: a polygon body plus motion,
//! color, destruction and wrap state. What differs between ships, shots,
//! asteroids and debris lives in [`EntityKind`] and is dispatched by `match`.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{collides_wrapped, wrap_offsets, wrap_position};
use super::polygon::Polygon;
use crate::consts::*;
use crate::error::GeometryError;
use crate::settings::Color;
use crate::{heading, rotate_deg};

/// Shot color right after firing
pub const SHOT_COLOR_BEGIN: Color = [255, 50, 50];
/// Shot color at the end of its range
pub const SHOT_COLOR_END: Color = [255, 255, 50];

/// Index of the ship's nose in its hull
const SHIP_NOSE: usize = 1;

/// Discriminant of an entity, for renderers and events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityTag {
    Ship,
    Shot,
    Asteroid,
    Debris,
}

/// Variant-specific state
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    Ship,
    Shot {
        /// Distance covered so far
        traveled: f32,
        /// Burns out once `traveled` exceeds this
        max_range: f32,
    },
    Asteroid {
        /// Nominal radius (vertices are jittered around it)
        radius: i32,
        /// Degrees per tick
        spin: f32,
        /// Recorded at destruction, seeds the children
        destruction_vector: Vec2,
        destruction_speed: f32,
    },
    Debris {
        /// Degrees per tick
        spin: f32,
        /// Ticks lived
        life: f32,
        max_life: f32,
        original_color: Color,
        fade_to: Color,
    },
}

#[derive(Debug, Clone)]
pub struct Entity {
    pub body: Polygon,
    pub speed: f32,
    /// Unit length, or zero before the first move
    pub direction: Vec2,
    pub color: Color,
    /// Images of this entity overlapping the field, refreshed by `wrap`
    pub wrap_offsets: Vec<Vec2>,
    pub kind: EntityKind,
    destroyed: bool,
}

impl Entity {
    fn from_body(body: Polygon, color: Color, kind: EntityKind) -> Self {
        Self {
            body,
            speed: 0.0,
            direction: Vec2::ZERO,
            color,
            wrap_offsets: Vec::new(),
            kind,
            destroyed: false,
        }
    }

    /// A motionless ship at `position`, nose up
    pub fn ship(position: Vec2, color: Color) -> Self {
        let mut ship = Self::from_body(ship_hull(), color, EntityKind::Ship);
        ship.body.set_translation(position);
        ship
    }

    /// A shot flying along `direction` from `position`
    pub fn shot(
        position: Vec2,
        direction: Vec2,
        rotation: f32,
        speed: f32,
        max_range: f32,
    ) -> Self {
        let kind = EntityKind::Shot {
            traveled: 0.0,
            max_range,
        };
        let mut shot = Self::from_body(shot_hull(), SHOT_COLOR_BEGIN, kind);
        shot.speed = speed;
        shot.direction = direction;
        shot.body.set_rotation(rotation);
        shot.body.set_translation(position);
        shot
    }

    /// A random asteroid: a circle of `radius` with jittered vertices
    ///
    /// Direction, speed and spin are drawn too; callers override what they
    /// need. Fails for fewer than 3 vertices.
    pub fn asteroid(
        radius: i32,
        num_vertices: usize,
        color: Color,
        rng: &mut impl Rng,
    ) -> Result<Self, GeometryError> {
        if num_vertices < 3 {
            return Err(GeometryError::TooFewAsteroidVertices {
                count: num_vertices,
            });
        }

        let mean_angle = 360.0 / num_vertices as f32;
        let mean_radius = radius as f32;
        let angle_variation = 0.2 * mean_angle;
        let radius_variation = 0.3 * mean_radius.abs();

        let mut vertices = Vec::with_capacity(num_vertices);
        let mut current_angle = 0.0;
        for _ in 0..num_vertices {
            let r = mean_radius + rng.random_range(-radius_variation..=radius_variation);
            current_angle += rng.random_range(-angle_variation..=angle_variation);
            vertices.push(rotate_deg(Vec2::new(0.0, r), current_angle));
            current_angle += mean_angle;
        }

        let kind = EntityKind::Asteroid {
            radius,
            spin: rng.random_range(-1.0..=1.0),
            destruction_vector: Vec2::ZERO,
            destruction_speed: 0.0,
        };
        let mut asteroid = Self::from_body(Polygon::new(vertices)?, color, kind);
        asteroid.direction = random_direction(rng);
        asteroid.speed = rng.random_range(0.01..=1.0);
        Ok(asteroid)
    }

    /// A debris fragment at `position`, fading from `color` to `fade_to`
    pub fn debris(position: Vec2, color: Color, fade_to: Color, rng: &mut impl Rng) -> Self {
        let speed = rng.random_range(0.1..=1.5);
        let direction = random_direction(rng);
        let kind = EntityKind::Debris {
            spin: rng.random_range(-2.0..=2.0),
            life: 0.0,
            max_life: rng.random_range(100.0..=200.0),
            original_color: color,
            fade_to,
        };
        let mut debris = Self::from_body(debris_hull(), color, kind);
        debris.speed = speed;
        debris.direction = direction;
        debris.body.set_translation(position);
        debris
    }

    pub fn tag(&self) -> EntityTag {
        match self.kind {
            EntityKind::Ship => EntityTag::Ship,
            EntityKind::Shot { .. } => EntityTag::Shot,
            EntityKind::Asteroid { .. } => EntityTag::Asteroid,
            EntityKind::Debris { .. } => EntityTag::Debris,
        }
    }

    #[inline]
    pub fn translation(&self) -> Vec2 {
        self.body.translation()
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Mark for removal at the end of the tick; there is no way back
    #[inline]
    pub fn destroy(&mut self) {
        self.destroyed = true;
    }

    /// Advance one tick scaled by `speed_factor`
    pub fn advance(&mut self, speed_factor: f32) {
        let step = self.direction * (self.speed * speed_factor);
        self.body.translate(step);

        match &mut self.kind {
            EntityKind::Ship => {}
            EntityKind::Shot {
                traveled,
                max_range,
            } => {
                *traveled += step.length();
                if *max_range > 0.0 {
                    let fraction = (*traveled / *max_range).min(1.0);
                    self.color = lerp_color(SHOT_COLOR_BEGIN, SHOT_COLOR_END, fraction);
                    // Strict: a shot at exactly its range survives this tick
                    if *traveled > *max_range {
                        self.destroyed = true;
                    }
                }
            }
            EntityKind::Asteroid { spin, .. } => {
                self.body.rotate(*spin * speed_factor);
            }
            EntityKind::Debris {
                spin,
                life,
                max_life,
                original_color,
                fade_to,
            } => {
                self.body.rotate(*spin * speed_factor);
                *life += speed_factor;
                if *life > *max_life {
                    self.destroyed = true;
                }
                let fraction = (*life / *max_life).min(1.0);
                self.color = lerp_color(*original_color, *fade_to, fraction);
            }
        }
    }

    /// Wrap the position into the field and refresh the wrap offsets
    pub fn wrap(&mut self, field: Vec2) {
        let pos = self.body.translation();
        let wrapped = wrap_position(pos, field);
        if wrapped != pos {
            self.body.set_translation(wrapped);
        }
        self.wrap_offsets = wrap_offsets(self.body.aabb(), field);
    }

    /// Toroidal collision test against another entity
    pub fn collides_with(&mut self, other: &mut Entity) -> bool {
        collides_wrapped(
            &mut self.body,
            &self.wrap_offsets,
            &mut other.body,
            &other.wrap_offsets,
        )
    }

    /// Ship heading (unit vector the nose points along)
    pub fn heading(&self) -> Vec2 {
        heading(self.body.rotation())
    }

    /// Ship thrust: add `amount` along the heading and cap the speed
    pub fn add_thrust(&mut self, amount: f32) {
        let momentum = self.direction * self.speed + self.heading() * amount;
        self.speed = momentum.length().min(SHIP_MAX_SPEED);
        self.direction = momentum.normalize_or_zero();
    }

    /// World position of the ship's nose
    pub fn tip_position(&self) -> Vec2 {
        let nose = self.body.vertices()[SHIP_NOSE.min(self.body.num_vertices() - 1)];
        self.body.transform_point(nose)
    }

    /// Asteroid radius, if this is an asteroid
    pub fn asteroid_radius(&self) -> Option<i32> {
        match self.kind {
            EntityKind::Asteroid { radius, .. } => Some(radius),
            _ => None,
        }
    }

    /// Record how an asteroid was hit; ignored for other kinds
    pub fn set_destruction(&mut self, vector: Option<Vec2>, speed: Option<f32>) {
        if let EntityKind::Asteroid {
            destruction_vector,
            destruction_speed,
            ..
        } = &mut self.kind
        {
            if let Some(v) = vector {
                *destruction_vector = v;
            }
            if let Some(s) = speed {
                *destruction_speed = s;
            }
        }
    }

    /// Destruction vector and speed of an asteroid, zero for other kinds
    pub fn destruction(&self) -> (Vec2, f32) {
        match self.kind {
            EntityKind::Asteroid {
                destruction_vector,
                destruction_speed,
                ..
            } => (destruction_vector, destruction_speed),
            _ => (Vec2::ZERO, 0.0),
        }
    }
}

fn ship_hull() -> Polygon {
    hull([(10.0, 5.0), (0.0, -20.0), (-10.0, 5.0)])
}

fn shot_hull() -> Polygon {
    hull([(-1.5, 0.0), (1.5, 0.0), (0.0, -7.0)])
}

fn debris_hull() -> Polygon {
    hull([(1.0, 1.0), (0.0, -1.0), (-1.0, 1.0)])
}

fn hull(points: [(f32, f32); 3]) -> Polygon {
    Polygon::triangle(points.map(|(x, y)| Vec2::new(x, y)))
}

/// Uniformly random unit vector
pub fn random_direction(rng: &mut impl Rng) -> Vec2 {
    rotate_deg(Vec2::Y, rng.random_range(0.0..360.0))
}

/// Per-channel linear interpolation, clamped to a byte
pub fn lerp_color(from: Color, to: Color, t: f32) -> Color {
    std::array::from_fn(|i| {
        let value = (1.0 - t) * from[i] as f32 + t * to[i] as f32;
        value.clamp(0.0, 255.0) as u8
    })
}

/// Add independent integer jitter in [-amount, amount] to every channel
pub fn jitter_color(color: Color, amount: i32, rng: &mut impl Rng) -> Color {
    color.map(|c| (c as i32 + rng.random_range(-amount..=amount)).clamp(0, 255) as u8)
}
