//! Game state and core simulation types
//!
//! One `GameState` owns every entity of a session. It is created at session
//! start, reset for a new game, and only mutated by [`super::tick`].

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityTag};
use crate::settings::{Color, Config};

/// Something that happened during the last tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { level: u32, asteroids: usize },
    ShotFired,
    AsteroidHit { points: u64 },
    AsteroidDestroyed { radius: i32, children: usize },
    ShotDestroyed,
    ShipDestroyed { lives_left: u32 },
    ShipRespawned,
    DebrisSpawned { count: usize },
    Paused,
    Resumed,
    GameOver { score: u64 },
}

/// One polygon to draw, plus the images it has across the field edges
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Renderable {
    pub tag: EntityTag,
    pub vertices: Vec<Vec2>,
    pub wrap_offsets: Vec<Vec2>,
    pub color: Color,
}

impl Renderable {
    fn of(entity: &Entity) -> Self {
        Self {
            tag: entity.tag(),
            vertices: entity.body.transformed_vertices().to_vec(),
            wrap_offsets: entity.wrap_offsets.clone(),
            color: entity.color,
        }
    }
}

/// Complete simulation context
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub config: Config,
    pub rng: Pcg32,
    pub score: u64,
    /// Current level (0 before the first wave)
    pub level: u32,
    pub lives: u32,
    pub paused: bool,
    pub game_over: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// The player's ship; `None` while waiting for a continue after death
    pub ship: Option<Entity>,
    pub shots: Vec<Entity>,
    pub asteroids: Vec<Entity>,
    pub debris: Vec<Entity>,
    /// Events of the last tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with the given seed and configuration
    pub fn new(seed: u64, config: Config) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            level: 0,
            lives: config.starting_lives,
            paused: false,
            game_over: false,
            time_ticks: 0,
            ship: None,
            shots: Vec::new(),
            asteroids: Vec::new(),
            debris: Vec::new(),
            events: Vec::new(),
            config,
        };
        state.spawn_ship();
        state
    }

    /// Start over with the same seed and configuration
    pub fn reset(&mut self) {
        *self = Self::new(self.seed, self.config.clone());
    }

    /// Place a fresh ship at the field center
    pub fn spawn_ship(&mut self) {
        let mut ship = Entity::ship(self.config.field_center(), self.config.ship_color);
        ship.wrap(self.config.field());
        self.ship = Some(ship);
    }

    /// The ship is gone and waits for a continue
    pub fn ship_destroyed(&self) -> bool {
        self.ship.is_none()
    }

    pub fn live_ship(&self) -> Option<&Entity> {
        self.ship.as_ref().filter(|s| !s.is_destroyed())
    }

    /// Every entity in draw order: ship, asteroids, shots, debris
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.ship
            .iter()
            .chain(&self.asteroids)
            .chain(&self.shots)
            .chain(&self.debris)
    }

    /// Snapshot of everything a renderer needs
    pub fn renderables(&self) -> Vec<Renderable> {
        self.entities().map(Renderable::of).collect()
    }

    /// Drop every destroyed entity
    pub fn compact(&mut self) {
        if self.ship.as_ref().is_some_and(Entity::is_destroyed) {
            self.ship = None;
        }
        self.shots.retain(|s| !s.is_destroyed());
        self.asteroids.retain(|a| !a.is_destroyed());
        self.debris.retain(|d| !d.is_destroyed());
    }
}
