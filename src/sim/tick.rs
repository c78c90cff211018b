//! Per-tick simulation step
//!
//! Runs the phases of one frame in a fixed order: input, level progression,
//! movement, firing, collisions, destruction side effects, compaction.

use super::entity::Entity;
use super::spawn::{DebrisBurst, spawn_debris_burst, spawn_level_asteroids, split_asteroid};
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Player commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held: turn counter-clockwise
    pub rotate_left: bool,
    /// Held: turn clockwise
    pub rotate_right: bool,
    /// Held: accelerate along the heading
    pub thrust: bool,
    /// Pressed: fire a shot
    pub fire: bool,
    /// Pressed: pause toggle
    pub pause: bool,
    /// Pressed: launch a new ship after losing one
    pub continue_after_death: bool,
}

/// Motion scale compensating for a frame rate off target
///
/// A non-positive measurement (no samples yet) counts as on target.
pub fn speed_factor(target_fps: f32, measured_fps: f32) -> f32 {
    if measured_fps > 0.0 {
        target_fps / measured_fps
    } else {
        1.0
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, measured_fps: f32) {
    state.events.clear();

    if state.game_over {
        state.paused = false;
    } else if input.pause {
        state.paused = !state.paused;
        state.events.push(if state.paused {
            GameEvent::Paused
        } else {
            GameEvent::Resumed
        });
    }

    if state.paused {
        return;
    }

    state.time_ticks += 1;
    let factor = speed_factor(state.config.target_fps, measured_fps);

    if input.continue_after_death && state.ship.is_none() && !state.game_over {
        state.spawn_ship();
        state.events.push(GameEvent::ShipRespawned);
        log::debug!("New ship launched, {} lives left", state.lives);
    }

    let fire = apply_input(state, input, factor);

    if state.asteroids.is_empty() {
        start_next_level(state);
    }

    move_entities(state, factor);

    if fire {
        fire_shot(state);
    }

    resolve_collisions(state);
    spawn_destruction_effects(state);
    state.compact();
}

/// Steer the ship; returns whether a shot should be fired this tick
fn apply_input(state: &mut GameState, input: &TickInput, factor: f32) -> bool {
    let Some(ship) = state.ship.as_mut() else {
        return false;
    };

    if input.rotate_right {
        ship.body.rotate(SHIP_TURN_RATE * factor);
    }
    if input.rotate_left {
        ship.body.rotate(-SHIP_TURN_RATE * factor);
    }
    if input.thrust {
        ship.add_thrust(SHIP_THRUST * factor);
    }

    input.fire && state.shots.len() < state.config.shot_limit
}

fn start_next_level(state: &mut GameState) {
    state.level = (state.level + 1).min(state.config.max_level);
    let ship_position = state
        .ship
        .as_ref()
        .map_or_else(|| state.config.field_center(), Entity::translation);

    match spawn_level_asteroids(state.level, ship_position, &state.config, &mut state.rng) {
        Ok(asteroids) => {
            log::info!("Level {}: {} asteroids", state.level, asteroids.len());
            state.events.push(GameEvent::LevelStarted {
                level: state.level,
                asteroids: asteroids.len(),
            });
            state.asteroids.extend(asteroids);
        }
        Err(err) => log::error!("Level {} spawn skipped: {}", state.level, err),
    }
}

fn move_entities(state: &mut GameState, factor: f32) {
    let field = state.config.field();
    let entities = state
        .ship
        .iter_mut()
        .chain(state.shots.iter_mut())
        .chain(state.asteroids.iter_mut())
        .chain(state.debris.iter_mut());
    for entity in entities {
        entity.advance(factor);
        entity.wrap(field);
    }
}

fn fire_shot(state: &mut GameState) {
    let Some(ship) = state.ship.as_ref() else {
        return;
    };

    let heading = ship.heading();
    let mut shot = Entity::shot(
        ship.tip_position() + heading,
        heading,
        ship.body.rotation(),
        state.config.shot_speed,
        state.config.max_shot_range,
    );
    shot.wrap(state.config.field());
    state.shots.push(shot);
    state.events.push(GameEvent::ShotFired);
}

/// Toroidal collision tests in fixed order, setting destruction flags only
fn resolve_collisions(state: &mut GameState) {
    // 1. Shots against asteroids score
    let points = state.config.asteroid_points;
    for shot in state.shots.iter_mut() {
        for asteroid in state.asteroids.iter_mut() {
            if shot.collides_with(asteroid) {
                if !state.game_over {
                    state.score = (state.score + points).min(MAX_SCORE);
                    state.events.push(GameEvent::AsteroidHit { points });
                }
                shot.destroy();
                asteroid.destroy();
                asteroid.set_destruction(Some(shot.direction), Some(shot.speed / 2.0));
            }
        }
    }

    if let Some(ship) = state.ship.as_mut() {
        // 2. Shots against the ship only remove the shot
        for shot in state.shots.iter_mut() {
            if shot.collides_with(ship) {
                shot.destroy();
            }
        }

        // 3. Ship against asteroids
        for asteroid in state.asteroids.iter_mut() {
            if ship.collides_with(asteroid) {
                let away = (asteroid.translation() - ship.translation() + ship.direction)
                    .normalize_or_zero();
                asteroid.destroy();
                asteroid.set_destruction(Some(away), None);
                ship.destroy();
            }
        }
    }

    // 4. Asteroids against each other
    let count = state.asteroids.len();
    for i in 0..count {
        let (head, tail) = state.asteroids.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if a.collides_with(b) {
                let a_away = (a.translation() - b.translation() + b.direction).normalize_or_zero();
                let b_away = (b.translation() - a.translation() + a.direction).normalize_or_zero();
                a.destroy();
                a.set_destruction(Some(a_away), Some(b.speed));
                b.destroy();
                b.set_destruction(Some(b_away), Some(a.speed));
            }
        }
    }
}

/// Debris, splits and life loss for everything destroyed this tick
///
/// Destroyed entities never survive `compact`, so each one is seen here
/// exactly once.
fn spawn_destruction_effects(state: &mut GameState) {
    let field = state.config.field();
    let fade_to = state.config.debris_fade_to;
    let mut new_asteroids = Vec::new();
    let mut new_debris = Vec::new();

    for asteroid in state.asteroids.iter().filter(|a| a.is_destroyed()) {
        let radius = asteroid.asteroid_radius().unwrap_or(0);
        new_debris.extend(spawn_debris_burst(
            &DebrisBurst::asteroid(asteroid, radius),
            fade_to,
            &mut state.rng,
        ));

        let children = match split_asteroid(asteroid, &state.config, &mut state.rng) {
            Ok(children) => children,
            Err(err) => {
                log::error!("Asteroid split skipped: {}", err);
                Vec::new()
            }
        };
        state.events.push(GameEvent::AsteroidDestroyed {
            radius,
            children: children.len(),
        });
        new_asteroids.extend(children);
    }

    for shot in state.shots.iter().filter(|s| s.is_destroyed()) {
        new_debris.extend(spawn_debris_burst(
            &DebrisBurst::shot(shot),
            fade_to,
            &mut state.rng,
        ));
        state.events.push(GameEvent::ShotDestroyed);
    }

    if let Some(ship) = state.ship.as_ref().filter(|s| s.is_destroyed()) {
        new_debris.extend(spawn_debris_burst(
            &DebrisBurst::ship(ship),
            fade_to,
            &mut state.rng,
        ));

        state.lives = state.lives.saturating_sub(1);
        state.events.push(GameEvent::ShipDestroyed {
            lives_left: state.lives,
        });
        log::debug!("Ship destroyed, {} lives left", state.lives);

        if state.lives < 1 {
            state.game_over = true;
            state.events.push(GameEvent::GameOver { score: state.score });
            log::info!("Game over at level {} with score {}", state.level, state.score);
        }
    }

    if !new_debris.is_empty() {
        state.events.push(GameEvent::DebrisSpawned {
            count: new_debris.len(),
        });
    }

    for entity in new_asteroids.iter_mut().chain(new_debris.iter_mut()) {
        entity.wrap(field);
    }
    state.asteroids.extend(new_asteroids);
    state.debris.extend(new_debris);
}
