//! Polyroids headless runner
//!
//! Plays a scripted session against the simulation core and prints a JSON
//! summary. Usage: `polyroids [config.json] [ticks] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match args.first() {
        Some(path) => match polyroids::Config::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("Failed to load config {}: {}", path, err);
                std::process::exit(1);
            }
        },
        None => polyroids::Config::default(),
    };
    let ticks = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(3600);
    let seed = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(0x5eed);

    log::info!("Polyroids (headless) starting, seed {seed:#x}, {ticks} ticks");
    let summary = native::run(config, seed, ticks);

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Failed to serialize summary: {}", err),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is embedded by a host; nothing to run here
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use serde::Serialize;

    use polyroids::Config;
    use polyroids::consts::TARGET_FPS;
    use polyroids::sim::{EntityTag, GameEvent, GameState, TickInput, tick};

    /// Ticks between autopilot thrust bursts
    const THRUST_PERIOD: u64 = 90;
    /// Ticks between progress log lines
    const REPORT_PERIOD: u64 = 600;

    #[derive(Debug, Default, Serialize)]
    pub struct Summary {
        pub seed: u64,
        pub ticks: u64,
        pub score: u64,
        pub level: u32,
        pub lives: u32,
        pub game_over: bool,
        pub shots_fired: u64,
        pub asteroids_destroyed: u64,
        pub ships_lost: u64,
        pub asteroids: usize,
        pub debris: usize,
        pub renderables: usize,
    }

    /// Rotate and fire constantly, thrust in short bursts, continue after
    /// every death
    fn autopilot(state: &GameState) -> TickInput {
        let t = state.time_ticks;
        TickInput {
            rotate_right: true,
            thrust: t % THRUST_PERIOD < 10,
            fire: t % 8 == 0,
            continue_after_death: state.ship_destroyed(),
            ..Default::default()
        }
    }

    pub fn run(config: Config, seed: u64, ticks: u64) -> Summary {
        let mut state = GameState::new(seed, config);
        let mut summary = Summary {
            seed,
            ..Default::default()
        };

        for _ in 0..ticks {
            let input = autopilot(&state);
            tick(&mut state, &input, TARGET_FPS);

            for event in &state.events {
                match event {
                    GameEvent::ShotFired => summary.shots_fired += 1,
                    GameEvent::AsteroidDestroyed { .. } => summary.asteroids_destroyed += 1,
                    GameEvent::ShipDestroyed { .. } => summary.ships_lost += 1,
                    _ => {}
                }
            }

            if state.time_ticks % REPORT_PERIOD == 0 {
                log::info!(
                    "tick {}: score {} level {} lives {}",
                    state.time_ticks,
                    state.score,
                    state.level,
                    state.lives
                );
            }
            if state.game_over {
                break;
            }
        }

        let renderables = state.renderables();
        log::debug!(
            "{} asteroid polygons in final frame",
            renderables.iter().filter(|r| r.tag == EntityTag::Asteroid).count()
        );

        summary.ticks = state.time_ticks;
        summary.score = state.score;
        summary.level = state.level;
        summary.lives = state.lives;
        summary.game_over = state.game_over;
        summary.asteroids = state.asteroids.len();
        summary.debris = state.debris.len();
        summary.renderables = renderables.len();
        summary
    }
}
