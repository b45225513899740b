//! nightwalk: a night walk through a small town
//!
//! Walk around a static level with collision, flip to a free orbit camera,
//! or trigger a fifteen-shot cinematic in which a stalker crosses the street.
//! Levels and shot tables are RON data; built-in copies ship in `assets/`.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod config;
mod game;
mod hud;
mod input;
mod math;
mod render;
mod world;

use anyhow::Context;
use clap::Parser;
use macroquad::prelude::{get_frame_time, next_frame, Conf};

use config::{AppConfig, Cli};
use game::{CinematicEvent, GameState, ShotTable};
use input::{Action, InputState};

/// Longest frame step fed to the simulation, so a stall does not teleport the player
const MAX_FRAME_TIME: f32 = 0.1;

fn window_conf(config: &AppConfig) -> Conf {
    Conf {
        window_title: config.window_title.clone(),
        window_width: config.window_width,
        window_height: config.window_height,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn load_game(config: &AppConfig) -> anyhow::Result<GameState> {
    let level = match &config.level {
        Some(path) => world::load_level(path)
            .with_context(|| format!("loading level {}", path.display()))?,
        None => world::reference_level().context("parsing built-in level")?,
    };
    let build = level.build();
    for scenery in &build.scenery {
        log::trace!("scenery '{}' {:?} {:?}", scenery.name, scenery.category, scenery.bounds);
    }
    if build.obstacles.is_empty() {
        log::warn!("level '{}' has no obstacles; collision will never trigger", build.name);
    }
    log::info!(
        "level '{}': {} obstacles, {} street lights, siren {}",
        build.name,
        build.obstacles.len(),
        build.environment.street_lights.len(),
        if build.environment.siren.is_some() { "present" } else { "absent" },
    );

    let shots = match &config.shots {
        Some(path) => ShotTable::load(path)
            .with_context(|| format!("loading shot table {}", path.display()))?,
        None => ShotTable::reference().context("parsing built-in shot table")?,
    };

    Ok(GameState::new(build, shots, config.runtime_options()))
}

fn log_cinematic_event(event: &CinematicEvent) {
    match event {
        CinematicEvent::Started => log::info!("cinematic started"),
        CinematicEvent::Finished { aborted: true, player_position } => {
            log::info!("cinematic skipped, player at {:?}", player_position)
        }
        CinematicEvent::Finished { aborted: false, player_position } => {
            log::info!("cinematic finished, player at {:?}", player_position)
        }
    }
}

async fn run(mut game: GameState, show_obstacles: bool, start_cinematic: bool) {
    let mut input = InputState::new();
    let mut status = game.flags.status();

    if start_cinematic {
        game.handle_action(Action::TriggerCinematic);
    }
    if input.has_gamepad() {
        log::info!("gamepad connected");
    }

    loop {
        let dt = get_frame_time().min(MAX_FRAME_TIME);
        let snapshot = input.poll();
        game.tick(dt, &snapshot);

        for event in game.events.cinematic.drain() {
            log_cinematic_event(&event);
        }
        if let Some(latest) = game.events.status.last().copied() {
            status = latest;
        }
        game.events.clear_all();

        render::draw_scene(&game, show_obstacles);
        hud::draw_hud(&status);

        next_frame().await;
    }
}

fn main() -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = AppConfig::resolve(&cli).context("reading configuration")?;
    let game = load_game(&config)?;
    log::info!("nightwalk v{} starting", VERSION);

    macroquad::Window::from_config(
        window_conf(&config),
        run(game, config.show_obstacles, config.start_cinematic),
    );
    Ok(())
}
