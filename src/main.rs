use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use dead_jump::audio::SoundQueue;
use dead_jump::camera::Camera;
use dead_jump::components::{Character, Life, Position};
use dead_jump::config::GameConfig;
use dead_jump::engine::input::{InputScript, InputState};
use dead_jump::engine::time::FixedStep;
use dead_jump::scene::demo_level::load_demo_level;
use dead_jump::systems::{step, GameEvent};
use dead_jump::World;

/// Frames longer than this many ticks drop the backlog.
const MAX_TICKS_PER_FRAME: u32 = 5;

#[derive(Parser)]
#[command(name = "dead-jump", about = "Headless Dead Jump simulation runner")]
struct Args {
    /// Number of fixed ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// JSON file overriding physics, character and world-bound tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Scripted input as KEYS:TICKS segments, e.g. "R:40,RJ:5,-:20"
    #[arg(long, default_value = "R:60,RJ:8,R:30,-:10")]
    seed_input: String,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameState {
    Running,
    LevelComplete,
    GameOver,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::default(),
    };
    let script: InputScript = args
        .seed_input
        .parse()
        .with_context(|| format!("parsing input script '{}'", args.seed_input))?;

    let mut world = World::new();
    load_demo_level(&mut world, &config).context("building demo level")?;

    let mut clock = FixedStep::new(config.physics.fixed_delta_time, MAX_TICKS_PER_FRAME);
    let mut input = InputState::new();
    let mut state = GameState::Running;
    let mut tick: u64 = 0;
    let mut deaths = 0u32;
    let mut contacts = 0usize;

    // Feed the clock one display frame at a time, as a windowed host would.
    while state == GameState::Running && tick < args.ticks {
        for _ in 0..clock.advance(config.physics.fixed_delta_time) {
            input = input.next(script.keys_at(tick).iter().copied());
            let report = step(&mut world, &input);
            contacts += report.collisions.len();
            tick += 1;

            for event in &report.events {
                match event {
                    GameEvent::PlayerDied => {
                        deaths += 1;
                        log::info!("tick {}: player died", tick);
                    }
                    GameEvent::GameOver => state = GameState::GameOver,
                    GameEvent::LevelComplete => state = GameState::LevelComplete,
                }
            }

            follow_character(&mut world);
            if let Ok(queue) = world.resource_mut::<SoundQueue>() {
                for sound in queue.drain() {
                    log::debug!("tick {}: sound {:?}", tick, sound);
                }
            }

            if state != GameState::Running || tick >= args.ticks {
                break;
            }
        }
    }

    let lives = world.resource::<Life>().map(|life| life.count).unwrap_or_default();
    log::info!(
        "finished after {} ticks: {:?}, {} deaths, {} lives left, {} contacts, {} entities",
        tick,
        state,
        deaths,
        lives,
        contacts,
        world.len()
    );
    Ok(())
}

/// Keep the camera on the live character. Smoothing and dead zones belong to
/// the renderer; the headless runner snaps.
fn follow_character(world: &mut World) {
    let Some(hero) = world.first::<(&Character, &Position)>() else {
        return;
    };
    let Ok(pos) = world.copied::<Position>(hero) else {
        return;
    };
    if let Ok(camera) = world.resource_mut::<Camera>() {
        camera.target = Some(hero);
        let half = camera.viewport / 2.0;
        camera.look_at(pos.0 - half);
    }
}
