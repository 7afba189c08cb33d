use crate::audio::{self, Sound};
use crate::config::{CharacterTuning, PhysicsConfig, WorldBounds};
use crate::ecs::World;
use crate::engine::input::InputState;

use super::collision::{apply_velocity_with_collisions, CollisionResult};
use super::hazards::{apply_level_finish, apply_spikes, is_game_over};
use super::physics::{apply_accumulated, apply_conveyor_belt, apply_friction, apply_gravity, apply_slope_gravity};
use super::player::{move_character, update_character_state};
use super::projectile::{
    cleanup_offscreen_projectiles, handle_projectile_collisions, update_cannons, update_projectile_lifetime,
};

/// Game-flow outcomes the host reacts to (menus, level transitions).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PlayerDied,
    /// Raised on the tick the last life is spent.
    GameOver,
    LevelComplete,
}

/// Everything a tick produced besides the mutated world.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub collisions: Vec<CollisionResult>,
    pub events: Vec<GameEvent>,
}

impl TickReport {
    pub fn has(&self, event: GameEvent) -> bool {
        self.events.contains(&event)
    }
}

/// Run one fixed simulation tick.
///
/// Tuning is read from the [`PhysicsConfig`], [`CharacterTuning`] and
/// [`WorldBounds`] resources, falling back to defaults for any that are
/// missing.
pub fn step(world: &mut World, input: &InputState) -> TickReport {
    let cfg = world.resource::<PhysicsConfig>().cloned().unwrap_or_default();
    let tuning = world.resource::<CharacterTuning>().cloned().unwrap_or_default();
    let bounds = world.resource::<WorldBounds>().copied().unwrap_or_default();
    let mut events = Vec::new();

    // 1. Intent and spawns
    move_character(world, input, &tuning);
    update_cannons(world);

    // 2. Forces
    apply_gravity(world, &cfg);
    apply_accumulated(world, &cfg);

    // 3. Integration and contacts
    let collisions = apply_velocity_with_collisions(world, &cfg);
    handle_projectile_collisions(world, &collisions);

    // 4. Hazards
    if apply_spikes(world) {
        events.push(GameEvent::PlayerDied);
        if is_game_over(world) {
            log::info!("game over");
            audio::play(world, Sound::GameOver);
            events.push(GameEvent::GameOver);
        }
    }
    update_character_state(world);

    // 5. Surface response
    apply_slope_gravity(world, &cfg);
    apply_friction(world, &cfg);
    apply_conveyor_belt(world);

    // 6. Projectile lifecycle
    update_projectile_lifetime(world);
    cleanup_offscreen_projectiles(world, bounds.width, bounds.height);

    if apply_level_finish(world) {
        audio::play(world, Sound::LevelComplete);
        events.push(GameEvent::LevelComplete);
    }

    TickReport { collisions, events }
}
