use std::f32::consts::PI;

use glam::Vec2;

use crate::audio::SoundQueue;
use crate::camera::Camera;
use crate::components::{Life, Surface, SurfaceKind};
use crate::config::GameConfig;
use crate::ecs::{EntityId, World, WorldError};
use crate::scene::prefabs::{
    spawn_cannon, spawn_character, spawn_level_finish, spawn_platform, spawn_slope, spawn_spike,
    spawn_start_point, spawn_wall, CharacterPrefab,
};

const START: Vec2 = Vec2::new(24.0, 320.0);
const FLOOR_Y: f32 = 360.0;
const FLOOR_THICKNESS: f32 = 40.0;
const LIVES: i32 = 3;

/// Build the demo level: a floor strip that cycles through every surface
/// type, a ramp, a spike pit, a cannon guarding the finish, and the
/// resources the tick needs. Returns the player character.
pub fn load_demo_level(world: &mut World, config: &GameConfig) -> Result<EntityId, WorldError> {
    world.set_resource(config.physics.clone());
    world.set_resource(config.character.clone());
    world.set_resource(config.bounds);
    world.set_resource(Life::new(LIVES));
    world.set_resource(SoundQueue::default());
    world.set_resource(CharacterPrefab::default());

    let mut camera = Camera::new(config.bounds.width / 2.0, config.bounds.height / 2.0);
    camera.set_bounds(Vec2::ZERO, Vec2::new(config.bounds.width, config.bounds.height));

    // Boundary walls
    spawn_wall(world, -16.0, 0.0, 16.0, config.bounds.height)?;
    spawn_wall(world, config.bounds.width, 0.0, 16.0, config.bounds.height)?;

    // Floor strip, left to right
    let strip = [
        (0.0, 160.0, Surface::new(SurfaceKind::Normal)),
        (160.0, 120.0, Surface::new(SurfaceKind::Ice)),
        (280.0, 80.0, Surface::new(SurfaceKind::Rough)),
        (400.0, 120.0, Surface::conveyor(1.0, Vec2::X)),
        (520.0, 80.0, Surface::new(SurfaceKind::Bouncy)),
        (600.0, 200.0, Surface::new(SurfaceKind::Sticky)),
    ];
    for (x, width, surface) in strip {
        spawn_platform(world, x, FLOOR_Y, width, FLOOR_THICKNESS, surface)?;
    }

    // Spike pit between the rough and conveyor sections
    spawn_wall(world, 360.0, FLOOR_Y + 16.0, 40.0, FLOOR_THICKNESS - 16.0)?;
    spawn_spike(world, 360.0, FLOOR_Y + 8.0, 2)?;

    // Ramp up onto a ledge over the ice
    spawn_slope(world, 180.0, FLOOR_Y - 24.0, 48.0, 0.46, SurfaceKind::Normal)?;
    spawn_platform(world, 228.0, FLOOR_Y - 24.0, 52.0, 24.0, Surface::new(SurfaceKind::Normal).platform())?;

    // Cannon on a pillar, firing left across the bouncy pad
    spawn_wall(world, 680.0, FLOOR_Y - 48.0, 16.0, 48.0)?;
    spawn_cannon(world, 680.0, FLOOR_Y - 64.0, PI)?;

    spawn_level_finish(world, config.bounds.width - 32.0, FLOOR_Y - 40.0, 24.0, 40.0)?;
    spawn_start_point(world, START.x, START.y)?;
    let hero = spawn_character(world, START)?;

    camera = camera.with_target(hero);
    camera.look_at(START - camera.viewport / 2.0);
    world.set_resource(camera);

    log::info!("demo level loaded with {} entities", world.len());
    Ok(hero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Cannon, Character, LevelFinish, Spike, StartPoint};

    #[test]
    fn demo_level_has_every_gameplay_piece() {
        let mut world = World::new();
        let hero = load_demo_level(&mut world, &GameConfig::default()).unwrap();

        assert_eq!(world.entities::<&Character>(), vec![hero]);
        assert_eq!(world.entities::<&StartPoint>().len(), 1);
        assert_eq!(world.entities::<&LevelFinish>().len(), 1);
        assert_eq!(world.entities::<&Cannon>().len(), 1);
        assert!(!world.entities::<&Spike>().is_empty());
        assert_eq!(world.resource::<Life>().unwrap().count, LIVES);
        assert_eq!(world.resource::<Camera>().unwrap().target, Some(hero));
    }
}
