use glam::Vec2;

use crate::components::*;
use crate::ecs::{EntityId, World, WorldError};
use crate::geometry::{ConvexPolygon, Shape};

// ---------------------------------------------------------------------------
// Sprite handles
// ---------------------------------------------------------------------------

pub const HERO_SPRITE: SpriteHandle = SpriteHandle(1);
pub const HERO_JUMP_SPRITE: SpriteHandle = SpriteHandle(2);
pub const DEAD_HERO_SPRITE: SpriteHandle = SpriteHandle(3);
pub const WALL_SPRITE: SpriteHandle = SpriteHandle(4);
pub const SPIKE_SPRITE: SpriteHandle = SpriteHandle(5);
pub const CANNON_SPRITE: SpriteHandle = SpriteHandle(6);
pub const PROJECTILE_SPRITE: SpriteHandle = SpriteHandle(7);
pub const FINISH_SPRITE: SpriteHandle = SpriteHandle(8);

// ---------------------------------------------------------------------------
// Character prefab
// ---------------------------------------------------------------------------

/// Everything needed to spawn a character and to turn one into a corpse.
/// Stored as a World resource so respawning after death uses the level's
/// choice; [`CharacterPrefab::default`] is used when it is absent.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterPrefab {
    /// Collision size of a living character.
    pub size: Vec2,
    pub body: PhysicsBody,
    pub grounded_sprite: SpriteHandle,
    pub jumping_sprite: SpriteHandle,

    pub dead_sprite: SpriteHandle,
    pub corpse_size: Vec2,
    /// How far the corpse drops below the character's last position, so it
    /// ends up impaled on whatever killed it.
    pub corpse_drop: f32,
    pub corpse_durability: u32,
}

impl Default for CharacterPrefab {
    fn default() -> Self {
        Self {
            // 24×24 art drawn at half scale.
            size: Vec2::new(12.0, 12.0),
            body: PhysicsBody {
                mass: 1.0,
                friction: 0.3,
                air_drag: 0.15,
                gravity_scale: 1.0,
                max_speed: 20.0,
                ..PhysicsBody::default()
            },
            grounded_sprite: HERO_SPRITE,
            jumping_sprite: HERO_JUMP_SPRITE,
            dead_sprite: DEAD_HERO_SPRITE,
            corpse_size: Vec2::new(24.0, 24.0),
            corpse_drop: 12.0,
            corpse_durability: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// Factories
// ---------------------------------------------------------------------------

/// Spawn the player character with its top-left corner at `pos`.
pub fn spawn_character(world: &mut World, pos: Vec2) -> Result<EntityId, WorldError> {
    let prefab = world
        .resource::<CharacterPrefab>()
        .cloned()
        .unwrap_or_default();

    let id = world.create_entity();
    world.set_component(id, Position(pos))?;
    world.set_component(id, Velocity(Vec2::ZERO))?;
    world.set_component(
        id,
        Collision::new(Shape::rect(pos.x, pos.y, prefab.size.x, prefab.size.y)),
    )?;
    world.set_component(id, prefab.body)?;
    world.set_component(
        id,
        Character {
            grounded_sprite: Some(prefab.grounded_sprite),
            jumping_sprite: Some(prefab.jumping_sprite),
        },
    )?;
    world.set_component(id, CharacterFsm::new(CharacterState::Falling))?;
    world.set_component(id, Sprite { handle: prefab.grounded_sprite, z_index: 10 })?;

    log::debug!("spawned character {} at {:?}", id, pos);
    Ok(id)
}

/// Static axis-aligned block.
pub fn spawn_wall(world: &mut World, x: f32, y: f32, width: f32, height: f32) -> Result<EntityId, WorldError> {
    let id = world.create_entity();
    world.set_component(id, Position(Vec2::new(x, y)))?;
    world.set_component(id, Collision::new(Shape::rect(x, y, width, height)))?;
    world.set_component(id, PhysicsBody::static_body())?;
    world.set_component(id, Sprite::new(WALL_SPRITE))?;
    Ok(id)
}

/// Static block with contact-surface behavior (ice, conveyor, ...).
pub fn spawn_platform(
    world: &mut World,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    surface: Surface,
) -> Result<EntityId, WorldError> {
    let id = spawn_wall(world, x, y, width, height)?;
    world.set_component(id, surface)?;
    Ok(id)
}

/// Right-angled ramp rising toward +X over `width`, tilted by `angle` radians.
pub fn spawn_slope(
    world: &mut World,
    x: f32,
    y: f32,
    width: f32,
    angle: f32,
    kind: SurfaceKind,
) -> Result<EntityId, WorldError> {
    let rise = width * angle.tan();
    let points = vec![Vec2::new(0.0, rise), Vec2::new(width, 0.0), Vec2::new(width, rise)];

    let id = world.create_entity();
    world.set_component(id, Position(Vec2::new(x, y)))?;
    world.set_component(
        id,
        Collision::new(Shape::Polygon(ConvexPolygon::from_top_left(x, y, points))),
    )?;
    world.set_component(id, PhysicsBody::static_body())?;
    world.set_component(id, Surface::sloped(kind, angle))?;
    world.set_component(id, Sprite::new(WALL_SPRITE))?;
    Ok(id)
}

/// Lethal strip of `count` spike tiles laid out to the right.
pub fn spawn_spike(world: &mut World, x: f32, y: f32, count: u32) -> Result<EntityId, WorldError> {
    const TILE: Vec2 = Vec2::new(16.0, 8.0);
    let width = TILE.x * count.max(1) as f32;

    let id = world.create_entity();
    world.set_component(id, Position(Vec2::new(x, y)))?;
    world.set_component(id, Collision::new(Shape::rect(x, y, width, TILE.y)))?;
    world.set_component(id, Trigger)?;
    world.set_component(id, Spike)?;
    world.set_component(id, Sprite::new(SPIKE_SPRITE))?;
    Ok(id)
}

/// Turret firing along `direction` (radians, 0 = right).
pub fn spawn_cannon(world: &mut World, x: f32, y: f32, direction: f32) -> Result<EntityId, WorldError> {
    let id = world.create_entity();
    world.set_component(id, Position(Vec2::new(x, y)))?;
    world.set_component(
        id,
        Cannon {
            fire_rate: 120,
            projectile_speed: 15.0,
            projectile_mass: 15.0,
            ..Cannon::aimed(direction)
        },
    )?;
    world.set_component(id, Sprite::new(CANNON_SPRITE))?;
    Ok(id)
}

pub fn spawn_start_point(world: &mut World, x: f32, y: f32) -> Result<EntityId, WorldError> {
    let id = world.create_entity();
    world.set_component(id, Position(Vec2::new(x, y)))?;
    world.set_component(id, StartPoint)?;
    Ok(id)
}

pub fn spawn_level_finish(world: &mut World, x: f32, y: f32, width: f32, height: f32) -> Result<EntityId, WorldError> {
    let id = world.create_entity();
    world.set_component(id, Position(Vec2::new(x, y)))?;
    world.set_component(id, Collision::new(Shape::rect(x, y, width, height)))?;
    world.set_component(id, Trigger)?;
    world.set_component(id, LevelFinish)?;
    world.set_component(id, Sprite::new(FINISH_SPRITE))?;
    Ok(id)
}
