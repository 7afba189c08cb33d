use glam::Vec2;

use crate::audio::{self, Sound};
use crate::components::{
    Character, CharacterFsm, Collision, Corpse, LevelFinish, Life, PhysicsBody, Position, Spike, Sprite,
    StartPoint, Velocity,
};
use crate::ecs::{EntityId, World, WorldError};
use crate::geometry::Shape;
use crate::scene::prefabs::{spawn_character, CharacterPrefab};

/// Kill the first character found overlapping a spike. At most one death per
/// call; returns whether it happened.
pub fn apply_spikes(world: &mut World) -> bool {
    let Some((character, spike)) = first_overlap::<Spike>(world) else {
        return false;
    };
    log::info!("character {} hit spike {}", character, spike);
    if let Err(err) = kill_character(world, character) {
        log::warn!("failed to kill character {}: {}", character, err);
    }
    true
}

/// Whether any character overlaps a level-finish trigger.
pub fn apply_level_finish(world: &mut World) -> bool {
    match first_overlap::<LevelFinish>(world) {
        Some((character, finish)) => {
            log::info!("character {} reached finish {}", character, finish);
            true
        }
        None => false,
    }
}

/// True once a [`Life`] counter exists and has run out. Worlds without one
/// have unlimited lives.
pub fn is_game_over(world: &World) -> bool {
    world.resource::<Life>().is_ok_and(|life| life.is_exhausted())
}

fn first_overlap<T: hecs::Component>(world: &World) -> Option<(EntityId, EntityId)> {
    let characters = world.entities::<(&Character, &Collision)>();
    let targets = world.entities::<(&T, &Collision)>();
    for &character in &characters {
        let Ok(character_col) = world.get::<Collision>(character) else {
            continue;
        };
        for &target in &targets {
            let Ok(target_col) = world.get::<Collision>(target) else {
                continue;
            };
            if character_col.shape.intersects(&target_col.shape) {
                return Some((character, target));
            }
        }
    }
    None
}

/// Turn a character into a corpse in place and respawn a new one.
///
/// The entity keeps its id: character, velocity and movement state are
/// removed, and it becomes static level geometry dropped onto whatever killed
/// it. One life is spent. Returns the fresh character, if there was a
/// start point to spawn it at.
pub fn kill_character(world: &mut World, id: EntityId) -> Result<Option<EntityId>, WorldError> {
    let pos = world.copied::<Position>(id)?.0;

    audio::play(world, Sound::Death);
    if let Ok(life) = world.resource_mut::<Life>() {
        life.count -= 1;
        log::info!("lives left: {}", life.count);
    }

    let prefab = world
        .resource::<CharacterPrefab>()
        .cloned()
        .unwrap_or_default();

    for removed in [
        world.remove_component::<Character>(id).err(),
        world.remove_component::<Velocity>(id).err(),
        world.remove_component::<CharacterFsm>(id).err(),
    ]
    .into_iter()
    .flatten()
    {
        log::debug!("while killing {}: {}", id, removed);
    }

    let corpse_pos = Vec2::new(pos.x, pos.y + prefab.corpse_drop);
    world.set_component(id, Corpse { durability: prefab.corpse_durability })?;
    world.set_component(id, Sprite::new(prefab.dead_sprite))?;
    world.set_component(
        id,
        Collision::new(Shape::rect(
            corpse_pos.x,
            corpse_pos.y,
            prefab.corpse_size.x,
            prefab.corpse_size.y,
        )),
    )?;
    world.set_component(id, Position(corpse_pos))?;
    world.set_component(id, PhysicsBody::static_body())?;

    let Some(start) = world.first::<(&StartPoint, &Position)>() else {
        log::warn!("no start point, character {} not respawned", id);
        return Ok(None);
    };
    let start_pos = world.copied::<Position>(start)?.0;
    spawn_character(world, start_pos).map(Some)
}
