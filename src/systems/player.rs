use glam::Vec2;

use crate::components::{Character, CharacterFsm, CharacterState, PhysicsBody, Sprite, Velocity};
use crate::config::CharacterTuning;
use crate::ecs::World;
use crate::engine::input::InputState;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Grounded characters slower than this read as standing still.
const RUN_THRESHOLD: f32 = 0.1;

// ---------------------------------------------------------------------------
// CharacterState transition logic
// ---------------------------------------------------------------------------

impl CharacterState {
    /// State implied by this tick's contacts and motion. Screen space: a
    /// negative `velocity.y` is rising.
    pub fn from_motion(grounded: bool, velocity: Vec2) -> Self {
        match (grounded, velocity) {
            (true, v) if v.x.abs() > RUN_THRESHOLD => Self::Running,
            (true, _) => Self::Idle,
            (false, v) if v.y < 0.0 => Self::Jumping,
            (false, _) => Self::Falling,
        }
    }
}

// ---------------------------------------------------------------------------
// Systems
// ---------------------------------------------------------------------------

/// Turn held keys into intent for the lowest-id character.
///
/// Left/right queue a horizontal force of `move_speed * mass` on the body's
/// accumulator. Jump (Space or Up) sets the vertical velocity outright, and
/// only while grounded.
pub fn move_character(world: &mut World, input: &InputState, tuning: &CharacterTuning) {
    let Some(id) = world.first::<(&Character, &PhysicsBody, &Velocity)>() else {
        return;
    };

    let grounded = {
        let Ok(mut body) = world.get_mut::<PhysicsBody>(id) else {
            return;
        };
        let axis = input.horizontal_axis();
        if axis != 0.0 {
            let force = Vec2::new(axis * tuning.move_speed * body.mass, 0.0);
            body.add_force(force);
        }
        body.is_grounded
    };

    if grounded && input.jump_requested() {
        if let Ok(mut vel) = world.get_mut::<Velocity>(id) {
            vel.0.y = -tuning.jump_speed;
        }
        log::debug!("character {} jumped", id);
    }
}

/// Advance each character's FSM from its body state and swap the sprite
/// between the grounded and jumping handles.
pub fn update_character_state(world: &mut World) {
    for id in world.entities::<(&Character, &PhysicsBody)>() {
        let Ok(body) = world.copied::<PhysicsBody>(id) else {
            continue;
        };
        let velocity = world.copied::<Velocity>(id).map_or(Vec2::ZERO, |v| v.0);
        let next = CharacterState::from_motion(body.is_grounded, velocity);

        if let Ok(mut fsm) = world.get_mut::<CharacterFsm>(id) {
            fsm.tick();
            if fsm.go(next) {
                log::debug!("character {}: {:?} -> {:?}", id, fsm.previous, fsm.state);
            }
        }

        let Ok(character) = world.copied::<Character>(id) else {
            continue;
        };
        let (Some(grounded_sprite), Some(jumping_sprite)) =
            (character.grounded_sprite, character.jumping_sprite)
        else {
            continue;
        };
        let target = if body.is_grounded {
            grounded_sprite
        } else {
            jumping_sprite
        };
        if let Ok(mut sprite) = world.get_mut::<Sprite>(id) {
            if sprite.handle != target {
                sprite.handle = target;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Position, SpriteHandle};
    use crate::engine::input::Key;

    fn spawn_character(world: &mut World, grounded: bool) -> crate::ecs::EntityId {
        let id = world.create_entity();
        world.set_component(id, Position(Vec2::ZERO)).unwrap();
        world.set_component(id, Velocity(Vec2::ZERO)).unwrap();
        world
            .set_component(id, PhysicsBody {
                mass: 2.0,
                is_grounded: grounded,
                ..PhysicsBody::default()
            })
            .unwrap();
        world
            .set_component(id, Character {
                grounded_sprite: Some(SpriteHandle(1)),
                jumping_sprite: Some(SpriteHandle(2)),
            })
            .unwrap();
        world.set_component(id, CharacterFsm::new(CharacterState::Idle)).unwrap();
        world.set_component(id, Sprite::new(SpriteHandle(1))).unwrap();
        id
    }

    fn held(keys: &[Key]) -> InputState {
        InputState::new().next(keys.iter().copied())
    }

    #[test]
    fn horizontal_input_accumulates_force() {
        let mut world = World::new();
        let id = spawn_character(&mut world, true);
        move_character(&mut world, &held(&[Key::Right]), &CharacterTuning::default());
        // force = 0.5 * mass, acceleration = force / mass
        assert_eq!(world.copied::<PhysicsBody>(id).unwrap().acceleration, Vec2::new(0.5, 0.0));
        assert_eq!(world.copied::<Velocity>(id).unwrap().0, Vec2::ZERO);
    }

    #[test]
    fn jump_only_when_grounded() {
        let tuning = CharacterTuning::default();
        let mut world = World::new();
        let airborne = spawn_character(&mut world, false);
        move_character(&mut world, &held(&[Key::Space]), &tuning);
        assert_eq!(world.copied::<Velocity>(airborne).unwrap().0.y, 0.0);

        world.get_mut::<PhysicsBody>(airborne).unwrap().is_grounded = true;
        move_character(&mut world, &held(&[Key::Up]), &tuning);
        assert_eq!(world.copied::<Velocity>(airborne).unwrap().0.y, -tuning.jump_speed);
    }

    #[test]
    fn state_follows_motion_and_swaps_sprite() {
        let mut world = World::new();
        let id = spawn_character(&mut world, true);
        world.set_component(id, Velocity(Vec2::new(2.0, 0.0))).unwrap();
        update_character_state(&mut world);
        assert_eq!(world.get::<CharacterFsm>(id).unwrap().state, CharacterState::Running);

        world.get_mut::<PhysicsBody>(id).unwrap().is_grounded = false;
        world.set_component(id, Velocity(Vec2::new(0.0, -3.0))).unwrap();
        update_character_state(&mut world);
        let fsm = world.get::<CharacterFsm>(id).unwrap();
        assert_eq!(fsm.state, CharacterState::Jumping);
        assert!(fsm.just_entered());
        drop(fsm);
        assert_eq!(world.get::<Sprite>(id).unwrap().handle, SpriteHandle(2));
    }

    #[test]
    fn from_motion_covers_all_states() {
        assert_eq!(CharacterState::from_motion(true, Vec2::ZERO), CharacterState::Idle);
        assert_eq!(CharacterState::from_motion(false, Vec2::new(0.0, 1.0)), CharacterState::Falling);
    }
}
