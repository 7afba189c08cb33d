use glam::Vec2;

use crate::audio::{self, Sound};
use crate::components::{Cannon, Character, Collision, PhysicsBody, Position, Projectile, Sprite, Velocity};
use crate::ecs::{EntityId, World, WorldError};
use crate::geometry::Shape;
use crate::scene::prefabs::PROJECTILE_SPRITE;

use super::collision::{apply_projectile_impulse, CollisionResult};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const PROJECTILE_SIZE: f32 = 8.0;
/// Offset from a cannon's position to its muzzle pivot.
const CANNON_CENTER: Vec2 = Vec2::new(8.0, 4.0);
/// Distance from the pivot at which shots appear.
const SPAWN_DISTANCE: f32 = 12.0;
/// Speed below which a projectile freezes in place.
const STATIONARY_THRESHOLD: f32 = 0.5;
/// Fraction of its speed a projectile keeps after hitting something dynamic.
const HIT_DAMPING: f32 = 0.1;
/// How far outside the world bounds a projectile may drift before removal.
const OFFSCREEN_MARGIN: f32 = 50.0;

// ---------------------------------------------------------------------------
// Cannons
// ---------------------------------------------------------------------------

/// Advance every active cannon's timers and fire when due.
///
/// A volley starts when `frames_since_last_shot` reaches `fire_rate`. With
/// `burst_count > 1` the remaining shots follow every `burst_delay` ticks, and
/// the fire-rate timer only starts counting again once the volley is done.
pub fn update_cannons(world: &mut World) {
    for id in world.entities::<(&Cannon, &Position)>() {
        let Ok(mut cannon) = world.copied::<Cannon>(id) else {
            continue;
        };
        if !cannon.active {
            continue;
        }
        let Ok(pos) = world.copied::<Position>(id) else {
            continue;
        };

        let fire = if cannon.current_burst > 0 {
            cannon.frames_since_last_burst += 1;
            if cannon.frames_since_last_burst >= cannon.burst_delay {
                cannon.frames_since_last_burst = 0;
                cannon.current_burst -= 1;
                true
            } else {
                false
            }
        } else {
            cannon.frames_since_last_shot += 1;
            if cannon.frames_since_last_shot >= cannon.fire_rate {
                cannon.frames_since_last_shot = 0;
                cannon.frames_since_last_burst = 0;
                cannon.current_burst = cannon.burst_count.saturating_sub(1);
                true
            } else {
                false
            }
        };
        let _ = world.set_component(id, cannon);

        if fire {
            let direction = Vec2::from_angle(cannon.direction);
            let spawn_at = pos.0 + CANNON_CENTER + direction * SPAWN_DISTANCE;
            match spawn_projectile(world, spawn_at, direction * cannon.projectile_speed, cannon.projectile_mass) {
                Ok(shot) => log::debug!("cannon {} fired {}", id, shot),
                Err(err) => log::warn!("cannon {} failed to fire: {}", id, err),
            }
            audio::play(world, Sound::CannonShot);
        }
    }
}

/// Spawn an 8×8 cannon ball with its top-left corner at `pos`.
pub fn spawn_projectile(world: &mut World, pos: Vec2, velocity: Vec2, mass: f32) -> Result<EntityId, WorldError> {
    let id = world.create_entity();
    world.set_component(id, Position(pos))?;
    world.set_component(id, Sprite::new(PROJECTILE_SPRITE))?;
    world.set_component(
        id,
        Collision::new(Shape::rect(pos.x, pos.y, PROJECTILE_SIZE, PROJECTILE_SIZE)),
    )?;
    world.set_component(id, Velocity(velocity))?;
    world.set_component(
        id,
        PhysicsBody {
            bounciness: 0.0,
            ..PhysicsBody::projectile(mass)
        },
    )?;
    world.set_component(id, Projectile::for_mass(mass))?;
    Ok(id)
}

// ---------------------------------------------------------------------------
// Projectile lifecycle
// ---------------------------------------------------------------------------

/// Apply hit rules to every contact this tick that involves a projectile.
///
/// Static targets absorb the projectile. Characters are left to ordinary
/// physics. Anything else is knocked back, and the projectile loses most of
/// its speed.
pub fn handle_projectile_collisions(world: &mut World, collisions: &[CollisionResult]) {
    for contact in collisions {
        let (projectile, target) = if world.has::<Projectile>(contact.entity_a) {
            (contact.entity_a, contact.entity_b)
        } else if world.has::<Projectile>(contact.entity_b) {
            (contact.entity_b, contact.entity_a)
        } else {
            continue;
        };
        let Ok(proj) = world.copied::<Projectile>(projectile) else {
            continue;
        };
        if proj.is_stationary {
            continue;
        }

        let target_is_static = world
            .copied::<PhysicsBody>(target)
            .is_ok_and(|body| body.is_static());
        if target_is_static {
            despawn(world, projectile);
            continue;
        }
        if world.has::<Character>(target) {
            continue;
        }

        audio::play(world, Sound::ProjectileHit);
        if let Ok(vel) = world.copied::<Velocity>(projectile) {
            if vel.0.length() >= proj.min_speed_for_impulse {
                apply_projectile_impulse(world, projectile, target, proj.impulse_magnitude);
                let _ = world.set_component(projectile, Velocity(vel.0 * HIT_DAMPING));
            }
        }

        if proj.destroy_on_hit {
            despawn(world, projectile);
        }
    }
}

/// Freeze projectiles that have come to rest and count lifetimes down.
pub fn update_projectile_lifetime(world: &mut World) {
    for id in world.entities::<&Projectile>() {
        let Ok(mut proj) = world.copied::<Projectile>(id) else {
            continue;
        };

        if !proj.is_stationary {
            let slow = world
                .copied::<Velocity>(id)
                .is_ok_and(|vel| vel.0.length() < STATIONARY_THRESHOLD);
            if slow {
                proj.is_stationary = true;
                if let Ok(mut body) = world.get_mut::<PhysicsBody>(id) {
                    body.gravity_scale = 0.0;
                    body.is_kinematic = true;
                }
                let _ = world.set_component(id, Velocity(Vec2::ZERO));
                log::trace!("projectile {} came to rest", id);
            }
        }

        // Negative lifetime never expires.
        if proj.lifetime >= 0 {
            proj.lifetime -= 1;
            if proj.lifetime <= 0 {
                despawn(world, id);
                continue;
            }
        }
        let _ = world.set_component(id, proj);
    }
}

/// Remove projectiles that left the `width`×`height` playfield by more than
/// a small margin.
pub fn cleanup_offscreen_projectiles(world: &mut World, width: f32, height: f32) {
    for id in world.entities::<(&Projectile, &Position)>() {
        let Ok(pos) = world.copied::<Position>(id) else {
            continue;
        };
        let p = pos.0;
        if p.x < -OFFSCREEN_MARGIN
            || p.x > width + OFFSCREEN_MARGIN
            || p.y < -OFFSCREEN_MARGIN
            || p.y > height + OFFSCREEN_MARGIN
        {
            despawn(world, id);
        }
    }
}

fn despawn(world: &mut World, id: EntityId) {
    if let Err(err) = world.destroy_entity(id) {
        log::debug!("projectile already gone: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundQueue;

    fn contact(a: EntityId, b: EntityId) -> CollisionResult {
        CollisionResult {
            entity_a: a,
            entity_b: b,
            mtv: Vec2::new(-1.0, 0.0),
            normal: Vec2::new(-1.0, 0.0),
            penetration: 1.0,
        }
    }

    fn spawn_target(world: &mut World, pos: Vec2, body: PhysicsBody) -> EntityId {
        let id = world.create_entity();
        world.set_component(id, Position(pos)).unwrap();
        world.set_component(id, Velocity(Vec2::ZERO)).unwrap();
        world.set_component(id, body).unwrap();
        id
    }

    #[test]
    fn cannon_fires_on_period_from_muzzle() {
        let mut world = World::new();
        world.set_resource(SoundQueue::default());
        let cannon = world.create_entity();
        world.set_component(cannon, Position(Vec2::new(100.0, 50.0))).unwrap();
        world
            .set_component(cannon, Cannon {
                fire_rate: 3,
                projectile_speed: 4.0,
                projectile_mass: 2.0,
                ..Cannon::aimed(0.0)
            })
            .unwrap();

        update_cannons(&mut world);
        update_cannons(&mut world);
        assert!(world.entities::<&Projectile>().is_empty());
        update_cannons(&mut world);

        let shots = world.entities::<&Projectile>();
        assert_eq!(shots.len(), 1);
        let shot = shots[0];
        assert_eq!(world.copied::<Position>(shot).unwrap().0, Vec2::new(120.0, 54.0));
        assert_eq!(world.copied::<Velocity>(shot).unwrap().0, Vec2::new(4.0, 0.0));
        let proj = world.copied::<Projectile>(shot).unwrap();
        assert_eq!(proj.impulse_magnitude, 6.0);
        assert_eq!(proj.lifetime, 300);
        assert_eq!(world.copied::<PhysicsBody>(shot).unwrap().bounciness, 0.0);
        assert_eq!(world.resource::<SoundQueue>().unwrap().pending(), &[Sound::CannonShot]);
    }

    #[test]
    fn inactive_cannon_stays_quiet() {
        let mut world = World::new();
        let cannon = world.create_entity();
        world.set_component(cannon, Position(Vec2::ZERO)).unwrap();
        world
            .set_component(cannon, Cannon {
                fire_rate: 1,
                active: false,
                ..Cannon::default()
            })
            .unwrap();
        update_cannons(&mut world);
        assert!(world.entities::<&Projectile>().is_empty());
    }

    #[test]
    fn burst_fires_follow_up_shots() {
        let mut world = World::new();
        let cannon = world.create_entity();
        world.set_component(cannon, Position(Vec2::ZERO)).unwrap();
        world
            .set_component(cannon, Cannon {
                fire_rate: 2,
                burst_count: 3,
                burst_delay: 2,
                ..Cannon::default()
            })
            .unwrap();

        let mut fired_on = Vec::new();
        for tick in 1..=8 {
            let before = world.entities::<&Projectile>().len();
            update_cannons(&mut world);
            if world.entities::<&Projectile>().len() > before {
                fired_on.push(tick);
            }
        }
        // Volley at 2, follow-ups at 4 and 6, next volley two ticks later.
        assert_eq!(fired_on, vec![2, 4, 6, 8]);
    }

    #[test]
    fn static_target_destroys_projectile() {
        let mut world = World::new();
        let shot = spawn_projectile(&mut world, Vec2::ZERO, Vec2::new(5.0, 0.0), 1.0).unwrap();
        let wall = spawn_target(&mut world, Vec2::new(8.0, 0.0), PhysicsBody::static_body());
        handle_projectile_collisions(&mut world, &[contact(shot, wall)]);
        assert!(!world.contains(shot));
        assert!(world.contains(wall));
    }

    #[test]
    fn dynamic_target_is_pushed_and_shot_slowed() {
        let mut world = World::new();
        world.set_resource(SoundQueue::default());
        let target = spawn_target(&mut world, Vec2::new(10.0, 0.0), PhysicsBody::default());
        let shot = spawn_projectile(&mut world, Vec2::ZERO, Vec2::new(5.0, 0.0), 1.0).unwrap();

        handle_projectile_collisions(&mut world, &[contact(target, shot)]);

        assert_eq!(world.copied::<Velocity>(target).unwrap().0, Vec2::new(3.0, 0.0));
        assert_eq!(world.copied::<Velocity>(shot).unwrap().0, Vec2::new(0.5, 0.0));
        assert_eq!(world.resource::<SoundQueue>().unwrap().pending(), &[Sound::ProjectileHit]);
    }

    #[test]
    fn characters_are_not_hit_specially() {
        let mut world = World::new();
        let hero = spawn_target(&mut world, Vec2::new(10.0, 0.0), PhysicsBody::default());
        world.set_component(hero, Character::default()).unwrap();
        let shot = spawn_projectile(&mut world, Vec2::ZERO, Vec2::new(5.0, 0.0), 1.0).unwrap();
        handle_projectile_collisions(&mut world, &[contact(shot, hero)]);
        assert_eq!(world.copied::<Velocity>(hero).unwrap().0, Vec2::ZERO);
        assert_eq!(world.copied::<Velocity>(shot).unwrap().0, Vec2::new(5.0, 0.0));
    }

    #[test]
    fn slow_projectile_freezes_once() {
        let mut world = World::new();
        let shot = spawn_projectile(&mut world, Vec2::ZERO, Vec2::new(0.2, 0.1), 1.0).unwrap();
        update_projectile_lifetime(&mut world);
        let proj = world.copied::<Projectile>(shot).unwrap();
        assert!(proj.is_stationary);
        assert_eq!(proj.lifetime, 299);
        let body = world.copied::<PhysicsBody>(shot).unwrap();
        assert!(body.is_kinematic);
        assert_eq!(body.gravity_scale, 0.0);
        assert_eq!(world.copied::<Velocity>(shot).unwrap().0, Vec2::ZERO);
    }

    #[test]
    fn infinite_lifetime_never_expires() {
        let mut world = World::new();
        let shot = spawn_projectile(&mut world, Vec2::ZERO, Vec2::new(5.0, 0.0), 1.0).unwrap();
        world.get_mut::<Projectile>(shot).unwrap().lifetime = -1;
        for _ in 0..500 {
            update_projectile_lifetime(&mut world);
        }
        assert_eq!(world.copied::<Projectile>(shot).unwrap().lifetime, -1);
    }

    #[test]
    fn offscreen_projectiles_are_removed() {
        let mut world = World::new();
        let inside = spawn_projectile(&mut world, Vec2::new(-40.0, 10.0), Vec2::ZERO, 1.0).unwrap();
        let outside = spawn_projectile(&mut world, Vec2::new(10.0, 460.0), Vec2::ZERO, 1.0).unwrap();
        cleanup_offscreen_projectiles(&mut world, 800.0, 400.0);
        assert!(world.contains(inside));
        assert!(!world.contains(outside));
    }
}
