use glam::Vec2;

use crate::components::{Collision, PhysicsBody, Position, Surface, SurfaceKind, Velocity};
use crate::config::PhysicsConfig;
use crate::ecs::{EntityId, World};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// How far above a surface's top edge a body's bottom may sit and still count
/// as resting on it.
const CONTACT_ABOVE: f32 = 2.0;
/// How far below the top edge (sunk in) a body's bottom may sit.
const CONTACT_BELOW: f32 = 8.0;

/// Slopes never lose more than 90% of their slide to friction.
const MIN_SLIDE_FACTOR: f32 = 0.1;

// ---------------------------------------------------------------------------
// Force stages
// ---------------------------------------------------------------------------

/// Add gravity to every dynamic body with a non-zero gravity scale, then
/// clamp to terminal velocity and the body's max speed.
pub fn apply_gravity(world: &mut World, cfg: &PhysicsConfig) {
    for id in world.entities::<(&PhysicsBody, &Velocity)>() {
        let Ok(body) = world.copied::<PhysicsBody>(id) else {
            continue;
        };
        if body.is_static() || body.gravity_scale == 0.0 {
            continue;
        }
        let Ok(mut vel) = world.get_mut::<Velocity>(id) else {
            continue;
        };

        vel.0 += cfg.gravity * body.gravity_scale;
        if vel.0.y > cfg.terminal_velocity {
            vel.0.y = cfg.terminal_velocity;
        }
        if body.max_speed > 0.0 {
            vel.0 = vel.0.clamp_length_max(body.max_speed);
        }
    }
}

/// Fold each body's accumulated acceleration into its velocity and clear it.
pub fn apply_accumulated(world: &mut World, _cfg: &PhysicsConfig) {
    for id in world.entities::<(&PhysicsBody, &Velocity)>() {
        let Ok(mut body) = world.get_mut::<PhysicsBody>(id) else {
            continue;
        };
        if body.is_static() {
            continue;
        }
        let Ok(mut vel) = world.get_mut::<Velocity>(id) else {
            continue;
        };

        vel.0 += body.acceleration;
        if body.max_speed > 0.0 {
            vel.0 = vel.0.clamp_length_max(body.max_speed);
        }
        body.acceleration = Vec2::ZERO;
    }
}

// ---------------------------------------------------------------------------
// Contact-surface stages
// ---------------------------------------------------------------------------

/// Grounded bodies on a tilted surface slide toward −X in proportion to
/// gravity and how slippery the surface is.
pub fn apply_slope_gravity(world: &mut World, cfg: &PhysicsConfig) {
    for id in world.entities::<(&PhysicsBody, &Velocity, &Position)>() {
        let Ok(body) = world.copied::<PhysicsBody>(id) else {
            continue;
        };
        if !body.is_grounded || body.is_kinematic {
            continue;
        }
        let Some(surface) = find_contact_surface(world, id) else {
            continue;
        };
        if surface.slope_angle == 0.0 {
            continue;
        }

        let friction_factor = (1.0 - surface.friction).max(MIN_SLIDE_FACTOR);
        let slide = surface.slide_acceleration(cfg.gravity.y) * body.gravity_scale * friction_factor;
        if let Ok(mut vel) = world.get_mut::<Velocity>(id) {
            vel.0.x -= slide;
        }
    }
}

/// Ground friction for grounded bodies, air drag for airborne ones. Only the
/// horizontal component is affected.
pub fn apply_friction(world: &mut World, cfg: &PhysicsConfig) {
    for id in world.entities::<(&PhysicsBody, &Velocity)>() {
        let Ok(body) = world.copied::<PhysicsBody>(id) else {
            continue;
        };
        if body.is_kinematic {
            continue;
        }

        if body.is_grounded {
            let effective = match find_contact_surface(world, id) {
                Some(surface) => surface.effective_friction(body.friction),
                None => (body.friction * cfg.default_friction).sqrt(),
            };
            let Ok(mut vel) = world.get_mut::<Velocity>(id) else {
                continue;
            };
            vel.0.x *= 1.0 - effective;
            if vel.0.x.abs() < cfg.min_velocity {
                vel.0.x = 0.0;
            }
        } else if body.air_drag > 0.0 {
            if let Ok(mut vel) = world.get_mut::<Velocity>(id) {
                vel.0.x *= 1.0 - body.air_drag;
            }
        }
    }
}

/// Conveyor surfaces push whatever rests on them every tick.
pub fn apply_conveyor_belt(world: &mut World) {
    for id in world.entities::<(&PhysicsBody, &Velocity)>() {
        let Ok(body) = world.copied::<PhysicsBody>(id) else {
            continue;
        };
        if !body.is_grounded || body.is_kinematic {
            continue;
        }
        let Some(surface) = find_contact_surface(world, id) else {
            continue;
        };
        if surface.kind != SurfaceKind::Conveyor {
            continue;
        }
        if let Ok(mut vel) = world.get_mut::<Velocity>(id) {
            vel.0 += surface.conveyor_velocity();
        }
    }
}

/// Surface the entity is standing on: the lowest-id Surface entity that
/// overlaps it horizontally and whose top edge is within a few pixels of the
/// entity's bottom edge.
pub fn find_contact_surface(world: &World, id: EntityId) -> Option<Surface> {
    let size = world.get::<Collision>(id).ok()?.bounds().size();
    let pos = world.copied::<Position>(id).ok()?.0;
    let left = pos.x;
    let right = pos.x + size.x;
    let bottom = pos.y + size.y;

    for other in world.entities::<(&Surface, &Collision, &Position)>() {
        if other == id {
            continue;
        }
        let Ok(surface_pos) = world.copied::<Position>(other) else {
            continue;
        };
        let Ok(surface_size) = world.get::<Collision>(other).map(|c| c.bounds().size()) else {
            continue;
        };

        let surface_left = surface_pos.0.x;
        let surface_right = surface_pos.0.x + surface_size.x;
        let surface_top = surface_pos.0.y;

        let horizontal_overlap = right > surface_left && left < surface_right;
        let vertical_contact =
            bottom >= surface_top - CONTACT_ABOVE && bottom <= surface_top + CONTACT_BELOW;
        if horizontal_overlap && vertical_contact {
            if let Ok(surface) = world.get::<Surface>(other) {
                return Some(Surface::clone(&surface));
            }
        }
    }
    None
}
