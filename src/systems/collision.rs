use glam::Vec2;

use crate::components::{Collision, PhysicsBody, Position, Trigger, Velocity};
use crate::config::PhysicsConfig;
use crate::ecs::{EntityId, World};
use crate::math::UP;

use super::physics::find_contact_surface;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Closing speeds below this never bounce, which keeps resting contacts quiet.
const MIN_BOUNCE_VELOCITY: f32 = 1.0;
/// `|normal.y|` above this makes a contact count as floor/ceiling.
const VERTICAL_CONTACT: f32 = 0.5;
const MAX_SUBSTEPS: u32 = 16;
/// Extra upward kick, as a fraction of the impulse, for grounded targets.
const GROUNDED_LAUNCH_FACTOR: f32 = 0.3;

/// One overlapping pair found and resolved during integration.
///
/// `mtv` moves `entity_a` out of `entity_b`; `normal` is `mtv` normalized and
/// therefore points from B toward A. `entity_a` always has the lower id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    pub mtv: Vec2,
    pub normal: Vec2,
    pub penetration: f32,
}

impl CollisionResult {
    pub fn involves(&self, id: EntityId) -> bool {
        self.entity_a == id || self.entity_b == id
    }

    /// The entity on the other side of the contact from `id`.
    pub fn other(&self, id: EntityId) -> Option<EntityId> {
        if self.entity_a == id {
            Some(self.entity_b)
        } else if self.entity_b == id {
            Some(self.entity_a)
        } else {
            None
        }
    }
}

/// Number of sub-steps used by the most recent
/// [`apply_velocity_with_collisions`] call. Stored as a World resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastSubsteps(pub u32);

// ---------------------------------------------------------------------------
// Integration
// ---------------------------------------------------------------------------

/// Sub-steps needed so nothing moving at `max_speed` travels further than
/// `max_step_distance` per step.
pub fn substep_count(max_speed: f32, cfg: &PhysicsConfig) -> u32 {
    if cfg.max_step_distance > 0.0 && max_speed > cfg.max_step_distance {
        ((max_speed / cfg.max_step_distance).ceil() as u32).min(MAX_SUBSTEPS)
    } else {
        1
    }
}

fn fastest_speed(world: &World) -> f32 {
    world
        .entities::<&Velocity>()
        .into_iter()
        .filter_map(|id| world.copied::<Velocity>(id).ok())
        .map(|v| v.0.length())
        .fold(0.0, f32::max)
}

/// Move every entity by its velocity, splitting the tick into sub-steps when
/// something is fast enough to tunnel, and resolve overlaps after each step.
///
/// Grounded flags are cleared first and rebuilt from this tick's contacts.
pub fn apply_velocity_with_collisions(world: &mut World, cfg: &PhysicsConfig) -> Vec<CollisionResult> {
    let substeps = substep_count(fastest_speed(world), cfg);
    if substeps > 1 {
        log::trace!("integrating in {} sub-steps", substeps);
    }
    world.set_resource(LastSubsteps(substeps));

    reset_grounded_state(world);

    let fraction = 1.0 / substeps as f32;
    let mut results = Vec::new();
    for _ in 0..substeps {
        integrate(world, fraction);
        results.extend(resolve_overlaps(world));
    }
    results
}

/// Plain integration without collision handling: `position += velocity`.
pub fn apply_velocity(world: &mut World) {
    integrate(world, 1.0);
}

fn integrate(world: &mut World, fraction: f32) {
    for id in world.entities::<(&Position, &Velocity)>() {
        let Ok(vel) = world.copied::<Velocity>(id) else {
            continue;
        };
        if let Ok(mut pos) = world.get_mut::<Position>(id) {
            pos.0 += vel.0 * fraction;
        }
    }
}

/// Run `collision_iterations` resolution passes without moving anything.
/// Used to settle freshly placed bodies.
pub fn resolve_collisions(world: &mut World, cfg: &PhysicsConfig) -> Vec<CollisionResult> {
    reset_grounded_state(world);
    let mut results = Vec::new();
    for _ in 0..cfg.collision_iterations {
        results.extend(resolve_overlaps(world));
    }
    results
}

// ---------------------------------------------------------------------------
// Pair resolution
// ---------------------------------------------------------------------------

fn resolve_overlaps(world: &mut World) -> Vec<CollisionResult> {
    let ids = world.entities::<(&Collision, &Position)>();
    sync_collision_positions(world, &ids);
    let solid: Vec<EntityId> = ids.iter().copied().filter(|&id| !world.has::<Trigger>(id)).collect();

    let mut results = Vec::new();
    for (i, &a) in solid.iter().enumerate() {
        for &b in &solid[i + 1..] {
            let Some(mtv) = overlap(world, a, b) else {
                continue;
            };
            let normal = mtv.normalize_or_zero();
            results.push(CollisionResult {
                entity_a: a,
                entity_b: b,
                mtv,
                normal,
                penetration: mtv.length(),
            });
            resolve_pair(world, a, b, mtv, normal);
        }
    }

    sync_collision_positions(world, &ids);
    results
}

fn overlap(world: &World, a: EntityId, b: EntityId) -> Option<Vec2> {
    let col_a = world.get::<Collision>(a).ok()?;
    let col_b = world.get::<Collision>(b).ok()?;
    col_a.shape.intersection(&col_b.shape)
}

/// Push the pair apart along `mtv`, then exchange impulses and update
/// grounded state. Entities without a body count as mass 1 for the positional
/// split but never receive impulses.
fn resolve_pair(world: &mut World, a: EntityId, b: EntityId, mtv: Vec2, normal: Vec2) {
    let body_a = world.copied::<PhysicsBody>(a).ok();
    let body_b = world.copied::<PhysicsBody>(b).ok();
    let static_a = body_a.is_some_and(|body| body.is_static());
    let static_b = body_b.is_some_and(|body| body.is_static());
    if static_a && static_b {
        return;
    }

    let (ratio_a, ratio_b) = if static_a {
        (0.0, 1.0)
    } else if static_b {
        (1.0, 0.0)
    } else {
        let mass_a = body_a.map_or(1.0, |body| body.mass);
        let mass_b = body_b.map_or(1.0, |body| body.mass);
        let total = mass_a + mass_b;
        (mass_b / total, mass_a / total)
    };

    // Coincident edges report no displacement; velocities may still resolve.
    if mtv != Vec2::ZERO {
        displace(world, a, mtv * ratio_a);
        displace(world, b, -mtv * ratio_b);
    }

    let vel_a = world.copied::<Velocity>(a).ok();
    let vel_b = world.copied::<Velocity>(b).ok();
    if vel_a.is_some() || vel_b.is_some() {
        resolve_velocities(world, a, b, body_a, body_b, vel_a, vel_b, normal);
    }

    update_grounded_state(world, a, b, normal);
}

fn displace(world: &mut World, id: EntityId, delta: Vec2) {
    if delta == Vec2::ZERO {
        return;
    }
    let Ok(position) = world.get_mut::<Position>(id).map(|mut pos| {
        pos.0 += delta;
        pos.0
    }) else {
        return;
    };
    if let Ok(mut col) = world.get_mut::<Collision>(id) {
        col.sync_to(position);
    }
}

#[allow(clippy::too_many_arguments)]
fn resolve_velocities(
    world: &mut World,
    a: EntityId,
    b: EntityId,
    body_a: Option<PhysicsBody>,
    body_b: Option<PhysicsBody>,
    vel_a: Option<Velocity>,
    vel_b: Option<Velocity>,
    normal: Vec2,
) {
    let va = vel_a.map_or(Vec2::ZERO, |v| v.0);
    let vb = vel_b.map_or(Vec2::ZERO, |v| v.0);
    let vel_along_normal = (va - vb).dot(normal);

    // Already separating.
    if vel_along_normal > 0.0 {
        return;
    }

    let mut restitution = [body_a, body_b]
        .iter()
        .flatten()
        .map(|body| body.bounciness)
        .fold(0.0, f32::max);
    for id in [a, b] {
        if let Some(surface) = find_contact_surface(world, id) {
            restitution = restitution.max(surface.bounciness);
        }
    }
    if vel_along_normal.abs() < MIN_BOUNCE_VELOCITY {
        restitution = 0.0;
    }

    let inv_a = body_a.map_or(0.0, |body| body.inverse_mass());
    let inv_b = body_b.map_or(0.0, |body| body.inverse_mass());
    if inv_a == 0.0 && inv_b == 0.0 {
        return;
    }

    let j = -(1.0 + restitution) * vel_along_normal / (inv_a + inv_b);
    let impulse = normal * j;

    if let Some(mut v) = vel_a.map(|v| v.0).filter(|_| inv_a > 0.0) {
        v += impulse * inv_a;
        // Landed on top: never keep sinking.
        if normal.y < -VERTICAL_CONTACT && v.y > 0.0 {
            v.y = 0.0;
        }
        let _ = world.set_component(a, Velocity(v));
    }
    if let Some(mut v) = vel_b.map(|v| v.0).filter(|_| inv_b > 0.0) {
        v -= impulse * inv_b;
        if normal.y > VERTICAL_CONTACT && v.y > 0.0 {
            v.y = 0.0;
        }
        let _ = world.set_component(b, Velocity(v));
    }
}

// ---------------------------------------------------------------------------
// Grounded state
// ---------------------------------------------------------------------------

fn reset_grounded_state(world: &mut World) {
    for id in world.entities::<&PhysicsBody>() {
        if let Ok(mut body) = world.get_mut::<PhysicsBody>(id) {
            if body.is_kinematic {
                continue;
            }
            body.is_grounded = false;
            body.ground_normal = UP;
        }
    }
}

/// The body on top of a vertical-ish contact is grounded. Its ground normal
/// points from the ground toward the body.
fn update_grounded_state(world: &mut World, a: EntityId, b: EntityId, normal: Vec2) {
    let (on_top, ground_normal) = if normal.y < -VERTICAL_CONTACT {
        (a, normal)
    } else if normal.y > VERTICAL_CONTACT {
        (b, -normal)
    } else {
        return;
    };
    if let Ok(mut body) = world.get_mut::<PhysicsBody>(on_top) {
        if !body.is_kinematic {
            body.is_grounded = true;
            body.ground_normal = ground_normal;
        }
    }
}

/// Re-center every listed collision shape on its entity's position.
pub fn sync_collision_positions(world: &mut World, ids: &[EntityId]) {
    for &id in ids {
        let Ok(pos) = world.copied::<Position>(id) else {
            continue;
        };
        if let Ok(mut col) = world.get_mut::<Collision>(id) {
            col.sync_to(pos.0);
        }
    }
}

// ---------------------------------------------------------------------------
// Projectile impulse
// ---------------------------------------------------------------------------

/// Knock `target` away from `projectile`. Static and body-less targets are
/// unaffected; grounded targets are also popped upward and lose contact.
pub fn apply_projectile_impulse(world: &mut World, projectile: EntityId, target: EntityId, magnitude: f32) {
    let Ok(projectile_pos) = world.copied::<Position>(projectile) else {
        return;
    };
    let Ok(mut body) = world.copied::<PhysicsBody>(target) else {
        return;
    };
    if body.is_static() {
        return;
    }
    let Ok(target_pos) = world.copied::<Position>(target) else {
        return;
    };
    let mut vel = world.copied::<Velocity>(target).map_or(Vec2::ZERO, |v| v.0);

    let mut direction = (target_pos.0 - projectile_pos.0).normalize_or_zero();
    if direction == Vec2::ZERO {
        direction = UP;
    }
    vel += body.impulse_velocity(direction * magnitude);

    if body.is_grounded {
        vel.y -= magnitude * GROUNDED_LAUNCH_FACTOR;
        body.is_grounded = false;
    }

    log::debug!("projectile {} knocked {} to {:?}", projectile, target, vel);
    let _ = world.set_component(target, Velocity(vel));
    let _ = world.set_component(target, body);
}
