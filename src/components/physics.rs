use glam::Vec2;

use crate::geometry::{Bounds, Shape};
use crate::math::UP;

/// Top-left corner of the entity in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position(pub Vec2);

/// Displacement per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity(pub Vec2);

/// Collision shape attached to an entity, kept in sync with its [`Position`].
#[derive(Debug, Clone, PartialEq)]
pub struct Collision {
    pub shape: Shape,
}

impl Collision {
    pub fn new(shape: Shape) -> Self {
        Self { shape }
    }

    pub fn bounds(&self) -> Bounds {
        self.shape.bounds()
    }

    /// Re-center the shape so its bounding box starts at `position`.
    pub fn sync_to(&mut self, position: Vec2) {
        self.shape.set_top_left(position);
    }
}

/// Marks a collision shape as overlap-only: gameplay systems test it, but
/// pair resolution never pushes it or pushes anything out of it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Trigger;

/// Per-entity physical attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsBody {
    /// Zero or negative means infinite mass.
    pub mass: f32,
    pub friction: f32,
    /// Restitution coefficient. 0.0 = no bounce, 1.0 = perfect bounce.
    pub bounciness: f32,
    /// Fraction of horizontal speed lost per airborne tick.
    pub air_drag: f32,
    pub gravity_scale: f32,
    /// Never integrated by forces or pushed by collisions.
    pub is_kinematic: bool,
    /// Set by collision resolution when resting on something this tick.
    pub is_grounded: bool,
    pub ground_normal: Vec2,
    /// Velocity magnitude clamp; 0 disables it.
    pub max_speed: f32,
    /// Accumulated acceleration, folded into velocity and cleared each tick.
    pub acceleration: Vec2,
}

impl Default for PhysicsBody {
    fn default() -> Self {
        Self {
            mass: 1.0,
            friction: 0.3,
            bounciness: 0.0,
            air_drag: 0.02,
            gravity_scale: 1.0,
            is_kinematic: false,
            is_grounded: false,
            ground_normal: UP,
            max_speed: 10.0,
            acceleration: Vec2::ZERO,
        }
    }
}

impl PhysicsBody {
    /// Immovable level geometry.
    pub fn static_body() -> Self {
        Self {
            mass: 0.0,
            friction: 0.5,
            bounciness: 0.0,
            air_drag: 0.0,
            gravity_scale: 0.0,
            is_kinematic: true,
            is_grounded: true,
            ground_normal: UP,
            max_speed: 0.0,
            acceleration: Vec2::ZERO,
        }
    }

    /// Cannon-fired object of the given mass.
    pub fn projectile(mass: f32) -> Self {
        Self {
            mass,
            friction: 0.1,
            bounciness: 0.3,
            air_drag: 0.01,
            gravity_scale: 1.0,
            is_kinematic: false,
            is_grounded: false,
            ground_normal: Vec2::ZERO,
            max_speed: 20.0,
            acceleration: Vec2::ZERO,
        }
    }

    pub fn is_static(&self) -> bool {
        self.mass <= 0.0 || self.is_kinematic
    }

    /// 0 for static bodies.
    pub fn inverse_mass(&self) -> f32 {
        if self.is_static() {
            0.0
        } else {
            1.0 / self.mass
        }
    }

    /// Accumulate `force / mass` into the acceleration buffer.
    pub fn add_force(&mut self, force: Vec2) {
        if self.mass > 0.0 {
            self.acceleration += force / self.mass;
        }
    }

    /// Velocity change produced by an instantaneous impulse.
    pub fn impulse_velocity(&self, impulse: Vec2) -> Vec2 {
        if self.mass > 0.0 {
            impulse / self.mass
        } else {
            Vec2::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_iff_massless_or_kinematic() {
        assert!(PhysicsBody::static_body().is_static());
        assert!(!PhysicsBody::default().is_static());
        let kinematic = PhysicsBody {
            is_kinematic: true,
            ..PhysicsBody::default()
        };
        assert!(kinematic.is_static());
        let negative = PhysicsBody {
            mass: -1.0,
            ..PhysicsBody::default()
        };
        assert!(negative.is_static());
        assert_eq!(negative.inverse_mass(), 0.0);
    }

    #[test]
    fn force_is_divided_by_mass() {
        let mut body = PhysicsBody {
            mass: 4.0,
            ..PhysicsBody::default()
        };
        body.add_force(Vec2::new(8.0, 0.0));
        body.add_force(Vec2::new(0.0, -4.0));
        assert_eq!(body.acceleration, Vec2::new(2.0, -1.0));

        let mut wall = PhysicsBody::static_body();
        wall.add_force(Vec2::new(8.0, 0.0));
        assert_eq!(wall.acceleration, Vec2::ZERO);
        assert_eq!(wall.impulse_velocity(Vec2::X), Vec2::ZERO);
    }

    #[test]
    fn collision_sync_tracks_top_left() {
        let mut col = Collision::new(Shape::rect(0.0, 0.0, 12.0, 6.0));
        col.sync_to(Vec2::new(30.0, 40.0));
        assert_eq!(col.bounds().min, Vec2::new(30.0, 40.0));
        assert_eq!(col.bounds().max, Vec2::new(42.0, 46.0));
    }
}
