use glam::Vec2;

use crate::math::UP;

/// Physical character of a static contact surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Normal,
    Ice,
    Rough,
    Sticky,
    Conveyor,
    Bouncy,
}

/// Consulted by dynamic bodies resting on the owning static entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub kind: SurfaceKind,
    pub friction: f32,
    pub bounciness: f32,
    /// Radians; positive tilts the surface so bodies slide toward −X.
    pub slope_angle: f32,
    /// Outward normal implied by `slope_angle`.
    pub normal: Vec2,
    pub conveyor_speed: f32,
    pub conveyor_direction: Vec2,
    /// One-way platform tag. No separate collision pass treats it differently.
    pub is_platform: bool,
    pub tags: Vec<String>,
}

impl Surface {
    pub fn new(kind: SurfaceKind) -> Self {
        let (friction, bounciness, conveyor_speed) = match kind {
            SurfaceKind::Normal => (0.5, 0.0, 0.0),
            SurfaceKind::Ice => (0.05, 0.0, 0.0),
            SurfaceKind::Rough => (0.8, 0.0, 0.0),
            SurfaceKind::Sticky => (0.95, 0.0, 0.0),
            SurfaceKind::Conveyor => (0.4, 0.0, 2.0),
            SurfaceKind::Bouncy => (0.3, 0.8, 0.0),
        };
        Self {
            kind,
            friction,
            bounciness,
            slope_angle: 0.0,
            normal: UP,
            conveyor_speed,
            conveyor_direction: Vec2::X,
            is_platform: false,
            tags: Vec::new(),
        }
    }

    pub fn sloped(kind: SurfaceKind, slope_angle: f32) -> Self {
        Self {
            slope_angle,
            normal: Vec2::new(-slope_angle.sin(), -slope_angle.cos()),
            ..Self::new(kind)
        }
    }

    pub fn conveyor(speed: f32, direction: Vec2) -> Self {
        Self {
            conveyor_speed: speed,
            conveyor_direction: direction.normalize_or_zero(),
            ..Self::new(SurfaceKind::Conveyor)
        }
    }

    pub fn platform(mut self) -> Self {
        self.is_platform = true;
        self
    }

    pub fn is_conveyor(&self) -> bool {
        self.kind == SurfaceKind::Conveyor
    }

    /// Geometric mean of the surface and body coefficients.
    pub fn effective_friction(&self, body_friction: f32) -> f32 {
        (self.friction * body_friction).sqrt()
    }

    /// Along-slope acceleration produced by a vertical gravity component.
    pub fn slide_acceleration(&self, gravity_y: f32) -> f32 {
        gravity_y * self.slope_angle.sin()
    }

    pub fn conveyor_velocity(&self) -> Vec2 {
        self.conveyor_direction * self.conveyor_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_6;

    #[test]
    fn presets_carry_expected_coefficients() {
        assert_eq!(Surface::new(SurfaceKind::Ice).friction, 0.05);
        assert_eq!(Surface::new(SurfaceKind::Bouncy).bounciness, 0.8);
        let belt = Surface::new(SurfaceKind::Conveyor);
        assert!(belt.is_conveyor());
        assert_eq!(belt.conveyor_velocity(), Vec2::new(2.0, 0.0));
    }

    #[test]
    fn slope_normal_tilts_with_angle() {
        let s = Surface::sloped(SurfaceKind::Normal, FRAC_PI_6);
        assert!((s.normal - Vec2::new(-0.5, -(3f32.sqrt() / 2.0))).length() < 1e-5);
        assert!((s.slide_acceleration(0.5) - 0.25).abs() < 1e-5);
    }

    #[test]
    fn conveyor_direction_is_normalized() {
        let belt = Surface::conveyor(3.0, Vec2::new(-4.0, 0.0));
        assert_eq!(belt.conveyor_direction, Vec2::new(-1.0, 0.0));
        assert_eq!(belt.conveyor_velocity(), Vec2::new(-3.0, 0.0));
    }

    #[test]
    fn effective_friction_is_geometric_mean() {
        let rough = Surface::new(SurfaceKind::Rough);
        assert!((rough.effective_friction(0.2) - 0.4).abs() < 1e-6);
    }
}
