use glam::Vec2;

use crate::ecs::EntityId;

/// View over the level, stored as a World resource. The renderer reads it;
/// following and smoothing are driven by the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// World-space top-left corner of the view.
    pub position: Vec2,
    pub viewport: Vec2,
    pub target: Option<EntityId>,
    /// Fraction of the remaining distance covered per tick when following.
    pub smoothing: f32,
    pub dead_zone: Vec2,
    /// Level extent the view is kept inside; `None` means unbounded.
    pub bounds: Option<(Vec2, Vec2)>,
}

impl Camera {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            viewport: Vec2::new(viewport_width, viewport_height),
            target: None,
            smoothing: 0.1,
            dead_zone: Vec2::new(50.0, 30.0),
            bounds: None,
        }
    }

    pub fn with_target(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }

    /// Restrict the view to `[min, max]` and pull it back inside right away.
    pub fn set_bounds(&mut self, min: Vec2, max: Vec2) {
        self.bounds = Some((min, max));
        self.position = self.clamped(self.position);
    }

    /// Move the view to `position`, respecting the bounds.
    pub fn look_at(&mut self, position: Vec2) {
        self.position = self.clamped(position);
    }

    fn clamped(&self, position: Vec2) -> Vec2 {
        match self.bounds {
            Some((min, max)) => {
                let upper = (max - self.viewport).max(min);
                position.clamp(min, upper)
            }
            None => position,
        }
    }

    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        world - self.position
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.position
    }

    /// Whether a box at `top_left` of `size` overlaps the view.
    pub fn is_visible(&self, top_left: Vec2, size: Vec2) -> bool {
        let screen = self.world_to_screen(top_left);
        screen.x + size.x > 0.0
            && screen.x < self.viewport.x
            && screen.y + size.y > 0.0
            && screen.y < self.viewport.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_to_screen_offsets_by_position() {
        let mut camera = Camera::new(320.0, 240.0);
        camera.look_at(Vec2::new(100.0, 50.0));
        assert_eq!(camera.world_to_screen(Vec2::new(110.0, 60.0)), Vec2::new(10.0, 10.0));
        assert_eq!(camera.screen_to_world(Vec2::new(10.0, 10.0)), Vec2::new(110.0, 60.0));
    }

    #[test]
    fn bounds_keep_view_inside_level() {
        let mut camera = Camera::new(320.0, 240.0);
        camera.look_at(Vec2::new(900.0, -40.0));
        camera.set_bounds(Vec2::ZERO, Vec2::new(800.0, 400.0));
        assert_eq!(camera.position, Vec2::new(480.0, 0.0));
    }

    #[test]
    fn visibility_checks_overlap() {
        let camera = Camera::new(320.0, 240.0);
        assert!(camera.is_visible(Vec2::new(-5.0, 10.0), Vec2::new(10.0, 10.0)));
        assert!(!camera.is_visible(Vec2::new(320.0, 10.0), Vec2::new(10.0, 10.0)));
        assert!(!camera.is_visible(Vec2::new(0.0, -20.0), Vec2::new(10.0, 10.0)));
    }
}
