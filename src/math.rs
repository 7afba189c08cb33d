//! Screen-space direction constants for [`glam::Vec2`].
//!
//! The world uses screen coordinates: +X is right, +Y is down, so "up" is −Y.

use glam::Vec2;

/// Unit vector pointing up on screen.
pub const UP: Vec2 = Vec2::new(0.0, -1.0);
/// Unit vector pointing down on screen.
pub const DOWN: Vec2 = Vec2::new(0.0, 1.0);
