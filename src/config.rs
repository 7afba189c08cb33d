//! Simulation tuning, stored as World resources and optionally loaded from JSON.

use std::fs;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Physics constants read by the pipeline every tick. Units are pixels and
/// ticks (velocities are pixels per tick).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: Vec2,
    /// Maximum downward (+Y) speed gravity may produce.
    pub terminal_velocity: f32,
    /// Surface friction assumed when a grounded body has no Surface under it.
    pub default_friction: f32,
    /// Horizontal speeds below this snap to zero under ground friction.
    pub min_velocity: f32,
    pub fixed_delta_time: f32,
    pub collision_iterations: u32,
    pub push_force: f32,
    pub slope_threshold: f32,
    pub ground_check_distance: f32,
    /// Longest distance any body may travel in one integration sub-step.
    pub max_step_distance: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, 0.5),
            terminal_velocity: 15.0,
            default_friction: 0.5,
            min_velocity: 0.01,
            fixed_delta_time: 1.0 / 60.0,
            collision_iterations: 4,
            push_force: 5.0,
            slope_threshold: 0.785,
            ground_check_distance: 2.0,
            max_step_distance: 8.0,
        }
    }
}

/// Player movement tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterTuning {
    /// Horizontal acceleration requested per tick while a direction key is held.
    pub move_speed: f32,
    /// Upward speed set on jump.
    pub jump_speed: f32,
}

impl Default for CharacterTuning {
    fn default() -> Self {
        Self {
            move_speed: 0.5,
            jump_speed: 7.0,
        }
    }
}

/// Playfield extent used by off-screen projectile cleanup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
        }
    }
}

/// Everything a tuning file may override. Missing sections keep defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub character: CharacterTuning,
    pub bounds: WorldBounds,
}

impl GameConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        log::debug!("loaded game config: {:?}", config);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shipped_tuning() {
        let cfg = PhysicsConfig::default();
        assert_eq!(cfg.gravity, Vec2::new(0.0, 0.5));
        assert_eq!(cfg.terminal_velocity, 15.0);
        assert_eq!(cfg.max_step_distance, 8.0);
        assert_eq!(cfg.collision_iterations, 4);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = GameConfig::from_json(
            r#"{ "physics": { "max_step_distance": 4.0 }, "character": { "jump_speed": 9.0 } }"#,
        )
        .unwrap();
        assert_eq!(cfg.physics.max_step_distance, 4.0);
        assert_eq!(cfg.physics.terminal_velocity, 15.0);
        assert_eq!(cfg.character.jump_speed, 9.0);
        assert_eq!(cfg.bounds, WorldBounds::default());
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            GameConfig::load("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
