//! Simulation core of a 2D platformer where dead characters stay behind as
//! platforms: an entity store, a sub-stepped physics pipeline, and the
//! gameplay rules that consume its contacts.

pub mod audio;
pub mod camera;
pub mod components;
pub mod config;
pub mod ecs;
pub mod engine;
pub mod fsm;
pub mod geometry;
pub mod math;
pub mod scene;
pub mod systems;

pub use ecs::{EntityId, World, WorldError};
