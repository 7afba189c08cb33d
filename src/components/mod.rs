mod character;
mod physics;
mod render;
mod surface;
mod weapons;

pub use character::{
    Character, CharacterFsm, CharacterState, Corpse, LevelFinish, Life, Spike, StartPoint,
};
pub use physics::{Collision, PhysicsBody, Position, Trigger, Velocity};
pub use render::{Sprite, SpriteHandle};
pub use surface::{Surface, SurfaceKind};
pub use weapons::{Cannon, Projectile};
