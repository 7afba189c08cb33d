mod collision;
mod hazards;
mod physics;
mod player;
mod projectile;
mod tick;

pub use collision::{
    apply_projectile_impulse, apply_velocity, apply_velocity_with_collisions, resolve_collisions, substep_count,
    sync_collision_positions, CollisionResult, LastSubsteps,
};
pub use hazards::{apply_level_finish, apply_spikes, is_game_over, kill_character};
pub use physics::{
    apply_accumulated, apply_conveyor_belt, apply_friction, apply_gravity, apply_slope_gravity,
    find_contact_surface,
};
pub use player::{move_character, update_character_state};
pub use projectile::{
    cleanup_offscreen_projectiles, handle_projectile_collisions, spawn_projectile, update_cannons,
    update_projectile_lifetime,
};
pub use tick::{step, GameEvent, TickReport};
