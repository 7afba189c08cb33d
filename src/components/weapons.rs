/// Tags a cannon-fired object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    /// Impulse delivered to a dynamic target on hit.
    pub impulse_magnitude: f32,
    pub destroy_on_hit: bool,
    /// Remaining ticks; negative means infinite.
    pub lifetime: i32,
    /// Slower projectiles hit without pushing.
    pub min_speed_for_impulse: f32,
    /// Set once the projectile has come to rest; it is frozen from then on.
    pub is_stationary: bool,
}

impl Projectile {
    /// Tuning used for cannon shots of the given mass.
    pub fn for_mass(mass: f32) -> Self {
        Self {
            impulse_magnitude: mass * 3.0,
            destroy_on_hit: false,
            lifetime: 300,
            min_speed_for_impulse: 0.5,
            is_stationary: false,
        }
    }
}

/// Turret that periodically fires projectiles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cannon {
    /// Ticks between volleys.
    pub fire_rate: u32,
    pub frames_since_last_shot: u32,
    pub projectile_speed: f32,
    pub projectile_mass: f32,
    /// Firing direction in radians (0 = right, π/2 = down).
    pub direction: f32,
    pub active: bool,

    /// Shots per volley.
    pub burst_count: u32,
    /// Ticks between shots inside a volley.
    pub burst_delay: u32,
    /// Shots still owed in the current volley.
    pub current_burst: u32,
    pub frames_since_last_burst: u32,
}

impl Default for Cannon {
    fn default() -> Self {
        Self {
            fire_rate: 120,
            frames_since_last_shot: 0,
            projectile_speed: 4.0,
            projectile_mass: 2.0,
            direction: std::f32::consts::PI,
            active: true,
            burst_count: 1,
            burst_delay: 5,
            current_burst: 0,
            frames_since_last_burst: 0,
        }
    }
}

impl Cannon {
    pub fn aimed(direction: f32) -> Self {
        Self {
            direction,
            ..Self::default()
        }
    }
}
