use crate::components::render::SpriteHandle;
use crate::fsm::StateMachine;

/// Marker for the player-controlled entity, with optional sprites swapped in
/// while standing and while airborne.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Character {
    pub grounded_sprite: Option<SpriteHandle>,
    pub jumping_sprite: Option<SpriteHandle>,
}

// ---------------------------------------------------------------------------
// Character state machine
// ---------------------------------------------------------------------------

/// Discrete movement states of the player.
///
/// Transition rules live in `systems::player` next to the movement code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterState {
    /// Grounded with no meaningful horizontal motion.
    Idle,
    /// Grounded and moving sideways.
    Running,
    /// Airborne and rising.
    Jumping,
    /// Airborne and descending, or walked off an edge.
    Falling,
}

/// FSM component attached to the character entity.
pub type CharacterFsm = StateMachine<CharacterState>;

// ---------------------------------------------------------------------------
// Level tags
// ---------------------------------------------------------------------------

/// Lethal static hazard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Spike;

/// Respawn location for the character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartPoint;

/// Touching this completes the level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelFinish;

/// Remains of a dead character. Corpses stay in the level as static geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Corpse {
    pub durability: u32,
}

/// Remaining lives, stored as a World resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Life {
    pub count: i32,
}

impl Life {
    pub fn new(count: i32) -> Self {
        Self { count }
    }

    pub fn is_exhausted(&self) -> bool {
        self.count <= 0
    }
}
