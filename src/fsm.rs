/// Minimal finite-state-machine container.
///
/// `S` is the state type (usually an enum). The machine tracks the current
/// state, the previous one, and how many ticks have elapsed since the last
/// transition. Transition rules live in the system that drives it.
///
/// # Usage
/// ```
/// use dead_jump::fsm::StateMachine;
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum Door { Open, Closed }
///
/// let mut fsm = StateMachine::new(Door::Closed);
/// fsm.tick();
/// fsm.go(Door::Open);
/// assert!(fsm.just_entered());
/// assert_eq!(fsm.previous, Door::Closed);
/// ```
#[derive(Debug, Clone)]
pub struct StateMachine<S: Clone> {
    pub state: S,
    pub previous: S,
    /// Ticks spent in the current state. Reset on each transition.
    pub elapsed: u32,
    entered_this_tick: bool,
}

impl<S: Clone> StateMachine<S> {
    /// `just_entered()` is `true` until the first `tick()`.
    pub fn new(initial: S) -> Self {
        Self {
            previous: initial.clone(),
            state: initial,
            elapsed: 0,
            entered_this_tick: true,
        }
    }

    /// Transition to `next` only if it is a different variant from the current
    /// state (compared by discriminant). Returns whether a transition happened.
    pub fn go(&mut self, next: S) -> bool {
        if std::mem::discriminant(&self.state) == std::mem::discriminant(&next) {
            return false;
        }
        self.force_go(next);
        true
    }

    /// Like [`StateMachine::go`], but always transitions.
    pub fn force_go(&mut self, next: S) {
        self.previous = std::mem::replace(&mut self.state, next);
        self.elapsed = 0;
        self.entered_this_tick = true;
    }

    /// Advance the in-state counter and clear the `just_entered` flag.
    /// Call once per tick before evaluating transitions.
    pub fn tick(&mut self) {
        self.elapsed += 1;
        self.entered_this_tick = false;
    }

    pub fn just_entered(&self) -> bool {
        self.entered_this_tick
    }
}
