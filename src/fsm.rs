/// Small finite-state-machine container shared by the player lifecycle and
/// the turtle dive cycle.
///
/// `S` is the state type (usually an enum). The machine remembers the current
/// state, the one before it, and the seconds spent in the current state.
/// Transition rules live with whoever drives the machine, not here.
///
/// ```
/// use leapfrog::fsm::StateMachine;
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum Light { Red, Green }
///
/// let mut fsm = StateMachine::new(Light::Red);
/// fsm.tick(0.5);
/// assert!(fsm.expired(0.5));
/// fsm.go(Light::Green);
/// assert!(fsm.just_entered());
/// assert_eq!(fsm.previous, Light::Red);
/// assert_eq!(fsm.elapsed, 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct StateMachine<S: Clone> {
    pub state: S,
    pub previous: S,
    /// Seconds spent in the current state. Reset to 0.0 on each transition.
    pub elapsed: f32,
    entered_this_tick: bool,
}

impl<S: Clone> StateMachine<S> {
    /// Create a new machine starting in `initial`.
    /// `just_entered()` returns `true` until the first `tick`.
    pub fn new(initial: S) -> Self {
        Self {
            previous: initial.clone(),
            state: initial,
            elapsed: 0.0,
            entered_this_tick: true,
        }
    }

    /// Transition to `next` only if it is a different variant from the
    /// current state (compared by discriminant, so no `PartialEq` needed).
    /// Returns whether a transition happened.
    pub fn go(&mut self, next: S) -> bool {
        if std::mem::discriminant(&self.state) == std::mem::discriminant(&next) {
            return false;
        }
        self.force_go(next);
        true
    }

    /// Like [`go`](Self::go), but always transitions even if the variant is
    /// the same. Use when the variant carries data that must be replaced.
    pub fn force_go(&mut self, next: S) {
        self.previous = std::mem::replace(&mut self.state, next);
        self.elapsed = 0.0;
        self.entered_this_tick = true;
    }

    /// Advance the time-in-state by `dt` seconds and clear the
    /// `just_entered` flag.
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
        self.entered_this_tick = false;
    }

    /// `true` from a transition until the next `tick`.
    pub fn just_entered(&self) -> bool {
        self.entered_this_tick
    }

    /// Whether at least `duration` seconds have passed in the current state.
    pub fn expired(&self, duration: f32) -> bool {
        self.elapsed >= duration
    }
}
