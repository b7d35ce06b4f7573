/// Mutable per-slide animation state. `current_step` stays within
/// `0..=max_steps`; 0 is both the initial state and the rest state.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct AnimatorState {
    pub current_step: u32,
    pub has_overflow: bool,
}

impl AnimatorState {
    pub fn is_at_rest(&self) -> bool {
        self.current_step == 0
    }
}
