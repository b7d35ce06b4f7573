use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::view::ViewBinding;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideId(String);

impl SlideId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SlideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlideId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// What a controller did with an advance request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// A step was shown; the caller must not navigate.
    Consumed,
    /// No steps left; the caller may perform its default navigation.
    Exhausted,
    /// The request was for a slide this controller does not own.
    Inactive,
}

impl Advance {
    pub fn is_handled(self) -> bool {
        self == Advance::Consumed
    }
}

/// Capabilities a slide exposes to the navigator.
pub trait SlideController {
    fn slide(&self) -> &SlideId;

    fn advance(&mut self, active: &SlideId, view: &mut dyn ViewBinding) -> Advance;

    /// Must be safe to call at any time, including before any advance.
    fn reset(&mut self, view: &mut dyn ViewBinding);

    /// Called when the slide becomes the active one.
    fn initialize(&mut self, _view: &mut dyn ViewBinding) {}

    /// Whether "next" input should be offered to this controller before
    /// the navigator moves to the following slide.
    fn intercepts_navigation(&self) -> bool;

    fn tick(&mut self, _dt: Duration, _view: &mut dyn ViewBinding) {}

    fn on_scroll(&mut self, _view: &mut dyn ViewBinding) {}

    fn current_step(&self) -> u32 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_consumed_counts_as_handled() {
        assert!(Advance::Consumed.is_handled());
        assert!(!Advance::Exhausted.is_handled());
        assert!(!Advance::Inactive.is_handled());
    }
}
