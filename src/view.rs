//! The rendering surface an animator talks to.
//!
//! Animators never hold element references. They address elements by
//! [`ElementId`] through a [`ViewBinding`], which reports unknown ids by
//! returning `false`/`None` instead of failing.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Height {
    /// Natural content height.
    Auto,
    /// Zero height, content clipped.
    Collapsed,
    Px(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// Position of an element inside its container's scrollable content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementBox {
    pub top: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    pub scroll_top: f32,
    pub client_height: f32,
    pub scroll_height: f32,
}

impl ScrollMetrics {
    pub fn overflows(&self) -> bool {
        self.scroll_height > self.client_height
    }

    /// Scroll offset that puts `target` in the middle of the viewport.
    pub fn center_on(&self, target: ElementBox) -> f32 {
        (target.top - self.client_height / 2.0 + target.height / 2.0).max(0.0)
    }
}

pub trait ViewBinding {
    fn set_visible(&mut self, id: &ElementId, visible: bool) -> bool;

    fn set_class(&mut self, id: &ElementId, class: &str, on: bool) -> bool;

    fn has_class(&self, id: &ElementId, class: &str) -> bool;

    fn set_height(&mut self, id: &ElementId, height: Height) -> bool;

    fn natural_height(&self, id: &ElementId) -> Option<f32>;

    /// Turns visual transitions on or off for one element.
    fn set_transitions(&mut self, id: &ElementId, enabled: bool) -> bool;

    fn element_box(&self, container: &ElementId, id: &ElementId) -> Option<ElementBox>;

    fn scroll_metrics(&self, container: &ElementId) -> Option<ScrollMetrics>;

    fn scroll_to(&mut self, container: &ElementId, top: f32, behavior: ScrollBehavior) -> bool;

    fn scroll_into_center(
        &mut self,
        container: &ElementId,
        target: &ElementId,
        behavior: ScrollBehavior,
    ) -> bool {
        let (Some(metrics), Some(target_box)) = (
            self.scroll_metrics(container),
            self.element_box(container, target),
        ) else {
            return false;
        };
        self.scroll_to(container, metrics.center_on(target_box), behavior)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_on_places_target_mid_viewport() {
        let metrics = ScrollMetrics {
            scroll_top: 0.0,
            client_height: 200.0,
            scroll_height: 1000.0,
        };
        let target = ElementBox {
            top: 500.0,
            height: 40.0,
        };
        assert_eq!(metrics.center_on(target), 420.0);
    }

    #[test]
    fn center_on_never_goes_negative() {
        let metrics = ScrollMetrics {
            scroll_top: 0.0,
            client_height: 400.0,
            scroll_height: 1000.0,
        };
        let target = ElementBox {
            top: 20.0,
            height: 40.0,
        };
        assert_eq!(metrics.center_on(target), 0.0);
    }

    #[test]
    fn overflow_is_strict() {
        let mut metrics = ScrollMetrics {
            scroll_top: 0.0,
            client_height: 300.0,
            scroll_height: 300.0,
        };
        assert!(!metrics.overflows());
        metrics.scroll_height = 301.0;
        assert!(metrics.overflows());
    }
}
