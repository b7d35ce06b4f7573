//! In-memory element tree implementing [`ViewBinding`].
//!
//! Containers stack their children vertically; an element hidden by
//! opacity still occupies its space. Opacity fades and smooth scrolls are
//! advanced by [`Scene::update`], the same way a frame loop would.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use crate::constants::*;
use crate::view::{ElementBox, ElementId, Height, ScrollBehavior, ScrollMetrics, ViewBinding};

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub label: String,
    pub visible: bool,
    /// Rendered opacity, moving toward `visible` while transitions are on.
    pub opacity: f32,
    pub classes: BTreeSet<String>,
    pub height: Height,
    pub natural_height: f32,
    pub transitions: bool,
}

impl Node {
    fn new(label: impl Into<String>, natural_height: f32, visible: bool) -> Self {
        Self {
            label: label.into(),
            visible,
            opacity: if visible { 1.0 } else { 0.0 },
            classes: BTreeSet::new(),
            height: Height::Auto,
            natural_height,
            transitions: true,
        }
    }

    pub fn rendered_height(&self) -> f32 {
        match self.height {
            Height::Auto => self.natural_height,
            Height::Collapsed => 0.0,
            Height::Px(px) => px,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ScrollAnimation {
    from: f32,
    to: f32,
    elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    children: Vec<ElementId>,
    client_height: f32,
    scroll_top: f32,
    animation: Option<ScrollAnimation>,
}

impl Container {
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn client_height(&self) -> f32 {
        self.client_height
    }

    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    pub fn is_scrolling(&self) -> bool {
        self.animation.is_some()
    }
}

// Same curve as raylib's `ease::cubic_out`; the library builds without raylib.
fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: BTreeMap<ElementId, Node>,
    containers: BTreeMap<ElementId, Container>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a free-standing element, e.g. a slide root or an affordance host.
    pub fn add_node(&mut self, id: impl Into<ElementId>, label: impl Into<String>, visible: bool) {
        self.nodes.insert(id.into(), Node::new(label, 0.0, visible));
    }

    pub fn add_container(&mut self, id: impl Into<ElementId>, client_height: f32) {
        let id = id.into();
        self.nodes.insert(id.clone(), Node::new("", 0.0, true));
        self.containers.insert(
            id,
            Container {
                children: Vec::new(),
                client_height,
                scroll_top: 0.0,
                animation: None,
            },
        );
    }

    /// Appends an element to a container's flow. Returns `false` if the
    /// container does not exist.
    pub fn add_child(
        &mut self,
        container: &ElementId,
        id: impl Into<ElementId>,
        label: impl Into<String>,
        natural_height: f32,
        visible: bool,
    ) -> bool {
        let Some(c) = self.containers.get_mut(container) else {
            return false;
        };
        let id = id.into();
        c.children.push(id.clone());
        self.nodes.insert(id, Node::new(label, natural_height, visible));
        true
    }

    pub fn node(&self, id: &ElementId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn container(&self, id: &ElementId) -> Option<&Container> {
        self.containers.get(id)
    }

    pub fn is_visible(&self, id: &ElementId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.visible)
    }

    /// Ids of every visible element among `ids`.
    pub fn visible_among<'a>(&self, ids: impl IntoIterator<Item = &'a ElementId>) -> BTreeSet<ElementId> {
        ids.into_iter()
            .filter(|id| self.is_visible(id))
            .cloned()
            .collect()
    }

    /// Visible children of a container, in flow order.
    pub fn visible_children(&self, container: &ElementId) -> Vec<&ElementId> {
        self.containers
            .get(container)
            .map(|c| c.children.iter().filter(|id| self.is_visible(id)).collect())
            .unwrap_or_default()
    }

    pub fn content_height(&self, container: &ElementId) -> Option<f32> {
        let c = self.containers.get(container)?;
        Some(
            c.children
                .iter()
                .filter_map(|id| self.nodes.get(id))
                .map(Node::rendered_height)
                .sum(),
        )
    }

    /// User scroll (wheel, drag): instant, clamped to the scrollable range.
    pub fn scroll_by(&mut self, container: &ElementId, delta: f32) -> bool {
        let Some(metrics) = self.scroll_metrics(container) else {
            return false;
        };
        self.scroll_to(container, metrics.scroll_top + delta, ScrollBehavior::Instant)
    }

    /// Advances fades and smooth scrolls by `dt`.
    pub fn update(&mut self, dt: Duration) {
        let fade_step = dt.as_secs_f32() / FADE_DURATION.as_secs_f32();
        for node in self.nodes.values_mut() {
            let target = if node.visible { 1.0 } else { 0.0 };
            if !node.transitions {
                node.opacity = target;
            } else if node.opacity < target {
                node.opacity = (node.opacity + fade_step).min(target);
            } else if node.opacity > target {
                node.opacity = (node.opacity - fade_step).max(target);
            }
        }

        for c in self.containers.values_mut() {
            let Some(animation) = c.animation.as_mut() else {
                continue;
            };
            animation.elapsed += dt;
            let t = (animation.elapsed.as_secs_f32() / SCROLL_DURATION.as_secs_f32()).min(1.0);
            c.scroll_top = animation.from + (animation.to - animation.from) * ease_out_cubic(t);
            if t >= 1.0 {
                c.scroll_top = animation.to;
                c.animation = None;
            }
        }
    }
}

impl ViewBinding for Scene {
    fn set_visible(&mut self, id: &ElementId, visible: bool) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.visible = visible;
                if !node.transitions {
                    node.opacity = if visible { 1.0 } else { 0.0 };
                }
                true
            }
            None => false,
        }
    }

    fn set_class(&mut self, id: &ElementId, class: &str, on: bool) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                if on {
                    node.classes.insert(class.to_string());
                } else {
                    node.classes.remove(class);
                }
                true
            }
            None => false,
        }
    }

    fn has_class(&self, id: &ElementId, class: &str) -> bool {
        self.nodes.get(id).is_some_and(|n| n.has_class(class))
    }

    fn set_height(&mut self, id: &ElementId, height: Height) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.height = height;
                true
            }
            None => false,
        }
    }

    fn natural_height(&self, id: &ElementId) -> Option<f32> {
        self.nodes.get(id).map(|n| n.natural_height)
    }

    fn set_transitions(&mut self, id: &ElementId, enabled: bool) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.transitions = enabled;
                true
            }
            None => false,
        }
    }

    fn element_box(&self, container: &ElementId, id: &ElementId) -> Option<ElementBox> {
        let c = self.containers.get(container)?;
        let mut top = 0.0;
        for child in &c.children {
            let node = self.nodes.get(child)?;
            if child == id {
                return Some(ElementBox {
                    top,
                    height: node.rendered_height(),
                });
            }
            top += node.rendered_height();
        }
        None
    }

    fn scroll_metrics(&self, container: &ElementId) -> Option<ScrollMetrics> {
        let c = self.containers.get(container)?;
        let content = self.content_height(container)?;
        Some(ScrollMetrics {
            scroll_top: c.scroll_top,
            client_height: c.client_height,
            scroll_height: content.max(c.client_height),
        })
    }

    fn scroll_to(&mut self, container: &ElementId, top: f32, behavior: ScrollBehavior) -> bool {
        let Some(metrics) = self.scroll_metrics(container) else {
            return false;
        };
        let Some(c) = self.containers.get_mut(container) else {
            return false;
        };
        let max_top = metrics.scroll_height - metrics.client_height;
        let to = top.clamp(0.0, max_top);
        match behavior {
            ScrollBehavior::Instant => {
                c.scroll_top = to;
                c.animation = None;
            }
            ScrollBehavior::Smooth => {
                c.animation = Some(ScrollAnimation {
                    from: c.scroll_top,
                    to,
                    elapsed: Duration::ZERO,
                });
            }
        }
        true
    }
}
