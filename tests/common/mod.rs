#![allow(dead_code)]

use std::time::Duration;

use stepdeck::scene::Scene;
use stepdeck::steps::ScrollWatchConfig;
use stepdeck::view::{ElementBox, Height, ScrollBehavior, ScrollMetrics};
use stepdeck::{AnimatorConfig, ElementId, Policy, SideEffect, SlideId, SlideStepSpec, Stagger, StepAnimator, StepDef, ViewBinding};

pub fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

pub fn id(s: &str) -> ElementId {
    ElementId::from(s)
}

/// Scene with one 200px container `list` inside host `frame`, holding
/// `ids` as 100px children.
pub fn scene_with(ids: &[&str]) -> Scene {
    let mut scene = Scene::new();
    scene.add_node("frame", "", true);
    scene.add_node("slide", "", true);
    scene.add_container("list", 200.0);
    for child in ids {
        scene.add_child(&id("list"), *child, *child, 100.0, true);
    }
    scene
}

/// Wrap-policy slide with five steps; step 3 scrolls the container.
pub fn wrap_slide() -> (StepAnimator, Scene) {
    let slide = SlideId::from("slide");
    let mut config = AnimatorConfig::new(
        Policy::Wrap,
        vec![
            StepDef::new(1, &["p1"]),
            StepDef::new(2, &["a1", "s2"]),
            StepDef::new(3, &["p2"]).with_scroll("p2"),
            StepDef::new(4, &["a2", "s3"]),
            StepDef::new(5, &["p3"]),
        ],
    )
    .with_container("list", Some("frame"));
    config.reset_also = vec![id("p4"), id("a4")];

    let spec = SlideStepSpec::new(&slide, config).unwrap();
    let mut scene = scene_with(&["s1", "p1", "a1", "s2", "p2", "a2", "s3", "p3", "p4", "a4"]);
    let mut animator = StepAnimator::new(slide, spec);
    animator.reset(&mut scene);
    (animator, scene)
}

/// Clamp-policy slide with four steps; step 3 expands a card and pulses
/// three chunks.
pub fn clamp_slide() -> (StepAnimator, Scene) {
    let slide = SlideId::from("slide");
    let effect = SideEffect {
        show: vec![id("rag")],
        expand: Some(id("card")),
        stagger: Some(Stagger::new(vec![id("c1"), id("c2"), id("c3")], "pulse", 600, 800)),
    };
    let mut config = AnimatorConfig::new(
        Policy::Clamp,
        vec![
            StepDef::new(1, &["d1"]).with_scroll("d1"),
            StepDef::new(2, &["d2"]).with_scroll("d2"),
            StepDef::new(3, &["d3"]).with_scroll("d3").with_side_effect(effect),
            StepDef::new(4, &["d4"]).with_scroll("d4"),
        ],
    )
    .with_container("list", None);
    config.instant_reset = true;
    config.timing.scroll_delay_ms = 200;
    config.scroll_watch = Some(ScrollWatchConfig {
        source: id("list"),
        host: id("slide"),
        class: "scrolled".to_string(),
        scrolled_threshold: 50.0,
        overflow_margin: 100.0,
    });

    let spec = SlideStepSpec::new(&slide, config).unwrap();
    let mut scene = scene_with(&["d1", "card", "rag", "c1", "c2", "c3", "d2", "d3", "d4"]);
    let mut animator = StepAnimator::new(slide, spec);
    animator.reset(&mut scene);
    (animator, scene)
}

/// Forwards to a scene and remembers what was asked of it.
pub struct Recorder<'a> {
    pub scene: &'a mut Scene,
    pub scrolls: Vec<(ElementId, f32)>,
    pub heights: Vec<(ElementId, Height)>,
}

impl<'a> Recorder<'a> {
    pub fn new(scene: &'a mut Scene) -> Self {
        Self {
            scene,
            scrolls: Vec::new(),
            heights: Vec::new(),
        }
    }

    pub fn scene(&self) -> &Scene {
        self.scene
    }
}

impl ViewBinding for Recorder<'_> {
    fn set_visible(&mut self, id: &ElementId, visible: bool) -> bool {
        self.scene.set_visible(id, visible)
    }

    fn set_class(&mut self, id: &ElementId, class: &str, on: bool) -> bool {
        self.scene.set_class(id, class, on)
    }

    fn has_class(&self, id: &ElementId, class: &str) -> bool {
        self.scene.has_class(id, class)
    }

    fn set_height(&mut self, id: &ElementId, height: Height) -> bool {
        self.heights.push((id.clone(), height));
        self.scene.set_height(id, height)
    }

    fn natural_height(&self, id: &ElementId) -> Option<f32> {
        self.scene.natural_height(id)
    }

    fn set_transitions(&mut self, id: &ElementId, enabled: bool) -> bool {
        self.scene.set_transitions(id, enabled)
    }

    fn element_box(&self, container: &ElementId, id: &ElementId) -> Option<ElementBox> {
        self.scene.element_box(container, id)
    }

    fn scroll_metrics(&self, container: &ElementId) -> Option<ScrollMetrics> {
        self.scene.scroll_metrics(container)
    }

    fn scroll_to(&mut self, container: &ElementId, top: f32, behavior: ScrollBehavior) -> bool {
        if behavior == ScrollBehavior::Smooth {
            self.scrolls.push((container.clone(), top));
        }
        self.scene.scroll_to(container, top, behavior)
    }
}
