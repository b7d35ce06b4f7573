//! Deck descriptions.
//!
//! A deck is a TOML file listing slides in order. Each slide may declare
//! a scrollable viewport of elements and an `[slides.animator]` table that
//! turns it into a step-animated slide:
//!
//! ```toml
//! [[slides]]
//! id = "autoregression"
//! viewport = { id = "steps", height = 320 }
//! elements = [{ id = "prediction1", text = "while" }]
//!
//! [slides.animator]
//! policy = "wrap"
//! container = "steps"
//! steps = [{ step = 1, reveal = ["prediction1"] }]
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::animator::StepAnimator;
use crate::controller::SlideId;
use crate::deck::Deck;
use crate::error::{DeckError, Result};
use crate::scene::{Container, Scene};
use crate::steps::{AnimatorConfig, SlideStepSpec};
use crate::view::{ElementId, Height, ViewBinding};

pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 480.0;
pub const DEFAULT_ELEMENT_HEIGHT: f32 = 60.0;

const DEMO_DECK: &str = include_str!("../decks/demo.toml");

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ViewportConfig {
    pub id: ElementId,
    #[serde(default = "default_viewport_height")]
    pub height: f32,
}

fn default_viewport_height() -> f32 {
    DEFAULT_VIEWPORT_HEIGHT
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ElementConfig {
    pub id: ElementId,
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_element_height")]
    pub height: f32,
    #[serde(default)]
    pub collapsed: bool,
}

fn default_element_height() -> f32 {
    DEFAULT_ELEMENT_HEIGHT
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SlideConfig {
    pub id: SlideId,
    #[serde(default)]
    pub title: String,
    pub viewport: Option<ViewportConfig>,
    /// Elements outside the flow that only carry classes (frames, overlays).
    #[serde(default)]
    pub hosts: Vec<ElementId>,
    #[serde(default)]
    pub elements: Vec<ElementConfig>,
    pub animator: Option<AnimatorConfig>,
}

impl SlideConfig {
    pub fn viewport_id(&self) -> ElementId {
        self.viewport
            .as_ref()
            .map(|v| v.id.clone())
            .unwrap_or_else(|| ElementId::new(format!("{}-viewport", self.id)))
    }

    /// Every id this slide puts into the scene.
    fn known_ids(&self) -> BTreeSet<ElementId> {
        let mut ids: BTreeSet<ElementId> = self.elements.iter().map(|e| e.id.clone()).collect();
        ids.extend(self.hosts.iter().cloned());
        ids.insert(self.viewport_id());
        ids.insert(ElementId::new(self.id.as_str()));
        ids
    }

    /// Ids the animator mentions that the slide never declares.
    pub fn unknown_references(&self) -> Vec<ElementId> {
        let Some(animator) = &self.animator else {
            return Vec::new();
        };
        let known = self.known_ids();

        let mut referenced: Vec<&ElementId> = Vec::new();
        referenced.extend(animator.container.iter());
        referenced.extend(animator.affordance_host.iter());
        referenced.extend(animator.reset_also.iter());
        for def in &animator.steps {
            referenced.extend(def.reveal.iter());
            referenced.extend(def.scroll.iter());
            if let Some(effect) = &def.side_effect {
                referenced.extend(effect.show.iter());
                referenced.extend(effect.expand.iter());
                referenced.extend(effect.stagger.iter().flat_map(|s| s.targets.iter()));
            }
        }
        if let Some(entrance) = &animator.entrance {
            referenced.extend(entrance.staggers.iter().flat_map(|s| s.targets.iter()));
        }
        if let Some(watch) = &animator.scroll_watch {
            referenced.push(&watch.source);
            referenced.push(&watch.host);
        }

        let mut seen = BTreeSet::new();
        referenced
            .into_iter()
            .filter(|id| !known.contains(*id) && seen.insert(*id))
            .cloned()
            .collect()
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct DeckConfig {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slides: Vec<SlideConfig>,
}

/// Per-slide data the renderer needs besides the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideInfo {
    pub id: SlideId,
    pub title: String,
    pub viewport: ElementId,
    /// The slide root followed by its class-only hosts.
    pub hosts: Vec<ElementId>,
}

pub struct Presentation {
    pub title: String,
    pub deck: Deck,
    pub scene: Scene,
    pub slides: Vec<SlideInfo>,
}

impl Presentation {
    pub fn current(&self) -> &SlideInfo {
        &self.slides[self.deck.current_index()]
    }

    /// Advances deferred work and scene transitions by one frame. Any change
    /// of the current viewport's scroll position is reported to the current
    /// slide, as a browser would fire a scroll event.
    pub fn frame(&mut self, dt: Duration) {
        let viewport = &self.slides[self.deck.current_index()].viewport;
        let before = self.scene.container(viewport).map(Container::scroll_top);
        self.deck.tick(dt, &mut self.scene);
        self.scene.update(dt);
        let after = self.scene.container(viewport).map(Container::scroll_top);
        if before != after {
            self.deck.on_scroll(&mut self.scene);
        }
    }

    /// User scroll of the current slide's viewport.
    pub fn scroll_by(&mut self, delta: f32) {
        let viewport = &self.slides[self.deck.current_index()].viewport;
        if self.scene.scroll_by(viewport, delta) {
            self.deck.on_scroll(&mut self.scene);
        }
    }
}

impl DeckConfig {
    pub fn parse(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|source| DeckError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&source)
    }

    /// The deck bundled with the binary.
    pub fn demo() -> Result<Self> {
        Self::parse(DEMO_DECK)
    }

    /// Builds the scene and the deck, with every animated slide reset to
    /// step 0.
    pub fn build(&self) -> Result<Presentation> {
        let mut scene = Scene::new();
        let mut infos = Vec::with_capacity(self.slides.len());

        for slide in &self.slides {
            let viewport = slide.viewport_id();
            let viewport_height = slide
                .viewport
                .as_ref()
                .map_or(DEFAULT_VIEWPORT_HEIGHT, |v| v.height);

            scene.add_node(ElementId::new(slide.id.as_str()), slide.title.clone(), true);
            scene.add_container(viewport.clone(), viewport_height);
            for host in &slide.hosts {
                scene.add_node(host.clone(), "", true);
            }
            for element in &slide.elements {
                scene.add_child(&viewport, element.id.clone(), element.text.clone(), element.height, true);
                if element.collapsed {
                    scene.set_height(&element.id, Height::Collapsed);
                }
            }

            for id in slide.unknown_references() {
                warn!(slide = %slide.id, element = %id, "animator references an undeclared element");
            }

            let mut hosts = vec![ElementId::new(slide.id.as_str())];
            hosts.extend(slide.hosts.iter().cloned());
            infos.push(SlideInfo {
                id: slide.id.clone(),
                title: slide.title.clone(),
                viewport,
                hosts,
            });
        }

        let mut deck = Deck::new(self.slides.iter().map(|s| s.id.clone()).collect())?;
        for slide in &self.slides {
            let Some(animator) = &slide.animator else {
                continue;
            };
            let spec = SlideStepSpec::new(&slide.id, animator.clone())?;
            let mut animator = StepAnimator::new(slide.id.clone(), spec);
            animator.reset(&mut scene);
            deck.register(Box::new(animator))?;
            debug!(slide = %slide.id, "animated slide ready");
        }

        Ok(Presentation {
            title: self.title.clone(),
            deck,
            scene,
            slides: infos,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::Policy;

    #[test]
    fn parses_minimal_deck() {
        let deck = DeckConfig::parse(
            r#"
            title = "t"

            [[slides]]
            id = "intro"

            [[slides]]
            id = "demo"
            elements = [{ id = "a", text = "A" }, { id = "b", height = 90 }]

            [slides.animator]
            policy = "clamp"
            steps = [{ step = 1, reveal = ["a"] }, { step = 2, reveal = ["b"], scroll = "b" }]
            "#,
        )
        .unwrap();

        assert_eq!(deck.slides.len(), 2);
        let demo = &deck.slides[1];
        assert_eq!(demo.elements[1].height, 90.0);
        assert_eq!(demo.viewport_id().as_str(), "demo-viewport");
        let animator = demo.animator.as_ref().unwrap();
        assert_eq!(animator.policy, Policy::Clamp);
        assert_eq!(animator.affordance_class, "has-scroll");
        assert_eq!(animator.timing.scroll_delay_ms, 100);
    }

    #[test]
    fn timing_overrides_are_partial() {
        let deck = DeckConfig::parse(
            r#"
            [[slides]]
            id = "s"
            [slides.animator]
            timing = { scroll_delay_ms = 200 }
            "#,
        )
        .unwrap();
        let timing = deck.slides[0].animator.as_ref().unwrap().timing;
        assert_eq!(timing.scroll_delay_ms, 200);
        assert_eq!(timing.side_effect_delay_ms, 500);
    }

    #[test]
    fn reports_undeclared_references() {
        let deck = DeckConfig::parse(
            r#"
            [[slides]]
            id = "s"
            elements = [{ id = "a" }]
            [slides.animator]
            steps = [{ step = 1, reveal = ["a", "ghost"], scroll = "ghost" }]
            "#,
        )
        .unwrap();
        let unknown: Vec<_> = deck.slides[0]
            .unknown_references()
            .into_iter()
            .map(|id| id.as_str().to_string())
            .collect();
        assert_eq!(unknown, vec!["ghost".to_string()]);
    }

    #[test]
    fn bad_step_numbering_fails_the_build() {
        let deck = DeckConfig::parse(
            r#"
            [[slides]]
            id = "s"
            [slides.animator]
            steps = [{ step = 2, reveal = [] }]
            "#,
        )
        .unwrap();
        assert!(matches!(deck.build(), Err(DeckError::StepOutOfOrder { .. })));
    }

    #[test]
    fn build_hides_managed_elements() {
        let deck = DeckConfig::parse(
            r#"
            [[slides]]
            id = "s"
            elements = [{ id = "always" }, { id = "later" }]
            [slides.animator]
            steps = [{ step = 1, reveal = ["later"] }]
            "#,
        )
        .unwrap();
        let presentation = deck.build().unwrap();
        assert!(presentation.scene.is_visible(&"always".into()));
        assert!(!presentation.scene.is_visible(&"later".into()));
    }

    #[test]
    fn demo_deck_builds() {
        let presentation = DeckConfig::demo().unwrap().build().unwrap();
        assert!(presentation.deck.len() >= 3);
        for slide in DeckConfig::demo().unwrap().slides {
            assert!(slide.unknown_references().is_empty(), "{}", slide.id);
        }
    }
}
