//! Declarative description of one slide's step sequence.
//!
//! `AnimatorConfig` is what a deck file contains; `SlideStepSpec` is the
//! same data after step numbering has been checked.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::controller::SlideId;
use crate::error::{DeckError, Result};
use crate::view::ElementId;

/// What happens when `advance` is called past the last step.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Cycle back to step 0 and keep consuming input.
    #[default]
    Wrap,
    /// Stop at the last step and report exhaustion on the next call.
    Clamp,
}

/// Adds `class` to each target in turn, `interval` apart.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Stagger {
    pub targets: Vec<ElementId>,
    pub class: String,
    #[serde(default)]
    pub start_ms: u64,
    pub interval_ms: u64,
}

impl Stagger {
    pub fn new(targets: Vec<ElementId>, class: impl Into<String>, start_ms: u64, interval_ms: u64) -> Self {
        Self {
            targets,
            class: class.into(),
            start_ms,
            interval_ms,
        }
    }

    /// Delay before the `index`-th target gets its class.
    pub fn offset(&self, index: usize) -> Duration {
        let delay = (index as u64).saturating_mul(self.interval_ms);
        Duration::from_millis(self.start_ms.saturating_add(delay))
    }
}

/// Secondary action started once a step's reveal has settled.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct SideEffect {
    /// Shown as soon as the effect starts.
    #[serde(default)]
    pub show: Vec<ElementId>,
    /// Grown to its natural height shortly after.
    pub expand: Option<ElementId>,
    pub stagger: Option<Stagger>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct StepDef {
    pub step: u32,
    #[serde(default)]
    pub reveal: Vec<ElementId>,
    pub scroll: Option<ElementId>,
    pub side_effect: Option<SideEffect>,
}

impl StepDef {
    pub fn new(step: u32, reveal: &[&str]) -> Self {
        Self {
            step,
            reveal: reveal.iter().map(|id| ElementId::from(*id)).collect(),
            scroll: None,
            side_effect: None,
        }
    }

    pub fn with_scroll(mut self, target: &str) -> Self {
        self.scroll = Some(target.into());
        self
    }

    pub fn with_side_effect(mut self, effect: SideEffect) -> Self {
        self.side_effect = Some(effect);
        self
    }
}

/// Sequence run by `initialize()` when the slide is entered.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Entrance {
    #[serde(default = "default_entrance_delay")]
    pub delay_ms: u64,
    #[serde(default)]
    pub staggers: Vec<Stagger>,
}

fn default_entrance_delay() -> u64 {
    ENTRANCE_DELAY.as_millis() as u64
}

/// Toggles `class` on `host` while `source` is scrolled or overflowing.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ScrollWatchConfig {
    pub source: ElementId,
    pub host: ElementId,
    #[serde(default = "default_scrolled_class")]
    pub class: String,
    #[serde(default = "default_scrolled_threshold")]
    pub scrolled_threshold: f32,
    #[serde(default = "default_overflow_margin")]
    pub overflow_margin: f32,
}

fn default_scrolled_class() -> String {
    SCROLLED_CLASS.to_string()
}

fn default_scrolled_threshold() -> f32 {
    SCROLLED_THRESHOLD
}

fn default_overflow_margin() -> f32 {
    OVERFLOW_MARGIN
}

/// Per-slide delays, in milliseconds.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct Timing {
    pub scroll_delay_ms: u64,
    pub overflow_check_ms: u64,
    pub side_effect_delay_ms: u64,
    pub expand_settle_ms: u64,
    pub transition_restore_ms: u64,
    pub watch_setup_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            scroll_delay_ms: SCROLL_DELAY.as_millis() as u64,
            overflow_check_ms: OVERFLOW_CHECK_DELAY.as_millis() as u64,
            side_effect_delay_ms: SIDE_EFFECT_DELAY.as_millis() as u64,
            expand_settle_ms: EXPAND_SETTLE_DELAY.as_millis() as u64,
            transition_restore_ms: TRANSITION_RESTORE_DELAY.as_millis() as u64,
            watch_setup_ms: WATCH_SETUP_DELAY.as_millis() as u64,
        }
    }
}

impl Timing {
    pub fn scroll_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_delay_ms)
    }

    pub fn overflow_check(&self) -> Duration {
        Duration::from_millis(self.overflow_check_ms)
    }

    pub fn side_effect_delay(&self) -> Duration {
        Duration::from_millis(self.side_effect_delay_ms)
    }

    pub fn expand_settle(&self) -> Duration {
        Duration::from_millis(self.expand_settle_ms)
    }

    pub fn transition_restore(&self) -> Duration {
        Duration::from_millis(self.transition_restore_ms)
    }

    pub fn watch_setup(&self) -> Duration {
        Duration::from_millis(self.watch_setup_ms)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct AnimatorConfig {
    #[serde(default)]
    pub policy: Policy,
    /// Scrollable container that scroll targets live in.
    pub container: Option<ElementId>,
    /// Element that receives the overflow affordance class.
    pub affordance_host: Option<ElementId>,
    #[serde(default = "default_affordance_class")]
    pub affordance_class: String,
    #[serde(default)]
    pub steps: Vec<StepDef>,
    /// Hidden by an explicit reset only, never by wrapping around.
    #[serde(default)]
    pub reset_also: Vec<ElementId>,
    pub entrance: Option<Entrance>,
    pub scroll_watch: Option<ScrollWatchConfig>,
    #[serde(default)]
    pub timing: Timing,
    /// Reset without playing the hide transitions.
    #[serde(default)]
    pub instant_reset: bool,
}

fn default_affordance_class() -> String {
    AFFORDANCE_CLASS.to_string()
}

impl AnimatorConfig {
    pub fn new(policy: Policy, steps: Vec<StepDef>) -> Self {
        Self {
            policy,
            affordance_class: default_affordance_class(),
            steps,
            ..Default::default()
        }
    }

    pub fn with_container(mut self, container: &str, affordance_host: Option<&str>) -> Self {
        self.container = Some(container.into());
        self.affordance_host = affordance_host.map(ElementId::from);
        self
    }
}

/// A validated step sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideStepSpec {
    config: AnimatorConfig,
    managed: Vec<ElementId>,
}

impl SlideStepSpec {
    /// Checks that steps are numbered 1..=N in order and precomputes the
    /// set of elements the animator is responsible for.
    pub fn new(slide: &SlideId, config: AnimatorConfig) -> Result<Self> {
        for (position, def) in config.steps.iter().enumerate() {
            let expected = position as u32 + 1;
            if def.step != expected {
                return Err(DeckError::StepOutOfOrder {
                    slide: slide.clone(),
                    expected,
                    found: def.step,
                });
            }
        }

        let mut seen = BTreeSet::new();
        let managed = config
            .steps
            .iter()
            .flat_map(|def| def.reveal.iter())
            .filter(|id| seen.insert(*id))
            .cloned()
            .collect();

        Ok(Self { config, managed })
    }

    pub fn policy(&self) -> Policy {
        self.config.policy
    }

    pub fn max_steps(&self) -> u32 {
        self.config.steps.len() as u32
    }

    /// 1-based, `None` for step 0 or out of range.
    pub fn step(&self, step: u32) -> Option<&StepDef> {
        step.checked_sub(1)
            .and_then(|i| self.config.steps.get(i as usize))
    }

    pub fn steps(&self) -> &[StepDef] {
        &self.config.steps
    }

    /// Every element any step reveals, in first-reveal order.
    pub fn managed(&self) -> &[ElementId] {
        &self.managed
    }

    /// Union of the reveal targets of steps `1..=step`.
    pub fn revealed_at(&self, step: u32) -> BTreeSet<&ElementId> {
        self.config
            .steps
            .iter()
            .take(step as usize)
            .flat_map(|def| def.reveal.iter())
            .collect()
    }

    pub fn container(&self) -> Option<&ElementId> {
        self.config.container.as_ref()
    }

    pub fn affordance_host(&self) -> Option<&ElementId> {
        self.config.affordance_host.as_ref()
    }

    pub fn affordance_class(&self) -> &str {
        &self.config.affordance_class
    }

    pub fn reset_also(&self) -> &[ElementId] {
        &self.config.reset_also
    }

    pub fn entrance(&self) -> Option<&Entrance> {
        self.config.entrance.as_ref()
    }

    pub fn scroll_watch(&self) -> Option<&ScrollWatchConfig> {
        self.config.scroll_watch.as_ref()
    }

    pub fn timing(&self) -> &Timing {
        &self.config.timing
    }

    pub fn instant_reset(&self) -> bool {
        self.config.instant_reset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slide() -> SlideId {
        SlideId::from("slide")
    }

    #[test]
    fn rejects_gaps_in_step_numbers() {
        let config = AnimatorConfig::new(
            Policy::Wrap,
            vec![StepDef::new(1, &["a"]), StepDef::new(3, &["b"])],
        );
        match SlideStepSpec::new(&slide(), config) {
            Err(DeckError::StepOutOfOrder { expected, found, .. }) => {
                assert_eq!((expected, found), (2, 3));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn stagger_offsets_saturate() {
        let stagger = Stagger::new(vec![], "pulse", u64::MAX - 10, u64::MAX / 2);
        assert_eq!(stagger.offset(0), Duration::from_millis(u64::MAX - 10));
        assert_eq!(stagger.offset(3), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn rejects_zero_based_numbering() {
        let config = AnimatorConfig::new(Policy::Clamp, vec![StepDef::new(0, &["a"])]);
        assert!(SlideStepSpec::new(&slide(), config).is_err());
    }

    #[test]
    fn reveal_sets_are_cumulative() {
        let config = AnimatorConfig::new(
            Policy::Wrap,
            vec![
                StepDef::new(1, &["a"]),
                StepDef::new(2, &["b", "c"]),
                StepDef::new(3, &["d"]),
            ],
        );
        let spec = SlideStepSpec::new(&slide(), config).unwrap();

        assert!(spec.revealed_at(0).is_empty());
        let at_two: Vec<_> = spec.revealed_at(2).into_iter().map(|id| id.as_str()).collect();
        assert_eq!(at_two, vec!["a", "b", "c"]);
        assert_eq!(spec.revealed_at(99).len(), 4);
    }

    #[test]
    fn managed_elements_are_deduplicated() {
        let config = AnimatorConfig::new(
            Policy::Wrap,
            vec![StepDef::new(1, &["a", "b"]), StepDef::new(2, &["b", "c"])],
        );
        let spec = SlideStepSpec::new(&slide(), config).unwrap();
        let managed: Vec<_> = spec.managed().iter().map(|id| id.as_str()).collect();
        assert_eq!(managed, vec!["a", "b", "c"]);
    }

    #[test]
    fn step_lookup_is_one_based() {
        let config = AnimatorConfig::new(Policy::Clamp, vec![StepDef::new(1, &["a"])]);
        let spec = SlideStepSpec::new(&slide(), config).unwrap();
        assert!(spec.step(0).is_none());
        assert_eq!(spec.step(1).map(|def| def.step), Some(1));
        assert!(spec.step(2).is_none());
    }

    #[test]
    fn stagger_offsets() {
        let stagger = Stagger::new(vec!["a".into(), "b".into(), "c".into()], "pulse", 600, 800);
        assert_eq!(stagger.offset(0), Duration::from_millis(600));
        assert_eq!(stagger.offset(2), Duration::from_millis(2200));
    }
}
