//! Step-sequenced reveal animator for a single slide.
//!
//! Every advance re-renders visibility from `current_step` instead of
//! toggling the newly revealed elements, so a missed reset can never leave
//! stale elements on screen. Scrolls and side effects are deferred tasks
//! owned by the animator and fire in reveal -> scroll -> side effect order.

use std::time::Duration;

use tracing::{debug, trace};

use crate::affordance::{ScrollWatch, WatchHandle};
use crate::controller::{Advance, SlideController, SlideId};
use crate::scheduler::{Scheduler, TaskHandle};
use crate::state::AnimatorState;
use crate::steps::{Policy, SlideStepSpec, Stagger};
use crate::view::{ElementId, Height, ScrollBehavior, ViewBinding};

#[derive(Debug, Clone, PartialEq)]
enum Deferred {
    Scroll(ElementId),
    RefreshOverflow,
    SideEffect(u32),
    Expand(ElementId),
    AddClass { id: ElementId, class: String },
    RestoreTransitions,
    InstallWatch,
    Entrance,
}

#[derive(Debug)]
pub struct StepAnimator {
    slide: SlideId,
    spec: SlideStepSpec,
    state: AnimatorState,
    scheduler: Scheduler<Deferred>,
    // Tasks spawned by steps; dropped when the sequence wraps around.
    step_tasks: Vec<TaskHandle>,
    watch: Option<ScrollWatch>,
}

impl StepAnimator {
    pub fn new(slide: SlideId, spec: SlideStepSpec) -> Self {
        let watch = spec.scroll_watch().cloned().map(ScrollWatch::new);
        Self {
            slide,
            spec,
            state: AnimatorState::default(),
            scheduler: Scheduler::new(),
            step_tasks: Vec::new(),
            watch,
        }
    }

    pub fn state(&self) -> AnimatorState {
        self.state
    }

    pub fn spec(&self) -> &SlideStepSpec {
        &self.spec
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    pub fn is_watching_scroll(&self) -> bool {
        self.watch.as_ref().is_some_and(ScrollWatch::is_installed)
    }

    pub fn advance(&mut self, active: &SlideId, view: &mut dyn ViewBinding) -> Advance {
        if *active != self.slide {
            return Advance::Inactive;
        }

        let max = self.spec.max_steps();
        match self.spec.policy() {
            Policy::Wrap => {
                let next = (self.state.current_step + 1) % (max + 1);
                self.state.current_step = next;
                self.render(view);
                if self.state.is_at_rest() {
                    self.cancel_step_tasks();
                    self.rest_visuals(view);
                } else {
                    self.schedule_step_effects(next);
                }
                debug!(slide = %self.slide, step = next, "advanced");
                Advance::Consumed
            }
            Policy::Clamp => {
                if self.state.current_step < max {
                    self.state.current_step += 1;
                    let step = self.state.current_step;
                    self.render(view);
                    self.schedule_step_effects(step);
                    debug!(slide = %self.slide, step, "advanced");
                    Advance::Consumed
                } else {
                    // Visuals stay until the navigator resets the slide it leaves.
                    self.state.current_step = 0;
                    debug!(slide = %self.slide, "steps exhausted");
                    Advance::Exhausted
                }
            }
        }
    }

    pub fn reset(&mut self, view: &mut dyn ViewBinding) {
        let dropped = self.scheduler.clear();
        self.step_tasks.clear();
        self.state.current_step = 0;

        let instant = self.spec.instant_reset();
        if instant {
            for id in self.spec.managed() {
                view.set_transitions(id, false);
            }
        }

        for id in self.spec.managed().iter().chain(self.spec.reset_also()) {
            if !view.set_visible(id, false) {
                trace!(slide = %self.slide, element = %id, "skipping missing element");
            }
        }

        for def in self.spec.steps() {
            let Some(effect) = &def.side_effect else {
                continue;
            };
            for id in &effect.show {
                view.set_visible(id, false);
                view.set_height(id, Height::Collapsed);
            }
            if let Some(id) = &effect.expand {
                view.set_height(id, Height::Auto);
            }
            if let Some(stagger) = &effect.stagger {
                clear_stagger(stagger, view);
            }
        }

        if let Some(entrance) = self.spec.entrance() {
            for stagger in &entrance.staggers {
                clear_stagger(stagger, view);
            }
        }

        self.rest_visuals(view);

        if let Some(watch) = self.watch.as_mut() {
            watch.detach(view);
        }

        if instant {
            self.scheduler
                .schedule(self.spec.timing().transition_restore(), Deferred::RestoreTransitions);
        }

        debug!(slide = %self.slide, cancelled = dropped, "reset");
    }

    /// Slide activation: schedules the scroll watch and the entrance
    /// sequence, if the slide has them.
    pub fn initialize(&mut self, _view: &mut dyn ViewBinding) {
        if self.watch.is_some() {
            self.scheduler
                .schedule(self.spec.timing().watch_setup(), Deferred::InstallWatch);
        }
        if let Some(entrance) = self.spec.entrance() {
            let delay = Duration::from_millis(entrance.delay_ms);
            self.scheduler.schedule(delay, Deferred::Entrance);
        }
    }

    /// Installs the scroll watch right away. `None` if the slide has none.
    pub fn setup_scroll_affordance(&mut self, view: &mut dyn ViewBinding) -> Option<WatchHandle> {
        self.watch.as_mut().map(|watch| watch.install(view))
    }

    pub fn cancel_scroll_affordance(&mut self, handle: WatchHandle, view: &mut dyn ViewBinding) -> bool {
        self.watch
            .as_mut()
            .is_some_and(|watch| watch.cancel(handle, view))
    }

    pub fn on_scroll(&mut self, view: &mut dyn ViewBinding) {
        if let Some(watch) = self.watch.as_mut() {
            watch.on_scroll(view);
        }
    }

    /// Runs every deferred task that falls due within the next `dt`.
    pub fn tick(&mut self, dt: Duration, view: &mut dyn ViewBinding) {
        let deadline = self.scheduler.now().saturating_add(dt);
        while let Some(task) = self.scheduler.pop_due(deadline) {
            trace!(slide = %self.slide, ?task, "deferred task");
            self.run(task, view);
        }
        self.scheduler.set_now(deadline);
    }

    fn render(&self, view: &mut dyn ViewBinding) {
        let revealed = self.spec.revealed_at(self.state.current_step);
        for id in self.spec.managed() {
            if !view.set_visible(id, revealed.contains(id)) {
                trace!(slide = %self.slide, element = %id, "skipping missing element");
            }
        }
    }

    /// Scroll position back to the top and no overflow affordance.
    fn rest_visuals(&mut self, view: &mut dyn ViewBinding) {
        if let Some(container) = self.spec.container() {
            view.scroll_to(container, 0.0, ScrollBehavior::Instant);
        }
        if let Some(host) = self.spec.affordance_host() {
            view.set_class(host, self.spec.affordance_class(), false);
        }
        self.state.has_overflow = false;
    }

    fn schedule_step_effects(&mut self, step: u32) {
        let Some(def) = self.spec.step(step) else {
            return;
        };
        let scroll = def
            .scroll
            .clone()
            .filter(|_| self.spec.container().is_some());
        let has_side_effect = def.side_effect.is_some();

        let timing = *self.spec.timing();
        if let Some(target) = scroll {
            self.schedule_step_task(timing.scroll_delay(), Deferred::Scroll(target));
        }
        if has_side_effect {
            self.schedule_step_task(timing.side_effect_delay(), Deferred::SideEffect(step));
        }
    }

    fn schedule_step_task(&mut self, delay: Duration, task: Deferred) {
        let now = self.scheduler.now();
        self.step_tasks.retain(|handle| handle.due() > now);
        let handle = self.scheduler.schedule(delay, task);
        self.step_tasks.push(handle);
    }

    fn cancel_step_tasks(&mut self) {
        for handle in self.step_tasks.drain(..) {
            self.scheduler.cancel(handle);
        }
    }

    fn run(&mut self, task: Deferred, view: &mut dyn ViewBinding) {
        match task {
            Deferred::Scroll(target) => {
                let Some(container) = self.spec.container() else {
                    return;
                };
                if view.scroll_into_center(container, &target, ScrollBehavior::Smooth) {
                    let delay = self.spec.timing().overflow_check();
                    self.schedule_step_task(delay, Deferred::RefreshOverflow);
                } else {
                    trace!(slide = %self.slide, element = %target, "scroll target missing");
                }
            }
            Deferred::RefreshOverflow => {
                let Some(metrics) = self.spec.container().and_then(|c| view.scroll_metrics(c)) else {
                    return;
                };
                self.state.has_overflow = metrics.overflows();
                if let Some(host) = self.spec.affordance_host() {
                    view.set_class(host, self.spec.affordance_class(), self.state.has_overflow);
                }
            }
            Deferred::SideEffect(step) => {
                let Some(effect) = self.spec.step(step).and_then(|def| def.side_effect.clone()) else {
                    return;
                };
                for id in &effect.show {
                    view.set_height(id, Height::Auto);
                    view.set_visible(id, true);
                }
                if let Some(id) = effect.expand {
                    let delay = self.spec.timing().expand_settle();
                    self.schedule_step_task(delay, Deferred::Expand(id));
                }
                if let Some(stagger) = effect.stagger {
                    for (i, id) in stagger.targets.iter().enumerate() {
                        let task = Deferred::AddClass {
                            id: id.clone(),
                            class: stagger.class.clone(),
                        };
                        self.schedule_step_task(stagger.offset(i), task);
                    }
                }
            }
            Deferred::Expand(id) => {
                if let Some(height) = view.natural_height(&id) {
                    view.set_height(&id, Height::Px(height));
                }
            }
            Deferred::AddClass { id, class } => {
                view.set_class(&id, &class, true);
            }
            Deferred::RestoreTransitions => {
                for id in self.spec.managed() {
                    view.set_transitions(id, true);
                }
            }
            Deferred::InstallWatch => {
                if let Some(watch) = self.watch.as_mut() {
                    watch.install(view);
                }
            }
            Deferred::Entrance => {
                let Some(entrance) = self.spec.entrance() else {
                    return;
                };
                let tasks: Vec<_> = entrance
                    .staggers
                    .iter()
                    .flat_map(|stagger| {
                        stagger.targets.iter().enumerate().map(|(i, id)| {
                            let task = Deferred::AddClass {
                                id: id.clone(),
                                class: stagger.class.clone(),
                            };
                            (stagger.offset(i), task)
                        })
                    })
                    .collect();
                for (delay, task) in tasks {
                    self.scheduler.schedule(delay, task);
                }
            }
        }
    }
}

fn clear_stagger(stagger: &Stagger, view: &mut dyn ViewBinding) {
    for id in &stagger.targets {
        view.set_class(id, &stagger.class, false);
    }
}

impl SlideController for StepAnimator {
    fn slide(&self) -> &SlideId {
        &self.slide
    }

    fn advance(&mut self, active: &SlideId, view: &mut dyn ViewBinding) -> Advance {
        StepAnimator::advance(self, active, view)
    }

    fn reset(&mut self, view: &mut dyn ViewBinding) {
        StepAnimator::reset(self, view)
    }

    fn initialize(&mut self, view: &mut dyn ViewBinding) {
        StepAnimator::initialize(self, view)
    }

    fn intercepts_navigation(&self) -> bool {
        self.spec.policy() == Policy::Clamp
    }

    fn tick(&mut self, dt: Duration, view: &mut dyn ViewBinding) {
        StepAnimator::tick(self, dt, view)
    }

    fn on_scroll(&mut self, view: &mut dyn ViewBinding) {
        StepAnimator::on_scroll(self, view)
    }

    fn current_step(&self) -> u32 {
        self.state.current_step
    }
}
