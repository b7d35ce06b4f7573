//! Scroll-position watch that keeps an affordance class in sync.

use tracing::trace;

use crate::steps::ScrollWatchConfig;
use crate::view::{ScrollMetrics, ViewBinding};

/// Detaches the watch it was returned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchHandle(u64);

#[derive(Debug)]
pub struct ScrollWatch {
    config: ScrollWatchConfig,
    installed: Option<WatchHandle>,
    generation: u64,
}

impl ScrollWatch {
    pub fn new(config: ScrollWatchConfig) -> Self {
        Self {
            config,
            installed: None,
            generation: 0,
        }
    }

    pub fn is_installed(&self) -> bool {
        self.installed.is_some()
    }

    /// Starts watching, replacing any earlier installation, and evaluates
    /// the current scroll position once.
    pub fn install(&mut self, view: &mut dyn ViewBinding) -> WatchHandle {
        self.generation += 1;
        let handle = WatchHandle(self.generation);
        self.installed = Some(handle);
        self.check(view);
        handle
    }

    /// Stops watching and removes the class. Stale or repeated handles are
    /// ignored.
    pub fn cancel(&mut self, handle: WatchHandle, view: &mut dyn ViewBinding) -> bool {
        if self.installed != Some(handle) {
            return false;
        }
        self.installed = None;
        view.set_class(&self.config.host, &self.config.class, false);
        true
    }

    /// Detaches whatever is installed. Safe to call when nothing is.
    pub fn detach(&mut self, view: &mut dyn ViewBinding) {
        if let Some(handle) = self.installed {
            self.cancel(handle, view);
        }
    }

    /// Scroll notification. Does nothing while detached.
    pub fn on_scroll(&mut self, view: &mut dyn ViewBinding) {
        if self.installed.is_some() {
            self.check(view);
        }
    }

    fn check(&self, view: &mut dyn ViewBinding) {
        let Some(metrics) = view.scroll_metrics(&self.config.source) else {
            trace!(source = %self.config.source, "scroll watch source missing");
            return;
        };
        let on = self.wants_class(&metrics);
        view.set_class(&self.config.host, &self.config.class, on);
    }

    fn wants_class(&self, metrics: &ScrollMetrics) -> bool {
        metrics.scroll_top > self.config.scrolled_threshold
            || metrics.scroll_height > metrics.client_height + self.config.overflow_margin
    }
}
