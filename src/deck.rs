//! Slide order, the navigation cursor, and the one registry of slide
//! controllers keyed by slide id.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, info};

use crate::controller::{Advance, SlideController, SlideId};
use crate::error::{DeckError, Result};
use crate::view::ViewBinding;

/// Result of a navigation input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// The current slide's controller consumed the input.
    Stepped { step: u32 },
    Moved { from: usize, to: usize },
    /// Nothing to do: first/last slide, or no controller.
    Stayed,
}

pub struct Deck {
    slides: Vec<SlideId>,
    controllers: HashMap<SlideId, Box<dyn SlideController>>,
    current: usize,
}

impl Deck {
    pub fn new(slides: Vec<SlideId>) -> Result<Self> {
        if slides.is_empty() {
            return Err(DeckError::EmptyDeck);
        }
        for (i, id) in slides.iter().enumerate() {
            if slides[..i].contains(id) {
                return Err(DeckError::DuplicateSlide(id.clone()));
            }
        }
        Ok(Self {
            slides,
            controllers: HashMap::new(),
            current: 0,
        })
    }

    /// Attaches a controller to the slide it names. Each slide takes at most
    /// one controller, and the slide must be part of the deck.
    pub fn register(&mut self, controller: Box<dyn SlideController>) -> Result<()> {
        let id = controller.slide().clone();
        if !self.slides.contains(&id) {
            return Err(DeckError::UnknownSlide(id));
        }
        if self.controllers.contains_key(&id) {
            return Err(DeckError::DuplicateSlide(id));
        }
        debug!(slide = %id, "controller registered");
        self.controllers.insert(id, controller);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn slides(&self) -> &[SlideId] {
        &self.slides
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_slide(&self) -> &SlideId {
        &self.slides[self.current]
    }

    pub fn controller(&self, id: &SlideId) -> Option<&dyn SlideController> {
        self.controllers.get(id).map(|c| c.as_ref())
    }

    pub fn current_step(&self) -> u32 {
        self.controller(self.current_slide())
            .map_or(0, |c| c.current_step())
    }

    /// Enters the first slide. Call once after registration.
    pub fn start(&mut self, view: &mut dyn ViewBinding) {
        let id = self.slides[self.current].clone();
        if let Some(c) = self.controllers.get_mut(&id) {
            c.initialize(view);
        }
        info!(slide = %id, "deck started");
    }

    /// Keyboard-style "next": offered to a navigation-intercepting
    /// controller first, otherwise moves to the following slide.
    pub fn next(&mut self, view: &mut dyn ViewBinding) -> Navigation {
        let id = self.slides[self.current].clone();
        if let Some(c) = self.controllers.get_mut(&id) {
            if c.intercepts_navigation() && c.advance(&id, view) == Advance::Consumed {
                return Navigation::Stepped {
                    step: c.current_step(),
                };
            }
        }
        self.goto(self.current + 1, view)
    }

    /// Click-style input on the current slide; never navigates.
    pub fn step(&mut self, view: &mut dyn ViewBinding) -> Navigation {
        let id = self.slides[self.current].clone();
        match self.controllers.get_mut(&id) {
            Some(c) => {
                if c.advance(&id, view) == Advance::Consumed {
                    Navigation::Stepped {
                        step: c.current_step(),
                    }
                } else {
                    Navigation::Stayed
                }
            }
            None => Navigation::Stayed,
        }
    }

    pub fn prev(&mut self, view: &mut dyn ViewBinding) -> Navigation {
        match self.current.checked_sub(1) {
            Some(index) => self.goto(index, view),
            None => Navigation::Stayed,
        }
    }

    /// Leaves the current slide (resetting it) and enters `index`
    /// (initializing it). Out-of-range or same-slide targets are ignored.
    pub fn goto(&mut self, index: usize, view: &mut dyn ViewBinding) -> Navigation {
        if index >= self.slides.len() || index == self.current {
            return Navigation::Stayed;
        }
        let from = self.current;
        if let Some(c) = self.controllers.get_mut(&self.slides[from]) {
            c.reset(view);
        }
        self.current = index;
        if let Some(c) = self.controllers.get_mut(&self.slides[index]) {
            c.initialize(view);
        }
        info!(from = %self.slides[from], to = %self.slides[index], "slide changed");
        Navigation::Moved { from, to: index }
    }

    /// Resets the current slide in place and re-enters it.
    pub fn reset_current(&mut self, view: &mut dyn ViewBinding) {
        let id = &self.slides[self.current];
        if let Some(c) = self.controllers.get_mut(id) {
            c.reset(view);
            c.initialize(view);
        }
    }

    /// Timers run for every slide, so deferred work scheduled by a reset on
    /// the way out still completes.
    pub fn tick(&mut self, dt: Duration, view: &mut dyn ViewBinding) {
        for id in &self.slides {
            if let Some(c) = self.controllers.get_mut(id) {
                c.tick(dt, view);
            }
        }
    }

    pub fn on_scroll(&mut self, view: &mut dyn ViewBinding) {
        if let Some(c) = self.controllers.get_mut(&self.slides[self.current]) {
            c.on_scroll(view);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_duplicate_slides() {
        assert!(matches!(Deck::new(vec![]), Err(DeckError::EmptyDeck)));
        assert!(matches!(
            Deck::new(vec!["a".into(), "b".into(), "a".into()]),
            Err(DeckError::DuplicateSlide(_))
        ));
    }
}
