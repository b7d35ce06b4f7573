//! Step-sequenced reveal animation for slide decks.
//!
//! A [`StepAnimator`] owns one slide's step counter, re-renders element
//! visibility from it, and schedules the scrolls and secondary effects of
//! each step as cancellable deferred tasks. A [`Deck`] maps slide ids to
//! controllers and routes navigation input. Rendering goes through the
//! [`ViewBinding`] trait; [`Scene`] is the in-memory implementation.

pub mod affordance;
pub mod animator;
pub mod config;
pub mod constants;
pub mod controller;
pub mod deck;
pub mod error;
pub mod scene;
pub mod scheduler;
pub mod state;
pub mod steps;
pub mod view;

pub use animator::StepAnimator;
pub use config::{DeckConfig, Presentation};
pub use controller::{Advance, SlideController, SlideId};
pub use deck::{Deck, Navigation};
pub use error::{DeckError, Result};
pub use scene::Scene;
pub use steps::{AnimatorConfig, Policy, SideEffect, SlideStepSpec, Stagger, StepDef};
pub use view::{ElementId, ViewBinding};
