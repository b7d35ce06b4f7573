//! Load-time errors.
//!
//! Only building a deck can fail. Once a deck is running, animator
//! operations absorb every problem locally (missing elements are skipped)
//! so nothing here is ever returned from `advance` or `reset`.

use std::path::PathBuf;

use thiserror::Error;

use crate::controller::SlideId;

pub type Result<T> = std::result::Result<T, DeckError>;

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("failed to read deck {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid deck description: {0}")]
    Parse(#[from] toml::de::Error),

    /// Step indices must run 1..=N without gaps or repeats.
    #[error("slide '{slide}': expected step {expected}, found step {found}")]
    StepOutOfOrder {
        slide: SlideId,
        expected: u32,
        found: u32,
    },

    #[error("slide '{0}' is registered twice")]
    DuplicateSlide(SlideId),

    #[error("slide '{0}' is not part of the deck")]
    UnknownSlide(SlideId),

    #[error("deck has no slides")]
    EmptyDeck,
}
