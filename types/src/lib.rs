//! Core domain types for Seen It.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod glyph;
mod ids;
mod pool;
mod rank;
mod selector;
pub mod ui;

pub use glyph::{Glyph, GlyphError};
pub use ids::RoundId;
pub use pool::GlyphPool;
pub use rank::{LadderError, RankLadder, RankTier, round_size};
pub use selector::{SelectorParseError, SourceSelector};
pub use ui::{Feedback, Notification, UiOptions};

use std::fmt;

// ============================================================================
// Round start failures
// ============================================================================

/// Why a round could not start.
///
/// Both kinds block play until the player retries; they are reported
/// separately because an empty source will not fix itself on retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The catalog could not be reached or returned something unusable.
    SourceUnavailable,
    /// The catalog answered, but the selected source holds no glyphs.
    EmptyPool,
}

impl FailureKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            FailureKind::SourceUnavailable => "Catalog unavailable",
            FailureKind::EmptyPool => "No glyphs in source",
        }
    }
}

/// A failed round start, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundStartFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl RoundStartFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for RoundStartFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.message)
    }
}
