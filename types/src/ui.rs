//! UI state types shared by the engine (ownership) and the tui (rendering).
//!
//! Pure data, no ratatui dependency.

/// UI configuration options derived from config/environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
    pub reduced_motion: bool,
}

/// Outcome of the player's most recent claim, shown until the next one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Feedback {
    #[default]
    None,
    Correct,
    Wrong,
}

/// A one-shot message for the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The round ended on a wrong claim.
    Lost {
        final_score: u32,
        /// The glyph that was misjudged.
        glyph: crate::Glyph,
        was_seen: bool,
    },
    /// The player reached a new tier.
    Promoted { tier_name: String, tier_icon: String },
}
