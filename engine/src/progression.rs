//! Tier tracking across rounds.
//!
//! Scores are cumulative: a round played at tier `t` starts at
//! `required[t]`, and promotion happens as soon as the score reaches
//! `required[t + 1]`. The tier index is the only thing persisted.

use seenit_types::{RankLadder, RankTier};

use crate::store::RankStore;

/// A completed promotion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Promotion {
    pub from: usize,
    pub to: usize,
    pub tier_name: String,
    pub tier_icon: String,
}

pub struct Progression {
    ladder: RankLadder,
    tier: usize,
    best_score: u32,
    store: Box<dyn RankStore>,
}

impl std::fmt::Debug for Progression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progression")
            .field("tier", &self.tier)
            .field("best_score", &self.best_score)
            .finish_non_exhaustive()
    }
}

impl Progression {
    /// Restore the tier from `store`.
    ///
    /// Nothing stored means the first tier. A store that cannot be read, or a
    /// stored tier past the ceiling, is logged and falls back to something
    /// playable rather than refusing to start.
    pub fn load(ladder: RankLadder, store: Box<dyn RankStore>) -> Self {
        let stored = match store.get_tier() {
            Ok(tier) => tier,
            Err(e) => {
                tracing::warn!("Failed to read saved tier, starting at the first tier: {e}");
                None
            }
        };

        let tier = match stored {
            Some(tier) if tier > ladder.ceiling() => {
                tracing::warn!(
                    stored = tier,
                    ceiling = ladder.ceiling(),
                    "Saved tier is past the ceiling, clamping"
                );
                ladder.ceiling()
            }
            Some(tier) => tier,
            None => 0,
        };

        tracing::info!(tier, "Loaded progression");
        Self {
            ladder,
            tier,
            best_score: 0,
            store,
        }
    }

    #[must_use]
    pub fn ladder(&self) -> &RankLadder {
        &self.ladder
    }

    #[must_use]
    pub fn tier_index(&self) -> usize {
        self.tier
    }

    #[must_use]
    pub fn tier(&self) -> &RankTier {
        self.ladder.tier_clamped(self.tier)
    }

    #[must_use]
    pub fn is_ceiling(&self) -> bool {
        self.ladder.is_ceiling(self.tier)
    }

    /// Score a new round starts from.
    #[must_use]
    pub fn baseline(&self) -> u32 {
        self.tier().required_score()
    }

    /// `None` at the ceiling.
    #[must_use]
    pub fn next_threshold(&self) -> Option<u32> {
        self.ladder.next_threshold(self.tier).ok()
    }

    /// Session high score.
    #[must_use]
    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    /// Pool size for the next round.
    ///
    /// The ceiling has no gap of its own and reuses the top gap of the ladder.
    #[must_use]
    pub fn round_size(&self) -> usize {
        let index = self.tier.min(self.ladder.ceiling() - 1);
        self.ladder.round_size_after(index).unwrap_or(1)
    }

    /// Fraction of the way from the current tier to the next one.
    #[must_use]
    pub fn progress(&self, score: u32) -> f64 {
        let Some(next) = self.next_threshold() else {
            return 1.0;
        };
        let base = self.baseline();
        let gap = f64::from(next - base);
        (f64::from(score.saturating_sub(base)) / gap).clamp(0.0, 1.0)
    }

    /// Observe a score change, promoting if it crossed the next threshold.
    pub fn score_updated(&mut self, score: u32) -> Option<Promotion> {
        self.best_score = self.best_score.max(score);
        if !self.ladder.reaches_next(self.tier, score) {
            return None;
        }

        let from = self.tier;
        let to = from + 1;
        if let Err(e) = self.store.set_tier(to) {
            tracing::warn!(tier = to, "Failed to save promotion: {e}");
        }
        self.tier = to;

        let tier = self.tier();
        let promotion = Promotion {
            from,
            to,
            tier_name: tier.name().to_owned(),
            tier_icon: tier.icon().to_owned(),
        };
        tracing::info!(from, to, tier = %promotion.tier_name, score, "Promoted");
        Some(promotion)
    }

    /// Observe the end of a round. The tier is unchanged.
    pub fn round_terminated(&mut self, final_score: u32) {
        self.best_score = self.best_score.max(final_score);
        tracing::info!(final_score, tier = self.tier, "Round lost");
    }
}
