//! The rank ladder.
//!
//! Tiers are ordered by a cumulative score threshold. The last tier is the
//! ceiling: it can be reached but there is nothing above it, so every lookup
//! that needs "the next tier" fails there with [`LadderError::OutOfRange`].

use thiserror::Error;

/// Round size is `floor(gap * 3 / 4)`: deliberately smaller than the score
/// gap, so a round that reaches the next threshold must repeat glyphs.
const ROUND_SIZE_NUMERATOR: u64 = 3;
const ROUND_SIZE_DENOMINATOR: u64 = 4;

/// Pool size for a round that has to cover `gap` points.
///
/// Integer arithmetic, so there is no float rounding at tier boundaries.
#[must_use]
pub fn round_size(gap: u32) -> usize {
    (u64::from(gap) * ROUND_SIZE_NUMERATOR / ROUND_SIZE_DENOMINATOR) as usize
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankTier {
    name: String,
    icon: String,
    required_score: u32,
}

impl RankTier {
    pub fn new(name: impl Into<String>, icon: impl Into<String>, required_score: u32) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            required_score,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    #[must_use]
    pub fn required_score(&self) -> u32 {
        self.required_score
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LadderError {
    #[error("a ladder needs at least two tiers, got {len}")]
    TooFewTiers { len: usize },
    #[error("the first tier must require 0 points, not {score}")]
    NonZeroBase { score: u32 },
    #[error("tier {index} does not require more points than the tier below it")]
    NotIncreasing { index: usize },
    #[error("the gap below tier {index} is too small to size a round")]
    GapTooSmall { index: usize },
    #[error("tier index {index} is past the ceiling (ladder has {len} tiers)")]
    OutOfRange { index: usize, len: usize },
}

/// Ordered, immutable table of tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankLadder {
    tiers: Vec<RankTier>,
}

impl RankLadder {
    /// Validate and build a ladder.
    ///
    /// Every gap must yield a round of at least one glyph, which rules out
    /// gaps of 0 and 1.
    pub fn new(tiers: Vec<RankTier>) -> Result<Self, LadderError> {
        if tiers.len() < 2 {
            return Err(LadderError::TooFewTiers { len: tiers.len() });
        }
        if tiers[0].required_score != 0 {
            return Err(LadderError::NonZeroBase {
                score: tiers[0].required_score,
            });
        }
        for (index, pair) in tiers.windows(2).enumerate() {
            let (lower, upper) = (&pair[0], &pair[1]);
            if upper.required_score <= lower.required_score {
                return Err(LadderError::NotIncreasing { index: index + 1 });
            }
            if round_size(upper.required_score - lower.required_score) == 0 {
                return Err(LadderError::GapTooSmall { index: index + 1 });
            }
        }
        Ok(Self { tiers })
    }

    /// Bronze through Challenger.
    #[must_use]
    pub fn standard() -> Self {
        let tiers = vec![
            RankTier::new("Bronze", "🥉", 0),
            RankTier::new("Silver", "🥈", 10),
            RankTier::new("Gold", "🥇", 30),
            RankTier::new("Platinum", "💠", 60),
            RankTier::new("Diamond", "💎", 100),
            RankTier::new("Master", "🔮", 150),
            RankTier::new("Grandmaster", "👑", 210),
            RankTier::new("Challenger", "🏆", 280),
        ];
        Self { tiers }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Always false: construction requires at least two tiers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Index of the ceiling tier.
    #[must_use]
    pub fn ceiling(&self) -> usize {
        self.tiers.len() - 1
    }

    #[must_use]
    pub fn is_ceiling(&self, index: usize) -> bool {
        index >= self.ceiling()
    }

    pub fn tier(&self, index: usize) -> Result<&RankTier, LadderError> {
        self.tiers.get(index).ok_or(LadderError::OutOfRange {
            index,
            len: self.tiers.len(),
        })
    }

    /// The tier at `index`, or the ceiling for anything past it.
    #[must_use]
    pub fn tier_clamped(&self, index: usize) -> &RankTier {
        &self.tiers[index.min(self.ceiling())]
    }

    pub fn tiers(&self) -> impl Iterator<Item = &RankTier> {
        self.tiers.iter()
    }

    /// Score required to leave `index` for the tier above it.
    pub fn next_threshold(&self, index: usize) -> Result<u32, LadderError> {
        self.tier(index + 1).map(RankTier::required_score)
    }

    /// `required[index + 1] - required[index]`.
    pub fn gap_after(&self, index: usize) -> Result<u32, LadderError> {
        let current = self.tier(index)?.required_score;
        let next = self.next_threshold(index)?;
        Ok(next - current)
    }

    /// Pool size for a round played at `index`.
    pub fn round_size_after(&self, index: usize) -> Result<usize, LadderError> {
        self.gap_after(index).map(round_size)
    }

    /// Whether `score` is enough to leave tier `index`.
    ///
    /// False at the ceiling, where there is nothing to reach.
    #[must_use]
    pub fn reaches_next(&self, index: usize, score: u32) -> bool {
        self.next_threshold(index)
            .is_ok_and(|threshold| score >= threshold)
    }
}

impl Default for RankLadder {
    fn default() -> Self {
        Self::standard()
    }
}
