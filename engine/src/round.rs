//! One round of play.
//!
//! A round owns its pool, the visible glyph, the seen set and the score. The
//! only mutation is [`Round::claim`]:
//!
//! ```text
//! AwaitingClaim --claim == truth--> AwaitingClaim (score + 1, new glyph)
//! AwaitingClaim --claim != truth--> Terminated    (final score reported)
//! ```
//!
//! Invariants: `visible ∈ pool`, `seen ⊆ pool`, and the score only ever moves
//! up by one.

use std::collections::HashSet;

use rand::Rng;
use thiserror::Error;

use seenit_types::{Glyph, GlyphPool};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot start a round with an empty pool")]
pub struct EmptyPoolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    AwaitingClaim,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The claim matched; the round goes on.
    Correct { score: u32 },
    /// The claim was wrong; the round is over.
    Wrong {
        final_score: u32,
        glyph: Glyph,
        was_seen: bool,
    },
}

#[derive(Debug, Clone)]
pub struct Round {
    pool: GlyphPool,
    visible: Glyph,
    seen: HashSet<Glyph>,
    score: u32,
    status: RoundStatus,
}

fn draw<R>(pool: &GlyphPool, rng: &mut R) -> Option<Glyph>
where
    R: Rng + ?Sized,
{
    if pool.is_empty() {
        return None;
    }
    pool.get(rng.random_range(0..pool.len()))
}

impl Round {
    /// Start a round with `baseline` points already banked.
    pub fn new<R>(pool: GlyphPool, baseline: u32, rng: &mut R) -> Result<Self, EmptyPoolError>
    where
        R: Rng + ?Sized,
    {
        let visible = draw(&pool, rng).ok_or(EmptyPoolError)?;
        Ok(Self {
            pool,
            visible,
            seen: HashSet::new(),
            score: baseline,
            status: RoundStatus::AwaitingClaim,
        })
    }

    /// Replace the pool and start over from `baseline`.
    ///
    /// On error the round is left untouched.
    pub fn reset<R>(&mut self, pool: GlyphPool, baseline: u32, rng: &mut R) -> Result<(), EmptyPoolError>
    where
        R: Rng + ?Sized,
    {
        self.visible = draw(&pool, rng).ok_or(EmptyPoolError)?;
        self.pool = pool;
        self.seen.clear();
        self.score = baseline;
        self.status = RoundStatus::AwaitingClaim;
        Ok(())
    }

    /// Judge the player's claim that the visible glyph was already shown.
    ///
    /// Returns `None` once the round has terminated.
    pub fn claim<R>(&mut self, claimed_seen: bool, rng: &mut R) -> Option<ClaimOutcome>
    where
        R: Rng + ?Sized,
    {
        if self.status == RoundStatus::Terminated {
            return None;
        }

        let actually_seen = self.seen.contains(&self.visible);
        if claimed_seen != actually_seen {
            self.status = RoundStatus::Terminated;
            tracing::debug!(
                glyph = %self.visible,
                claimed_seen,
                score = self.score,
                "Wrong claim, round over"
            );
            return Some(ClaimOutcome::Wrong {
                final_score: self.score,
                glyph: self.visible,
                was_seen: actually_seen,
            });
        }

        self.score = self.score.saturating_add(1);
        self.seen.insert(self.visible);
        // The pool is non-empty by construction.
        if let Some(next) = draw(&self.pool, rng) {
            self.visible = next;
        }
        Some(ClaimOutcome::Correct { score: self.score })
    }

    #[must_use]
    pub fn pool(&self) -> &GlyphPool {
        &self.pool
    }

    #[must_use]
    pub fn visible(&self) -> Glyph {
        self.visible
    }

    /// Ground truth for the visible glyph.
    #[must_use]
    pub fn visible_is_seen(&self) -> bool {
        self.seen.contains(&self.visible)
    }

    #[must_use]
    pub fn is_seen(&self, glyph: Glyph) -> bool {
        self.seen.contains(&glyph)
    }

    #[must_use]
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn status(&self) -> RoundStatus {
        self.status
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.status == RoundStatus::Terminated
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use seenit_types::{Glyph, GlyphPool};

    use super::{ClaimOutcome, EmptyPoolError, Round, RoundStatus};

    fn pool_of(chars: &[char]) -> GlyphPool {
        GlyphPool::new(chars.iter().copied().map(Glyph::from))
    }

    fn assert_invariants(round: &Round) {
        assert!(round.pool().contains(round.visible()));
        assert!(round.pool().iter().filter(|g| round.is_seen(*g)).count() == round.seen_count());
    }

    #[test]
    fn empty_pool_is_rejected() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = Round::new(GlyphPool::default(), 0, &mut rng).unwrap_err();
        assert_eq!(err, EmptyPoolError);
    }

    #[test]
    fn claiming_seen_on_first_glyph_terminates() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut round = Round::new(pool_of(&['🐶', '🐱', '🦊']), 0, &mut rng).unwrap();
            let outcome = round.claim(true, &mut rng).unwrap();
            assert!(matches!(
                outcome,
                ClaimOutcome::Wrong {
                    final_score: 0,
                    was_seen: false,
                    ..
                }
            ));
            assert_eq!(round.status(), RoundStatus::Terminated);
        }
    }

    #[test]
    fn truthful_claims_raise_score_by_one_each() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut round = Round::new(pool_of(&['🐶', '🐱', '🦊', '🐻']), 30, &mut rng).unwrap();
        let mut previous_score = round.score();
        let mut previous_seen = round.seen_count();

        for _ in 0..50 {
            let truth = round.visible_is_seen();
            let outcome = round.claim(truth, &mut rng).unwrap();
            assert_eq!(
                outcome,
                ClaimOutcome::Correct {
                    score: previous_score + 1
                }
            );
            assert_eq!(round.score(), previous_score + 1);
            assert!(round.seen_count() >= previous_seen);
            assert_invariants(&round);
            previous_score = round.score();
            previous_seen = round.seen_count();
        }
        assert_eq!(round.score(), 80);
        assert_eq!(round.seen_count(), 4);
    }

    #[test]
    fn repeated_glyph_claimed_new_terminates_with_score_at_that_moment() {
        // A single-glyph pool redraws the same glyph every time.
        let mut rng = StdRng::seed_from_u64(1);
        let mut round = Round::new(pool_of(&['A']), 0, &mut rng).unwrap();
        assert_eq!(round.visible(), Glyph::from('A'));

        let first = round.claim(false, &mut rng).unwrap();
        assert_eq!(first, ClaimOutcome::Correct { score: 1 });
        assert!(round.is_seen(Glyph::from('A')));
        assert_eq!(round.visible(), Glyph::from('A'));

        let second = round.claim(false, &mut rng).unwrap();
        assert_eq!(
            second,
            ClaimOutcome::Wrong {
                final_score: 1,
                glyph: Glyph::from('A'),
                was_seen: true,
            }
        );
        assert!(round.is_terminated());
    }

    #[test]
    fn terminated_round_ignores_claims() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut round = Round::new(pool_of(&['🐶']), 0, &mut rng).unwrap();
        round.claim(true, &mut rng);
        assert!(round.claim(false, &mut rng).is_none());
        assert!(round.claim(true, &mut rng).is_none());
        assert_eq!(round.score(), 0);
    }

    #[test]
    fn exhausted_pool_forces_seen_answers() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut round = Round::new(pool_of(&['🐶', '🐱']), 0, &mut rng).unwrap();
        while round.seen_count() < 2 {
            let truth = round.visible_is_seen();
            round.claim(truth, &mut rng).unwrap();
        }
        for _ in 0..10 {
            assert!(round.visible_is_seen());
            round.claim(true, &mut rng).unwrap();
        }
    }

    #[test]
    fn reset_starts_over_from_baseline() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut round = Round::new(pool_of(&['🐶', '🐱']), 0, &mut rng).unwrap();
        round.claim(false, &mut rng);
        round.claim(true, &mut rng);

        round.reset(pool_of(&['🍎', '🍐', '🍋']), 10, &mut rng).unwrap();
        assert_eq!(round.score(), 10);
        assert_eq!(round.seen_count(), 0);
        assert_eq!(round.status(), RoundStatus::AwaitingClaim);
        assert_eq!(round.pool().len(), 3);
        assert_invariants(&round);
    }

    #[test]
    fn failed_reset_leaves_round_untouched() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut round = Round::new(pool_of(&['🐶', '🐱']), 4, &mut rng).unwrap();
        let visible = round.visible();
        assert!(round.reset(GlyphPool::default(), 0, &mut rng).is_err());
        assert_eq!(round.score(), 4);
        assert_eq!(round.visible(), visible);
    }
}
