//! The game controller.
//!
//! `Game` is the single owner of play state. It never does IO: a new round is
//! requested by handing a [`RoundRequest`] to the caller, and the fetched pool
//! comes back through [`Game::deliver_pool`]. Every request carries a fresh
//! [`RoundId`]; a delivery for any other id is stale and dropped.
//!
//! ```text
//! Loading --pool--> Playing --wrong claim--> Loading (same tier)
//!    |                 |
//!    |                 +--threshold reached--> Loading (next tier)
//!    +--failure--> Failed --retry--> Loading
//! ```

use rand::SeedableRng;
use rand::rngs::StdRng;

use seenit_types::{
    FailureKind, Feedback, Glyph, GlyphPool, Notification, RankTier, RoundId, RoundStartFailure,
};

use crate::progression::{Progression, Promotion};
use crate::round::{ClaimOutcome, Round};

/// What the caller must fetch to start the next round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundRequest {
    pub id: RoundId,
    /// Number of glyphs to ask the catalog for.
    pub size: usize,
    /// Score the round starts from.
    pub baseline: u32,
}

/// Result of a claim key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimReport {
    /// No round is in play.
    Ignored,
    Continued {
        score: u32,
    },
    Lost {
        final_score: u32,
        request: RoundRequest,
    },
    Promoted {
        promotion: Promotion,
        request: RoundRequest,
    },
}

#[derive(Debug)]
enum Phase {
    /// `retired` is the previous round, kept to be reset with the next pool.
    Loading { round: RoundId, retired: Option<Round> },
    Playing { round: RoundId, state: Round },
    Failed { round: RoundId, failure: RoundStartFailure },
}

impl Phase {
    fn round_id(&self) -> RoundId {
        match self {
            Phase::Loading { round, .. }
            | Phase::Playing { round, .. }
            | Phase::Failed { round, .. } => {
                *round
            }
        }
    }
}

/// Phase as seen by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseView<'a> {
    Loading,
    Playing,
    Failed(&'a RoundStartFailure),
}

/// Everything the presentation layer needs for one frame.
#[derive(Debug, Clone, Copy)]
pub struct GameView<'a> {
    pub tier: &'a RankTier,
    pub tier_index: usize,
    pub tier_count: usize,
    pub score: u32,
    pub best_score: u32,
    pub next_threshold: Option<u32>,
    pub progress: f64,
    pub visible: Option<Glyph>,
    pub pool_size: usize,
    pub seen_count: usize,
    pub feedback: Feedback,
    pub notification: Option<&'a Notification>,
    pub phase: PhaseView<'a>,
}

#[derive(Debug)]
pub struct Game {
    progression: Progression,
    phase: Phase,
    last_id: RoundId,
    feedback: Feedback,
    notification: Option<Notification>,
    rng: StdRng,
}

impl Game {
    /// Build a game and the request for its first round.
    pub fn start(progression: Progression) -> (Self, RoundRequest) {
        Self::start_with_rng(progression, StdRng::from_os_rng())
    }

    /// Deterministic variant for tests.
    pub fn start_with_seed(progression: Progression, seed: u64) -> (Self, RoundRequest) {
        Self::start_with_rng(progression, StdRng::seed_from_u64(seed))
    }

    fn start_with_rng(progression: Progression, rng: StdRng) -> (Self, RoundRequest) {
        let first = RoundId::new(0);
        let mut game = Self {
            progression,
            phase: Phase::Loading {
                round: first,
                retired: None,
            },
            last_id: first,
            feedback: Feedback::None,
            notification: None,
            rng,
        };
        let request = game.begin_round();
        (game, request)
    }

    /// Retire the current round and ask for a new one at the current tier.
    ///
    /// The retired round is reset in place once its replacement pool arrives.
    pub fn begin_round(&mut self) -> RoundRequest {
        self.last_id = self.last_id.next();
        let retired = match std::mem::replace(
            &mut self.phase,
            Phase::Loading {
                round: self.last_id,
                retired: None,
            },
        ) {
            Phase::Playing { state, .. } => Some(state),
            Phase::Loading { retired, .. } => retired,
            Phase::Failed { .. } => None,
        };
        self.phase = Phase::Loading {
            round: self.last_id,
            retired,
        };
        let request = RoundRequest {
            id: self.last_id,
            size: self.progression.round_size(),
            baseline: self.progression.baseline(),
        };
        tracing::info!(
            round = %request.id,
            size = request.size,
            baseline = request.baseline,
            tier = self.progression.tier().name(),
            "Requested round"
        );
        request
    }

    /// Install the pool fetched for `id`.
    ///
    /// Returns false, changing nothing, when `id` is not the round being
    /// loaded.
    pub fn deliver_pool(&mut self, id: RoundId, result: Result<GlyphPool, RoundStartFailure>) -> bool {
        let current = self.phase.round_id();
        let retired = match &mut self.phase {
            Phase::Loading { round, retired } if *round == id => retired.take(),
            _ => {
                tracing::debug!(round = %id, %current, "Dropping stale pool");
                return false;
            }
        };

        let baseline = self.progression.baseline();
        let rng = &mut self.rng;
        let started = result.and_then(|pool| {
            let state = match retired {
                Some(mut state) => state.reset(pool, baseline, rng).map(|()| state),
                None => Round::new(pool, baseline, rng),
            };
            state.map_err(|e| RoundStartFailure::new(FailureKind::EmptyPool, e.to_string()))
        });
        self.phase = match started {
            Ok(state) => {
                tracing::info!(round = %id, pool = state.pool().len(), "Round started");
                Phase::Playing { round: id, state }
            }
            Err(failure) => {
                tracing::warn!(round = %id, "Round failed to start: {failure}");
                Phase::Failed { round: id, failure }
            }
        };
        true
    }

    /// Judge a claim on the visible glyph.
    pub fn claim(&mut self, claimed_seen: bool) -> ClaimReport {
        let Phase::Playing { state, .. } = &mut self.phase else {
            return ClaimReport::Ignored;
        };
        let Some(outcome) = state.claim(claimed_seen, &mut self.rng) else {
            return ClaimReport::Ignored;
        };

        self.notification = None;
        match outcome {
            ClaimOutcome::Correct { score } => {
                self.feedback = Feedback::Correct;
                tracing::debug!(score, claimed_seen, "Correct claim");
                match self.progression.score_updated(score) {
                    Some(promotion) => {
                        self.notification = Some(Notification::Promoted {
                            tier_name: promotion.tier_name.clone(),
                            tier_icon: promotion.tier_icon.clone(),
                        });
                        let request = self.begin_round();
                        ClaimReport::Promoted { promotion, request }
                    }
                    None => ClaimReport::Continued { score },
                }
            }
            ClaimOutcome::Wrong {
                final_score,
                glyph,
                was_seen,
            } => {
                self.feedback = Feedback::Wrong;
                self.progression.round_terminated(final_score);
                self.notification = Some(Notification::Lost {
                    final_score,
                    glyph,
                    was_seen,
                });
                let request = self.begin_round();
                ClaimReport::Lost {
                    final_score,
                    request,
                }
            }
        }
    }

    /// Request the failed round again. `None` unless a round start failed.
    pub fn retry(&mut self) -> Option<RoundRequest> {
        match self.phase {
            Phase::Failed { .. } => {
                self.notification = None;
                Some(self.begin_round())
            }
            _ => None,
        }
    }

    /// The round waiting for a pool, if any.
    #[must_use]
    pub fn pending_round(&self) -> Option<RoundId> {
        match self.phase {
            Phase::Loading { round, .. } => Some(round),
            _ => None,
        }
    }

    /// The round in play, if any.
    #[must_use]
    pub fn round(&self) -> Option<&Round> {
        match &self.phase {
            Phase::Playing { state, .. } => Some(state),
            _ => None,
        }
    }

    #[must_use]
    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    #[must_use]
    pub fn view(&self) -> GameView<'_> {
        let round = self.round();
        let score = round.map_or_else(|| self.progression.baseline(), Round::score);
        let phase = match &self.phase {
            Phase::Loading { .. } => PhaseView::Loading,
            Phase::Playing { .. } => PhaseView::Playing,
            Phase::Failed { failure, .. } => PhaseView::Failed(failure),
        };

        GameView {
            tier: self.progression.tier(),
            tier_index: self.progression.tier_index(),
            tier_count: self.progression.ladder().len(),
            score,
            best_score: self.progression.best_score(),
            next_threshold: self.progression.next_threshold(),
            progress: self.progression.progress(score),
            visible: round.map(Round::visible),
            pool_size: round.map_or(0, |r| r.pool().len()),
            seen_count: round.map_or(0, Round::seen_count),
            feedback: self.feedback,
            notification: self.notification.as_ref(),
            phase,
        }
    }
}
