//! Core engine for Seen It - round state machine, progression and orchestration.
//!
//! This crate contains the App without TUI dependencies. [`Game`] is the pure
//! controller; [`App`] wraps it with the catalog client and the async pool
//! fetches, polled once per frame from [`App::tick`].

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub use seenit_catalog::{CatalogClient, CatalogError};
pub use seenit_types::{
    FailureKind, Glyph, GlyphPool, RankLadder, RankTier, RoundId, RoundStartFailure,
    SourceSelector,
    ui::{Feedback, Notification, UiOptions},
};

mod config;
mod game;
mod progression;
mod round;
mod store;

pub use config::{
    AppConfig, CATALOG_URL_ENV, CatalogConfig, ConfigError, ResolvedCatalog, SOURCE_ENV,
    SeenItConfig,
};
pub use game::{ClaimReport, Game, GameView, PhaseView, RoundRequest};
pub use progression::{Progression, Promotion};
pub use round::{ClaimOutcome, EmptyPoolError, Round, RoundStatus};
pub use store::{FileRankStore, MemoryRankStore, RankStore, StoreError};

/// A finished pool fetch, tagged with the round it was requested for.
#[derive(Debug)]
struct FetchResult {
    round: RoundId,
    result: Result<GlyphPool, RoundStartFailure>,
}

pub struct App {
    game: Game,
    catalog: CatalogClient,
    selector: SourceSelector,
    ui_options: UiOptions,
    results_tx: mpsc::UnboundedSender<FetchResult>,
    results_rx: mpsc::UnboundedReceiver<FetchResult>,
    in_flight: Option<JoinHandle<()>>,
    should_quit: bool,
    tick: usize,
}

impl App {
    /// Build the app and start fetching the first round.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(
        progression: Progression,
        catalog: CatalogClient,
        selector: SourceSelector,
        ui_options: UiOptions,
    ) -> Self {
        let (game, request) = Game::start(progression);
        Self::with_game(game, request, catalog, selector, ui_options)
    }

    /// Build the app around an existing game and its pending request.
    pub fn with_game(
        game: Game,
        request: RoundRequest,
        catalog: CatalogClient,
        selector: SourceSelector,
        ui_options: UiOptions,
    ) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        let mut app = Self {
            game,
            catalog,
            selector,
            ui_options,
            results_tx,
            results_rx,
            in_flight: None,
            should_quit: false,
            tick: 0,
        };
        app.spawn_fetch(request);
        app
    }

    fn spawn_fetch(&mut self, request: RoundRequest) {
        // A superseded fetch would be dropped on delivery anyway.
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }

        let catalog = self.catalog.clone();
        let selector = self.selector.clone();
        let tx = self.results_tx.clone();
        let handle = tokio::spawn(async move {
            let mut rng = StdRng::from_os_rng();
            let result = catalog
                .fetch_pool(&selector, request.size, &mut rng)
                .await
                .map_err(|e| {
                    tracing::warn!(round = %request.id, "Pool fetch failed: {e}");
                    e.to_failure()
                });
            let _ = tx.send(FetchResult {
                round: request.id,
                result,
            });
        });
        self.in_flight = Some(handle);
    }

    /// Advance one frame: deliver any finished fetches.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        while let Ok(FetchResult { round, result }) = self.results_rx.try_recv() {
            if self.game.deliver_pool(round, result) {
                self.in_flight = None;
            }
        }
    }

    #[must_use]
    pub fn tick_count(&self) -> usize {
        self.tick
    }

    pub fn claim_seen(&mut self) -> ClaimReport {
        self.claim(true)
    }

    pub fn claim_new(&mut self) -> ClaimReport {
        self.claim(false)
    }

    fn claim(&mut self, claimed_seen: bool) -> ClaimReport {
        let report = self.game.claim(claimed_seen);
        match &report {
            ClaimReport::Lost { request, .. } | ClaimReport::Promoted { request, .. } => {
                self.spawn_fetch(*request);
            }
            ClaimReport::Ignored | ClaimReport::Continued { .. } => {}
        }
        report
    }

    /// Retry a failed round start. Returns whether a fetch was started.
    pub fn retry(&mut self) -> bool {
        match self.game.retry() {
            Some(request) => {
                self.spawn_fetch(request);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.game.pending_round().is_some()
    }

    #[must_use]
    pub fn view(&self) -> GameView<'_> {
        self.game.view()
    }

    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    #[must_use]
    pub fn selector(&self) -> &SourceSelector {
        &self.selector
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.ui_options
    }

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
