//! End-to-end game flow against a mocked catalog.

use seenit_engine::{
    App, ClaimReport, FailureKind, Feedback, Game, MemoryRankStore, Notification, PhaseView,
    Progression, RankLadder, RankTier, SourceSelector, UiOptions,
};
use wiremock::MockServer;

use crate::common::{
    catalog_client, claim_truthfully, claim_wrongly, codepoints, entries, mount_failure,
    mount_route, settle, three_tier_ladder,
};

fn seeded_app(
    server: &MockServer,
    ladder: RankLadder,
    store: &MemoryRankStore,
    selector: SourceSelector,
) -> App {
    let progression = Progression::load(ladder, Box::new(store.clone()));
    let (game, request) = Game::start_with_seed(progression, 2024);
    App::with_game(
        game,
        request,
        catalog_client(server),
        selector,
        UiOptions::default(),
    )
}

#[tokio::test]
async fn first_round_uses_standard_ladder_gap() {
    let server = MockServer::start().await;
    mount_route(&server, "all", entries(&codepoints(40))).await;

    let progression = Progression::load(RankLadder::standard(), Box::new(MemoryRankStore::new()));
    let mut app = App::new(
        progression,
        catalog_client(&server),
        SourceSelector::All,
        UiOptions::default(),
    );
    assert!(app.is_loading());
    settle(&mut app).await;

    let view = app.view();
    assert_eq!(view.phase, PhaseView::Playing);
    assert_eq!(view.tier.name(), "Bronze");
    assert_eq!(view.pool_size, 7);
    assert_eq!(view.score, 0);
    let round = app.game().round().unwrap();
    assert!(round.pool().contains(round.visible()));
}

#[tokio::test]
async fn ten_correct_claims_promote_and_resize_next_round() {
    let server = MockServer::start().await;
    mount_route(&server, "all/category/smileys", entries(&codepoints(40))).await;
    let store = MemoryRankStore::new();
    let mut app = seeded_app(
        &server,
        three_tier_ladder(),
        &store,
        SourceSelector::Category("smileys".into()),
    );
    settle(&mut app).await;
    assert_eq!(app.view().pool_size, 7);

    for expected in 1..10 {
        assert_eq!(
            claim_truthfully(&mut app),
            ClaimReport::Continued { score: expected }
        );
    }
    let ClaimReport::Promoted { promotion, request } = claim_truthfully(&mut app) else {
        panic!("tenth correct claim should promote");
    };
    assert_eq!(promotion.tier_name, "Silver");
    assert_eq!(request.size, 15);
    assert_eq!(store.stored(), Some(1));
    assert!(app.is_loading());

    settle(&mut app).await;
    let view = app.view();
    assert_eq!(view.tier.name(), "Silver");
    assert_eq!(view.pool_size, 15);
    assert_eq!(view.score, 10);
    assert_eq!(view.seen_count, 0);
    assert!(matches!(
        view.notification,
        Some(Notification::Promoted { .. })
    ));
}

#[tokio::test]
async fn wrong_claim_restarts_round_at_same_tier() {
    let server = MockServer::start().await;
    mount_route(&server, "all", entries(&codepoints(20))).await;
    let store = MemoryRankStore::new();
    let mut app = seeded_app(&server, three_tier_ladder(), &store, SourceSelector::All);
    settle(&mut app).await;

    claim_truthfully(&mut app);
    claim_truthfully(&mut app);
    let ClaimReport::Lost { final_score, .. } = claim_wrongly(&mut app) else {
        panic!("wrong claim should end the round");
    };
    assert_eq!(final_score, 2);
    assert_eq!(store.stored(), None);

    settle(&mut app).await;
    let view = app.view();
    assert_eq!(view.phase, PhaseView::Playing);
    assert_eq!(view.score, 0);
    assert_eq!(view.seen_count, 0);
    assert_eq!(view.best_score, 2);
    assert_eq!(view.feedback, Feedback::Wrong);
    assert!(matches!(
        view.notification,
        Some(Notification::Lost { final_score: 2, .. })
    ));
}

#[tokio::test]
async fn pool_is_clamped_to_small_category() {
    let server = MockServer::start().await;
    mount_route(&server, "all/category/flags", entries(&codepoints(12))).await;
    // One gap of 100 asks for 75 glyphs.
    let ladder = RankLadder::new(vec![
        RankTier::new("Rookie", "R", 0),
        RankTier::new("Veteran", "V", 100),
    ])
    .unwrap();
    let mut app = seeded_app(
        &server,
        ladder,
        &MemoryRankStore::new(),
        SourceSelector::Category("flags".into()),
    );
    settle(&mut app).await;
    assert_eq!(app.view().pool_size, 12);
}

#[tokio::test]
async fn unavailable_catalog_blocks_until_retry() {
    let server = MockServer::start().await;
    mount_failure(&server, "all", 503, 1).await;
    mount_route(&server, "all", entries(&codepoints(20))).await;
    let mut app = seeded_app(
        &server,
        three_tier_ladder(),
        &MemoryRankStore::new(),
        SourceSelector::All,
    );
    settle(&mut app).await;

    let PhaseView::Failed(failure) = app.view().phase else {
        panic!("expected failed round start");
    };
    assert_eq!(failure.kind, FailureKind::SourceUnavailable);
    assert!(failure.message.contains("503"));
    assert_eq!(app.claim_new(), ClaimReport::Ignored);

    assert!(app.retry());
    settle(&mut app).await;
    assert_eq!(app.view().phase, PhaseView::Playing);
    assert!(!app.retry());
}

#[tokio::test]
async fn empty_source_is_reported_as_empty_pool() {
    let server = MockServer::start().await;
    mount_route(&server, "all/group/nothing-here", entries(&[])).await;
    let mut app = seeded_app(
        &server,
        three_tier_ladder(),
        &MemoryRankStore::new(),
        SourceSelector::Groups(vec!["nothing-here".into()]),
    );
    settle(&mut app).await;

    let PhaseView::Failed(failure) = app.view().phase else {
        panic!("expected failed round start");
    };
    assert_eq!(failure.kind, FailureKind::EmptyPool);
}

#[tokio::test]
async fn quit_request_is_sticky() {
    let server = MockServer::start().await;
    mount_route(&server, "all", entries(&codepoints(20))).await;
    let mut app = seeded_app(
        &server,
        three_tier_ladder(),
        &MemoryRankStore::new(),
        SourceSelector::All,
    );
    assert!(!app.should_quit());
    app.request_quit();
    assert!(app.should_quit());
}
