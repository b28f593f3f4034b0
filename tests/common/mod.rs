//! Shared test utilities and fixtures
//!
//! A wiremock stand-in for the emoji catalog plus helpers for driving an
//! [`App`] until its pending fetch lands.

#![allow(dead_code)]

use std::time::Duration;

use seenit_engine::{App, CatalogClient, ClaimReport, RankLadder, RankTier};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// First codepoint of the generated fixtures (😀).
pub const FIRST_CODEPOINT: u32 = 0x1F600;

/// `count` consecutive emoji codepoints.
pub fn codepoints(count: u32) -> Vec<u32> {
    (FIRST_CODEPOINT..FIRST_CODEPOINT + count).collect()
}

/// A catalog payload listing `codepoints`, shaped like the real API.
pub fn entries(codepoints: &[u32]) -> serde_json::Value {
    serde_json::Value::Array(
        codepoints
            .iter()
            .map(|cp| {
                serde_json::json!({
                    "name": format!("emoji {cp:x}"),
                    "category": "smileys and people",
                    "group": "face positive",
                    "htmlCode": [format!("&#{cp};")],
                    "unicode": [format!("U+{cp:X}")]
                })
            })
            .collect(),
    )
}

/// Serve `body` on `GET /api/{route}`.
pub async fn mount_route(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/{route}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Fail the next `times` requests to `GET /api/{route}` with `status`.
pub async fn mount_failure(server: &MockServer, route: &str, status: u16, times: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/api/{route}")))
        .respond_with(ResponseTemplate::new(status).set_body_string("catalog is down"))
        .up_to_n_times(times)
        .mount(server)
        .await;
}

pub fn catalog_client(server: &MockServer) -> CatalogClient {
    CatalogClient::new(format!("{}/api", server.uri()), 5).expect("catalog client")
}

/// Bronze 0, Silver 10, Gold 30: round sizes 7 then 15.
pub fn three_tier_ladder() -> RankLadder {
    RankLadder::new(vec![
        RankTier::new("Bronze", "🥉", 0),
        RankTier::new("Silver", "🥈", 10),
        RankTier::new("Gold", "🥇", 30),
    ])
    .expect("valid ladder")
}

/// Tick `app` until no fetch is pending, failing the test after ~5s.
pub async fn settle(app: &mut App) {
    for _ in 0..500 {
        app.tick();
        if !app.is_loading() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("pool fetch never completed");
}

/// Make the claim that matches ground truth.
pub fn claim_truthfully(app: &mut App) -> ClaimReport {
    let seen = app
        .game()
        .round()
        .expect("round in play")
        .visible_is_seen();
    if seen { app.claim_seen() } else { app.claim_new() }
}

/// Make the claim that contradicts ground truth.
pub fn claim_wrongly(app: &mut App) -> ClaimReport {
    let seen = app
        .game()
        .round()
        .expect("round in play")
        .visible_is_seen();
    if seen { app.claim_new() } else { app.claim_seen() }
}
