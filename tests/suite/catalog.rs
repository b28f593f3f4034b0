//! Catalog client behavior as seen from outside the crate.

use std::collections::HashSet;
use std::net::TcpListener;

use rand::SeedableRng;
use rand::rngs::StdRng;
use seenit_catalog::{CatalogClient, CatalogError};
use seenit_types::{FailureKind, SourceSelector};
use wiremock::MockServer;

use crate::common::{catalog_client, codepoints, entries, mount_route};

#[tokio::test]
async fn overlapping_groups_still_give_unique_pool() {
    let server = MockServer::start().await;
    let shared = codepoints(6);
    mount_route(&server, "all/group/face-positive", entries(&shared)).await;
    mount_route(&server, "all/group/face-neutral", entries(&shared[2..])).await;

    let selector = SourceSelector::Groups(vec!["face-positive".into(), "face-neutral".into()]);
    let mut rng = StdRng::seed_from_u64(8);
    let pool = catalog_client(&server)
        .fetch_pool(&selector, 10, &mut rng)
        .await
        .unwrap();

    assert_eq!(pool.len(), 6);
    let unique: HashSet<u32> = pool.iter().map(|g| g.codepoint()).collect();
    assert_eq!(unique.len(), 6);
    assert!(unique.iter().all(|cp| shared.contains(cp)));
}

#[tokio::test]
async fn surrogate_codepoint_rejects_whole_payload() {
    let server = MockServer::start().await;
    let body = serde_json::json!([
        { "unicode": ["U+1F600"] },
        { "unicode": ["U+D800"] },
        { "unicode": ["U+1F601"] }
    ]);
    mount_route(&server, "all", body).await;

    let err = catalog_client(&server)
        .fetch_candidates(&SourceSelector::All)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Malformed { .. }));
    assert_eq!(err.to_failure().kind, FailureKind::SourceUnavailable);
}

#[tokio::test]
async fn unreachable_catalog_is_transport_error() {
    // Bind then release a port so nothing is listening on it.
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let client = CatalogClient::new(format!("http://127.0.0.1:{port}/api"), 2).unwrap();
    let err = client
        .fetch_candidates(&SourceSelector::All)
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::Transport { .. }));
    assert_eq!(err.kind(), FailureKind::SourceUnavailable);
}
