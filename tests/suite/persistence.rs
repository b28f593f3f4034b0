//! Rank persistence across sessions.

use std::fs;

use seenit_engine::{FileRankStore, Progression, RankLadder, RankStore};

use crate::common::three_tier_ladder;

#[test]
fn promotion_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("progress.json");

    let mut first = Progression::load(three_tier_ladder(), Box::new(FileRankStore::new(&path)));
    assert_eq!(first.tier_index(), 0);
    assert!(first.score_updated(10).is_some());

    let second = Progression::load(three_tier_ladder(), Box::new(FileRankStore::new(&path)));
    assert_eq!(second.tier_index(), 1);
    assert_eq!(second.baseline(), 10);
    assert_eq!(second.round_size(), 15);
    // Session best does not persist.
    assert_eq!(second.best_score(), 0);
}

#[test]
fn stored_tier_beyond_ladder_is_clamped_to_ceiling() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("progress.json");
    FileRankStore::new(&path).set_tier(42).unwrap();

    let progression = Progression::load(RankLadder::standard(), Box::new(FileRankStore::new(&path)));
    assert_eq!(progression.tier().name(), "Challenger");
    assert_eq!(progression.next_threshold(), None);
    // Ceiling rounds reuse the Grandmaster -> Challenger gap of 70.
    assert_eq!(progression.round_size(), 52);
}

#[test]
fn corrupt_progress_file_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("progress.json");
    fs::write(&path, "{\"tier\": \"gold\"}").unwrap();

    let progression = Progression::load(three_tier_ladder(), Box::new(FileRankStore::new(&path)));
    assert_eq!(progression.tier_index(), 0);
}
