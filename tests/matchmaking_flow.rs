use std::collections::{HashMap, HashSet};

use faceoff_processor::{
    model::{arena::Arena, config::EngineConfig, rating::Rating, structures::outcome::Outcome},
    store::{memory::MemoryStore, RatingStore}
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn rating(mu: f64, phi: f64, games_played: i32) -> Rating {
    Rating { mu, phi, games_played }
}

/// Seeds a population of four fresh profiles and eight settled anchors.
fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();

    for _ in 0..4 {
        store.add_profile(rating(1500.0, 350.0, 0));
    }
    for i in 0..8 {
        store.add_profile(rating(1450.0 + 20.0 * i as f64, 50.0, 10));
    }

    store
}

#[tokio::test]
async fn test_select_vote_loop_end_to_end() {
    let config = EngineConfig {
        // Generous retry budget so the small test population cannot push
        // the selector into its ignore-freshness fallback
        max_attempts: 25,
        ..EngineConfig::default()
    };
    let store = seeded_store();
    let games_before: i32 = store
        .leaderboard(100)
        .await
        .unwrap()
        .iter()
        .map(|(_, r)| r.games_played)
        .sum();

    let mut arena = Arena::new(store, config, ChaCha8Rng::seed_from_u64(7));

    let mut seen_per_voter: HashMap<String, HashSet<String>> = HashMap::new();
    let mut completed = 0;

    for voter in 0..6 {
        let voter_id = format!("voter-{voter}");

        for vote in 0..6 {
            let pending = arena.next_match(&voter_id).await.unwrap();

            assert_ne!(pending.left_id, pending.right_id, "self-pairing is never allowed");
            assert!(
                seen_per_voter
                    .entry(voter_id.clone())
                    .or_default()
                    .insert(pending.pair_key.clone()),
                "voter {voter_id} was shown pair {} twice",
                pending.pair_key
            );

            // Every fifth vote is a skip, the rest alternate sides
            let outcome = match vote % 5 {
                4 => Outcome::Skip,
                n if n % 2 == 0 => Outcome::LeftWins,
                _ => Outcome::RightWins
            };

            let result = arena.process_vote(pending.id, outcome).await.unwrap();
            match outcome {
                Outcome::Skip => assert!(result.is_none()),
                _ => {
                    completed += 1;
                    assert!(result.is_some());
                }
            }
        }
    }

    // Every completed comparison adds exactly one game to both sides
    let rows = arena.store().leaderboard(100).await.unwrap();
    let games_after: i32 = rows.iter().map(|(_, r)| r.games_played).sum();
    assert_eq!(games_after - games_before, 2 * completed);

    // Ratings moved away from their seed values: every seeded phi was
    // 350 or 50, and any completed comparison changes it
    assert!(rows.iter().any(|(_, r)| r.phi != 350.0 && r.phi != 50.0));
}

#[tokio::test]
async fn test_leaderboard_is_sorted_and_bounded() {
    let store = seeded_store();
    let mut arena = Arena::new(store, EngineConfig::default(), ChaCha8Rng::seed_from_u64(11));

    for voter in 0..4 {
        let voter_id = format!("voter-{voter}");
        for _ in 0..4 {
            let pending = arena.next_match(&voter_id).await.unwrap();
            arena.process_vote(pending.id, Outcome::LeftWins).await.unwrap();
        }
    }

    let rows = arena.leaderboard(5).await.unwrap();

    assert_eq!(rows.len(), 5);
    for pair in rows.windows(2) {
        assert!(pair[0].1.score() >= pair[1].1.score());
    }
}

#[tokio::test]
async fn test_vote_flow_survives_interleaved_voters() {
    let store = seeded_store();
    let mut arena = Arena::new(store, EngineConfig::default(), ChaCha8Rng::seed_from_u64(13));

    // Selection and voting are independent calls: issue several matches
    // up front, then resolve them out of order.
    let a = arena.next_match("voter-a").await.unwrap();
    let b = arena.next_match("voter-b").await.unwrap();
    let c = arena.next_match("voter-a").await.unwrap();

    arena.process_vote(c.id, Outcome::RightWins).await.unwrap();
    arena.process_vote(a.id, Outcome::LeftWins).await.unwrap();
    arena.process_vote(b.id, Outcome::Skip).await.unwrap();

    // All three are resolved; none can be voted on again
    for pending in [a, b, c] {
        let replay = arena.process_vote(pending.id, Outcome::LeftWins).await;
        assert!(replay.is_err());
    }
}
