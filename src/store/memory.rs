use std::{
    collections::{HashMap, HashSet},
    sync::{Mutex, MutexGuard}
};

use uuid::Uuid;

use crate::{
    model::{rating::Rating, structures::pending_match::PendingComparison},
    store::{CandidateFilter, CandidateSource, MatchStore, RatingStore, StoreError}
};

/// In-memory store backing tests and the `--in-memory` simulation mode.
/// Implements all three collaborator traits over plain hash maps.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>
}

#[derive(Default)]
struct Inner {
    ratings: HashMap<Uuid, Rating>,
    matches: HashMap<Uuid, PendingComparison>,
    seen_pairs: HashSet<(String, String)>,
    votes: HashMap<Uuid, Option<Uuid>>
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    /// Registers a profile with the given rating and returns its id.
    pub fn add_profile(&self, rating: Rating) -> Uuid {
        let id = Uuid::new_v4();
        self.inner().ratings.insert(id, rating);
        id
    }

    pub fn profile_count(&self) -> usize {
        self.inner().ratings.len()
    }
}

impl RatingStore for MemoryStore {
    async fn get_rating(&self, profile_id: Uuid) -> Result<Option<Rating>, StoreError> {
        Ok(self.inner().ratings.get(&profile_id).copied())
    }

    async fn get_rating_pair(&self, left_id: Uuid, right_id: Uuid) -> Result<Option<(Rating, Rating)>, StoreError> {
        let inner = self.inner();

        match (inner.ratings.get(&left_id), inner.ratings.get(&right_id)) {
            (Some(left), Some(right)) => Ok(Some((*left, *right))),
            _ => Ok(None)
        }
    }

    async fn put_rating(&self, profile_id: Uuid, rating: Rating) -> Result<(), StoreError> {
        self.inner().ratings.insert(profile_id, rating);
        Ok(())
    }

    async fn leaderboard(&self, limit: i64) -> Result<Vec<(Uuid, Rating)>, StoreError> {
        let mut rows: Vec<(Uuid, Rating)> = self.inner().ratings.iter().map(|(id, r)| (*id, *r)).collect();

        rows.sort_by(|a, b| b.1.score().total_cmp(&a.1.score()));
        rows.truncate(limit as usize);

        Ok(rows)
    }
}

impl MatchStore for MemoryStore {
    async fn pair_seen(&self, voter_id: &str, pair_key: &str) -> Result<bool, StoreError> {
        Ok(self
            .inner()
            .seen_pairs
            .contains(&(voter_id.to_string(), pair_key.to_string())))
    }

    async fn insert_match(&self, pending: &PendingComparison) -> Result<(), StoreError> {
        let mut inner = self.inner();

        inner
            .seen_pairs
            .insert((pending.voter_id.clone(), pending.pair_key.clone()));
        inner.matches.insert(pending.id, pending.clone());

        Ok(())
    }

    async fn get_match(&self, match_id: Uuid) -> Result<Option<PendingComparison>, StoreError> {
        Ok(self.inner().matches.get(&match_id).cloned())
    }

    async fn has_outcome(&self, match_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.inner().votes.contains_key(&match_id))
    }

    async fn record_outcome(&self, match_id: Uuid, winner_id: Option<Uuid>) -> Result<(), StoreError> {
        self.inner().votes.insert(match_id, winner_id);
        Ok(())
    }
}

impl CandidateSource for MemoryStore {
    async fn candidates(&self, filter: &CandidateFilter) -> Result<Vec<Uuid>, StoreError> {
        let inner = self.inner();

        let ids = inner
            .ratings
            .iter()
            .filter(|(_, r)| match filter {
                CandidateFilter::All => true,
                CandidateFilter::ZeroGames => r.games_played == 0,
                CandidateFilter::Newcomer { games_below, phi_above } => {
                    r.games_played < *games_below || r.phi > *phi_above
                }
                CandidateFilter::Anchor { phi_below, games_at_least } => {
                    r.phi < *phi_below && r.games_played >= *games_at_least
                }
            })
            .map(|(id, _)| *id)
            .collect();

        Ok(ids)
    }
}
