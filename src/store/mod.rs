pub mod memory;

use thiserror::Error;
use uuid::Uuid;

use crate::model::{rating::Rating, structures::pending_match::PendingComparison};

/// Opaque backend failure. The core treats every storage backend the
/// same way; concrete errors are boxed at the adapter boundary.
#[derive(Debug, Error)]
#[error("storage error: {0}")]
pub struct StoreError(pub Box<dyn std::error::Error + Send + Sync>);

impl From<tokio_postgres::Error> for StoreError {
    fn from(e: tokio_postgres::Error) -> Self {
        StoreError(Box::new(e))
    }
}

/// Simple predicates the candidate oracle understands. Thresholds are
/// carried in the filter so the source stays a dumb query layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CandidateFilter {
    /// Every rated profile
    All,
    /// Profiles that have never completed a comparison
    ZeroGames,
    /// Under-sampled or still-uncertain profiles
    Newcomer { games_below: i32, phi_above: f64 },
    /// Well-established, low-uncertainty profiles
    Anchor { phi_below: f64, games_at_least: i32 }
}

/// Keyed store of profile id -> rating record.
pub trait RatingStore {
    async fn get_rating(&self, profile_id: Uuid) -> Result<Option<Rating>, StoreError>;

    /// Both ratings or nothing; an update must never run on partial data.
    async fn get_rating_pair(&self, left_id: Uuid, right_id: Uuid) -> Result<Option<(Rating, Rating)>, StoreError>;

    async fn put_rating(&self, profile_id: Uuid, rating: Rating) -> Result<(), StoreError>;

    /// Profiles ordered by conservative score, best first.
    async fn leaderboard(&self, limit: i64) -> Result<Vec<(Uuid, Rating)>, StoreError>;
}

/// Append-only store of issued pairs and their recorded outcomes.
pub trait MatchStore {
    /// Has this voter already been shown this unordered pair?
    async fn pair_seen(&self, voter_id: &str, pair_key: &str) -> Result<bool, StoreError>;

    async fn insert_match(&self, pending: &PendingComparison) -> Result<(), StoreError>;

    async fn get_match(&self, match_id: Uuid) -> Result<Option<PendingComparison>, StoreError>;

    /// Whether an outcome has already been recorded for this match.
    async fn has_outcome(&self, match_id: Uuid) -> Result<bool, StoreError>;

    /// Records the outcome. `winner_id` is None for a skip.
    async fn record_outcome(&self, match_id: Uuid, winner_id: Option<Uuid>) -> Result<(), StoreError>;
}

/// Supplies profile-id pools filtered by [`CandidateFilter`] predicates.
pub trait CandidateSource {
    async fn candidates(&self, filter: &CandidateFilter) -> Result<Vec<Uuid>, StoreError>;
}
