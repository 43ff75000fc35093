use rand::Rng;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::ProcessorError,
    model::{
        config::EngineConfig,
        engine::RatingEngine,
        rating::Rating,
        selector::PairSelector,
        structures::{outcome::Outcome, pending_match::PendingComparison}
    },
    store::{CandidateSource, MatchStore, RatingStore}
};

/// Orchestrates the two request flows of the ranking system: issuing a
/// fresh comparison and resolving a submitted vote.
///
/// Selection and vote submission are independent calls with arbitrary
/// delay between them; the only shared state is the store, so any number
/// of `Arena` instances over the same backend behave identically.
pub struct Arena<S, R: Rng> {
    store: S,
    engine: RatingEngine,
    selector: PairSelector<R>
}

impl<S, R> Arena<S, R>
where
    S: RatingStore + MatchStore + CandidateSource,
    R: Rng
{
    pub fn new(store: S, config: EngineConfig, rng: R) -> Self {
        Arena {
            engine: RatingEngine::new(config.clone()),
            selector: PairSelector::new(config, rng),
            store
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Issues the next comparison for this voter. The returned match has
    /// already been persisted.
    pub async fn next_match(&mut self, voter_id: &str) -> Result<PendingComparison, ProcessorError> {
        self.selector.select_pair(&self.store, voter_id).await
    }

    /// Resolves a vote against a previously issued match.
    ///
    /// At most one outcome may ever be recorded per match, enforced here
    /// by an existence check immediately before the vote insert. A skip
    /// records the vote but leaves both ratings untouched. Returns the two
    /// new ratings, or None for a skip.
    pub async fn process_vote(
        &mut self,
        match_id: Uuid,
        outcome: Outcome
    ) -> Result<Option<(Rating, Rating)>, ProcessorError> {
        let pending = self
            .store
            .get_match(match_id)
            .await?
            .ok_or(ProcessorError::StaleOrMissingMatch(match_id))?;

        if self.store.has_outcome(match_id).await? {
            return Err(ProcessorError::StaleOrMissingMatch(match_id));
        }

        let Some(left_score) = outcome.left_score() else {
            self.store.record_outcome(match_id, None).await?;
            info!(%match_id, "skip recorded");
            return Ok(None);
        };

        let (left, right) = self
            .store
            .get_rating_pair(pending.left_id, pending.right_id)
            .await?
            .ok_or(ProcessorError::RatingsNotFound)?;

        let (new_left, new_right) = self.engine.update(&left, &right, left_score);

        // The vote row is written first: it is the replay guard
        self.store.record_outcome(match_id, outcome.winner_id(&pending)).await?;
        self.store.put_rating(pending.left_id, new_left).await?;
        self.store.put_rating(pending.right_id, new_right).await?;

        info!(%match_id, winner = ?outcome.winner_id(&pending), "vote recorded");
        Ok(Some((new_left, new_right)))
    }

    /// Profiles ordered by conservative score, best first.
    pub async fn leaderboard(&self, limit: i64) -> Result<Vec<(Uuid, Rating)>, ProcessorError> {
        Ok(self.store.leaderboard(limit).await?)
    }
}
