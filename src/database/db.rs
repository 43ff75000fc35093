use std::sync::Arc;

use postgres_types::ToSql;
use tokio_postgres::{Client, Error, NoTls, Row};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    model::{config::EngineConfig, rating::Rating, structures::pending_match::PendingComparison},
    store::{CandidateFilter, CandidateSource, MatchStore, RatingStore, StoreError}
};

// Candidate pool reads are bounded; the selector only ever draws one or
// two ids from a pool, so a limited random sample is enough.
const NEWCOMER_POOL_LIMIT: i64 = 20;
const ANCHOR_POOL_LIMIT: i64 = 50;
const GENERAL_POOL_LIMIT: i64 = 50;

#[derive(Clone)]
pub struct DbClient {
    client: Arc<Client>
}

impl DbClient {
    // Connect to the database and return a DbClient instance
    pub async fn connect(connection_str: &str) -> Result<Self, Error> {
        let (client, connection) = tokio_postgres::connect(connection_str, NoTls).await?;

        // Spawn the connection object to run in the background
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("connection error: {}", e);
            }
        });

        Ok(DbClient {
            client: Arc::new(client)
        })
    }

    /// Creates the ratings/matches/votes tables if they do not exist.
    ///
    /// The primary key on votes.match_id is the atomic insert-if-absent
    /// guard: even if two vote submissions race past the application-level
    /// existence check, only one outcome row can ever land.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.client
            .batch_execute(
                "
            CREATE TABLE IF NOT EXISTS ratings (
                profile_id UUID PRIMARY KEY,
                mu DOUBLE PRECISION NOT NULL,
                phi DOUBLE PRECISION NOT NULL,
                games_played INT NOT NULL DEFAULT 0,
                score DOUBLE PRECISION NOT NULL
            );
            CREATE TABLE IF NOT EXISTS matches (
                id UUID PRIMARY KEY,
                left_profile_id UUID NOT NULL REFERENCES ratings(profile_id),
                right_profile_id UUID NOT NULL REFERENCES ratings(profile_id),
                pair_hash TEXT NOT NULL,
                rater_id TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_matches_rater_pair ON matches (rater_id, pair_hash);
            CREATE TABLE IF NOT EXISTS votes (
                match_id UUID PRIMARY KEY REFERENCES matches(id),
                winner_id UUID,
                created_at TIMESTAMPTZ NOT NULL DEFAULT now()
            );"
            )
            .await?;

        Ok(())
    }

    /// Inserts `count` profiles with initial ratings, but only into an
    /// empty ratings table. Existing data is never reseeded.
    pub async fn seed_profiles(&self, count: usize, config: &EngineConfig) -> Result<Vec<Uuid>, StoreError> {
        let existing: i64 = self
            .client
            .query_one("SELECT COUNT(*) FROM ratings", &[])
            .await?
            .get(0);

        if existing > 0 {
            info!("ratings table already has {} profiles, skipping seed", existing);
            return Ok(Vec::new());
        }

        let initial = Rating::initial(config);
        let mut ids = Vec::with_capacity(count);

        for _ in 0..count {
            let id = Uuid::new_v4();
            self.client
                .execute(
                    "INSERT INTO ratings (profile_id, mu, phi, games_played, score) VALUES ($1, $2, $3, $4, $5)",
                    &[&id, &initial.mu, &initial.phi, &initial.games_played, &initial.score()]
                )
                .await?;
            ids.push(id);
        }

        info!("Seeded {} profiles at initial rating", count);
        Ok(ids)
    }

    fn rating_from_row(row: &Row) -> Rating {
        Rating {
            mu: row.get("mu"),
            phi: row.get("phi"),
            games_played: row.get("games_played")
        }
    }

    fn match_from_row(row: &Row) -> PendingComparison {
        PendingComparison {
            id: row.get("id"),
            left_id: row.get("left_profile_id"),
            right_id: row.get("right_profile_id"),
            pair_key: row.get("pair_hash"),
            voter_id: row.get("rater_id"),
            created_at: row.get("created_at")
        }
    }
}

impl RatingStore for DbClient {
    async fn get_rating(&self, profile_id: Uuid) -> Result<Option<Rating>, StoreError> {
        let rows = self
            .client
            .query(
                "SELECT mu, phi, games_played FROM ratings WHERE profile_id = $1",
                &[&profile_id]
            )
            .await?;

        Ok(rows.first().map(Self::rating_from_row))
    }

    async fn get_rating_pair(&self, left_id: Uuid, right_id: Uuid) -> Result<Option<(Rating, Rating)>, StoreError> {
        let ids = vec![left_id, right_id];
        let rows = self
            .client
            .query(
                "SELECT profile_id, mu, phi, games_played FROM ratings WHERE profile_id = ANY($1)",
                &[&ids]
            )
            .await?;

        let mut left = None;
        let mut right = None;
        for row in &rows {
            let profile_id: Uuid = row.get("profile_id");
            if profile_id == left_id {
                left = Some(Self::rating_from_row(row));
            } else if profile_id == right_id {
                right = Some(Self::rating_from_row(row));
            }
        }

        Ok(left.zip(right))
    }

    async fn put_rating(&self, profile_id: Uuid, rating: Rating) -> Result<(), StoreError> {
        self.client
            .execute(
                "INSERT INTO ratings (profile_id, mu, phi, games_played, score) VALUES ($1, $2, $3, $4, $5)
                 ON CONFLICT (profile_id) DO UPDATE
                 SET mu = EXCLUDED.mu, phi = EXCLUDED.phi, games_played = EXCLUDED.games_played, score = EXCLUDED.score",
                &[
                    &profile_id,
                    &rating.mu,
                    &rating.phi,
                    &rating.games_played,
                    &rating.score()
                ]
            )
            .await?;

        Ok(())
    }

    async fn leaderboard(&self, limit: i64) -> Result<Vec<(Uuid, Rating)>, StoreError> {
        let rows = self
            .client
            .query(
                "SELECT profile_id, mu, phi, games_played FROM ratings ORDER BY score DESC LIMIT $1",
                &[&limit]
            )
            .await?;

        Ok(rows
            .iter()
            .map(|row| (row.get("profile_id"), Self::rating_from_row(row)))
            .collect())
    }
}

impl MatchStore for DbClient {
    async fn pair_seen(&self, voter_id: &str, pair_key: &str) -> Result<bool, StoreError> {
        let rows = self
            .client
            .query(
                "SELECT 1 FROM matches WHERE rater_id = $1 AND pair_hash = $2 LIMIT 1",
                &[&voter_id, &pair_key]
            )
            .await?;

        Ok(!rows.is_empty())
    }

    async fn insert_match(&self, pending: &PendingComparison) -> Result<(), StoreError> {
        self.client
            .execute(
                "INSERT INTO matches (id, left_profile_id, right_profile_id, pair_hash, rater_id, created_at)
                 VALUES ($1, $2, $3, $4, $5, $6)",
                &[
                    &pending.id,
                    &pending.left_id,
                    &pending.right_id,
                    &pending.pair_key,
                    &pending.voter_id,
                    &pending.created_at
                ]
            )
            .await?;

        Ok(())
    }

    async fn get_match(&self, match_id: Uuid) -> Result<Option<PendingComparison>, StoreError> {
        let rows = self
            .client
            .query(
                "SELECT id, left_profile_id, right_profile_id, pair_hash, rater_id, created_at
                 FROM matches WHERE id = $1",
                &[&match_id]
            )
            .await?;

        Ok(rows.first().map(Self::match_from_row))
    }

    async fn has_outcome(&self, match_id: Uuid) -> Result<bool, StoreError> {
        let rows = self
            .client
            .query("SELECT 1 FROM votes WHERE match_id = $1", &[&match_id])
            .await?;

        Ok(!rows.is_empty())
    }

    async fn record_outcome(&self, match_id: Uuid, winner_id: Option<Uuid>) -> Result<(), StoreError> {
        self.client
            .execute(
                "INSERT INTO votes (match_id, winner_id) VALUES ($1, $2)",
                &[&match_id, &winner_id]
            )
            .await?;

        Ok(())
    }
}

impl CandidateSource for DbClient {
    async fn candidates(&self, filter: &CandidateFilter) -> Result<Vec<Uuid>, StoreError> {
        let (sql, params): (&str, Vec<Box<dyn ToSql + Sync + Send>>) = match filter {
            CandidateFilter::All => (
                "SELECT profile_id FROM ratings ORDER BY random() LIMIT $1",
                vec![Box::new(GENERAL_POOL_LIMIT)]
            ),
            CandidateFilter::ZeroGames => (
                "SELECT profile_id FROM ratings WHERE games_played = 0 ORDER BY random() LIMIT $1",
                vec![Box::new(NEWCOMER_POOL_LIMIT)]
            ),
            CandidateFilter::Newcomer { games_below, phi_above } => (
                "SELECT profile_id FROM ratings WHERE games_played < $1 OR phi > $2
                 ORDER BY random() LIMIT $3",
                vec![Box::new(*games_below), Box::new(*phi_above), Box::new(NEWCOMER_POOL_LIMIT)]
            ),
            CandidateFilter::Anchor { phi_below, games_at_least } => (
                "SELECT profile_id FROM ratings WHERE phi < $1 AND games_played >= $2
                 ORDER BY random() LIMIT $3",
                vec![Box::new(*phi_below), Box::new(*games_at_least), Box::new(ANCHOR_POOL_LIMIT)]
            )
        };

        let param_refs: Vec<&(dyn ToSql + Sync)> = params.iter().map(|p| p.as_ref() as &(dyn ToSql + Sync)).collect();
        let rows = self.client.query(sql, &param_refs).await?;

        Ok(rows.iter().map(|row| row.get("profile_id")).collect())
    }
}
