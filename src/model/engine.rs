use crate::model::{config::EngineConfig, rating::Rating};

/// Glicko-lite rating engine.
///
/// A simplified, non-volatility-tracking variant of Glicko: the expected
/// score uses the standard logistic model on a 400-point scale, the step
/// size is an uncertainty-scaled K-factor and phi decays multiplicatively
/// after every completed comparison.
///
/// `update` is a pure function. For fixed inputs it is bit-for-bit
/// reproducible, which keeps the rating ledger auditable and tests
/// deterministic.
pub struct RatingEngine {
    config: EngineConfig
}

impl RatingEngine {
    pub fn new(config: EngineConfig) -> Self {
        RatingEngine { config }
    }

    /// Applies one completed comparison to both participants.
    ///
    /// `outcome` is the score for side A: 1 if A won, 0 if B won, 0.5 for
    /// a draw. The calling layer only ever supplies 0 or 1 for real votes;
    /// skips never reach this function.
    ///
    /// Each side moves by its own K-factor, so the exchange is not forced
    /// to be zero-sum: a highly uncertain newcomer swings more than an
    /// established anchor from the same match. This is deliberate.
    pub fn update(&self, rating_a: &Rating, rating_b: &Rating, outcome: f64) -> (Rating, Rating) {
        let expected_a = self.expected_score(rating_a.mu, rating_b.mu);

        let k_a = self.k_factor(rating_a.phi);
        let k_b = self.k_factor(rating_b.phi);

        let new_a = Rating {
            mu: rating_a.mu + k_a * (outcome - expected_a),
            phi: self.decayed_phi(rating_a.phi),
            games_played: rating_a.games_played + 1
        };
        let new_b = Rating {
            mu: rating_b.mu + k_b * ((1.0 - outcome) - (1.0 - expected_a)),
            phi: self.decayed_phi(rating_b.phi),
            games_played: rating_b.games_played + 1
        };

        (new_a, new_b)
    }

    /// Expected score for the side rated `mu_a` against `mu_b`:
    /// E = 1 / (1 + 10^((mu_b - mu_a) / 400))
    pub fn expected_score(&self, mu_a: f64, mu_b: f64) -> f64 {
        1.0 / (1.0 + 10.0_f64.powf((mu_b - mu_a) / 400.0))
    }

    /// Uncertain ratings move faster: K = clamp(k_base + phi / k_phi_divisor, k_min, k_max)
    fn k_factor(&self, phi: f64) -> f64 {
        (self.config.k_base + phi / self.config.k_phi_divisor).clamp(self.config.k_min, self.config.k_max)
    }

    /// Every completed comparison makes a rating slightly more certain,
    /// regardless of outcome, down to the configured floor.
    fn decayed_phi(&self, phi: f64) -> f64 {
        (phi * self.config.phi_decay).max(self.config.min_phi)
    }

    /// Grows phi for a profile that has not played recently. Not part of
    /// the vote loop; intended for a periodic maintenance pass.
    pub fn apply_inactivity_decay(&self, rating: &Rating, days_inactive: i64) -> Rating {
        let grown = rating.phi + days_inactive as f64 * self.config.inactive_phi_growth_per_day;

        Rating {
            phi: grown.min(self.config.max_phi),
            ..*rating
        }
    }
}
