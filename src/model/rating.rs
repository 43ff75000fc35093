use serde::{Deserialize, Serialize};

use crate::model::config::EngineConfig;

/// A profile's rating state. One exists per rankable profile, created
/// alongside it and mutated only by the rating engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    /// Point estimate of relative strength, Elo-style scale
    pub mu: f64,
    /// Uncertainty of mu, bounded to [min_phi, max_phi]
    pub phi: f64,
    /// Completed (non-skip) comparisons this profile has participated in
    pub games_played: i32
}

impl Rating {
    /// The rating given to a profile at creation time: default strength
    /// at maximal uncertainty, no games played.
    pub fn initial(config: &EngineConfig) -> Self {
        Rating {
            mu: config.initial_mu,
            phi: config.initial_phi,
            games_played: 0
        }
    }

    /// Conservative ranking value. High uncertainty is penalized so a
    /// lucky newcomer does not leapfrog established profiles.
    pub fn score(&self) -> f64 {
        self.mu - 2.0 * self.phi
    }
}
