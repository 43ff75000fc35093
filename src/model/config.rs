use serde::{Deserialize, Serialize};

use crate::model::constants;

/// Tunable constants for the rating engine and the pair selector.
///
/// Both components receive a config by value at construction so alternate
/// tunings can be tested without touching global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Rating assigned to a freshly created profile
    pub initial_mu: f64,
    /// Uncertainty assigned to a freshly created profile (maximal)
    pub initial_phi: f64,
    /// Floor for phi; play can never make a rating more certain than this
    pub min_phi: f64,
    /// Ceiling for phi; inactivity decay can never exceed this
    pub max_phi: f64,
    /// Base component of the per-side K-factor
    pub k_base: f64,
    /// phi is divided by this when computing the K-factor
    pub k_phi_divisor: f64,
    /// Lower clamp for the K-factor
    pub k_min: f64,
    /// Upper clamp for the K-factor
    pub k_max: f64,
    /// Multiplicative phi decay applied to both sides of a completed comparison
    pub phi_decay: f64,
    /// phi regained per day of inactivity
    pub inactive_phi_growth_per_day: f64,
    /// Profiles with fewer games than this count as newcomers
    pub newcomer_games_threshold: i32,
    /// Profiles with phi above this count as newcomers regardless of games
    pub newcomer_phi_threshold: f64,
    /// Anchors must have phi below this
    pub anchor_phi_threshold: f64,
    /// Probability of attempting the newcomer-biased strategy on a cycle
    pub p_newcomer: f64,
    /// Maximum full selection cycles before the freshness check is abandoned
    pub max_attempts: u32
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            initial_mu: constants::INIT_MU,
            initial_phi: constants::INIT_PHI,
            min_phi: constants::MIN_PHI,
            max_phi: constants::MAX_PHI,
            k_base: constants::K_BASE,
            k_phi_divisor: constants::K_PHI_DIVISOR,
            k_min: constants::K_MIN,
            k_max: constants::K_MAX,
            phi_decay: constants::PHI_DECAY,
            inactive_phi_growth_per_day: constants::INACTIVE_PHI_GROWTH_PER_DAY,
            newcomer_games_threshold: constants::NEWCOMER_GAMES_THRESHOLD,
            newcomer_phi_threshold: constants::NEWCOMER_PHI_THRESHOLD,
            anchor_phi_threshold: constants::ANCHOR_PHI_THRESHOLD,
            p_newcomer: constants::P_NEWCOMER,
            max_attempts: constants::MAX_ATTEMPTS
        }
    }
}
