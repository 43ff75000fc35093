// Rating model constants
pub const INIT_MU: f64 = 1500.0;
pub const INIT_PHI: f64 = 350.0;
pub const MIN_PHI: f64 = 60.0;
pub const MAX_PHI: f64 = 350.0;

// K-factor: K_BASE + phi / K_PHI_DIVISOR, clamped to [K_MIN, K_MAX]
pub const K_BASE: f64 = 16.0;
pub const K_PHI_DIVISOR: f64 = 25.0;
pub const K_MIN: f64 = 16.0;
pub const K_MAX: f64 = 64.0;

// Uncertainty shrinks by this factor after every completed comparison
pub const PHI_DECAY: f64 = 0.95;
// Uncertainty regained per day of inactivity, capped at MAX_PHI
pub const INACTIVE_PHI_GROWTH_PER_DAY: f64 = 2.0;

// Matchmaking constants
pub const NEWCOMER_GAMES_THRESHOLD: i32 = 5;
pub const NEWCOMER_PHI_THRESHOLD: f64 = 100.0;
pub const ANCHOR_PHI_THRESHOLD: f64 = 60.0;
pub const P_NEWCOMER: f64 = 0.6;
pub const MAX_ATTEMPTS: u32 = 5;
