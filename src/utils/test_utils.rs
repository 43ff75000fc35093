use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::model::rating::Rating;

/// Seeded RNG for reproducible selector behavior in tests.
pub fn seeded_rng() -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(42)
}

pub fn generate_rating(mu: f64, phi: f64, games_played: i32) -> Rating {
    Rating { mu, phi, games_played }
}
