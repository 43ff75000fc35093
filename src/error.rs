use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreError;

/// Failures surfaced by pair selection and vote processing.
///
/// All variants are terminal for the current request; the only internal
/// retry is the selector's bounded matchmaking loop. A pair the voter has
/// already seen is handled silently inside that loop and never escapes as
/// an error.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// Fewer than two rated profiles exist; no pair can be formed
    #[error("fewer than two rated profiles exist")]
    InsufficientPopulation,

    /// The referenced match does not exist or already has a recorded
    /// outcome. Rejected before any rating mutation is attempted.
    #[error("match {0} not found or already resolved")]
    StaleOrMissingMatch(Uuid),

    /// The ratings required for an update could not both be fetched.
    /// The update is never attempted with partial data.
    #[error("ratings not found for both profiles in the match")]
    RatingsNotFound,

    #[error(transparent)]
    Store(#[from] StoreError)
}
