use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::structures::pending_match::PendingComparison;

/// Result of a single comparison as reported by the voter.
///
/// Only decisive outcomes feed the rating engine; a skip is recorded for
/// history but produces no rating change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "left")]
    LeftWins,
    #[serde(rename = "right")]
    RightWins,
    #[serde(rename = "skip")]
    Skip
}

impl Outcome {
    /// Score for the left side in the rating engine's terms:
    /// 1 = left won, 0 = right won. None for a skip.
    pub fn left_score(&self) -> Option<f64> {
        match self {
            Outcome::LeftWins => Some(1.0),
            Outcome::RightWins => Some(0.0),
            Outcome::Skip => None
        }
    }

    /// Winning profile id for a decisive outcome, None for a skip.
    pub fn winner_id(&self, pending: &PendingComparison) -> Option<Uuid> {
        match self {
            Outcome::LeftWins => Some(pending.left_id),
            Outcome::RightWins => Some(pending.right_id),
            Outcome::Skip => None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_score() {
        assert_eq!(Outcome::LeftWins.left_score(), Some(1.0));
        assert_eq!(Outcome::RightWins.left_score(), Some(0.0));
        assert_eq!(Outcome::Skip.left_score(), None);
    }

    #[test]
    fn test_winner_id() {
        let pending = PendingComparison::new(Uuid::new_v4(), Uuid::new_v4(), "voter-1");

        assert_eq!(Outcome::LeftWins.winner_id(&pending), Some(pending.left_id));
        assert_eq!(Outcome::RightWins.winner_id(&pending), Some(pending.right_id));
        assert_eq!(Outcome::Skip.winner_id(&pending), None);
    }

    #[test]
    fn test_serde_wire_names() {
        assert_eq!(serde_json::to_string(&Outcome::LeftWins).unwrap(), "\"left\"");
        assert_eq!(serde_json::to_string(&Outcome::RightWins).unwrap(), "\"right\"");
        assert_eq!(serde_json::to_string(&Outcome::Skip).unwrap(), "\"skip\"");
    }
}
