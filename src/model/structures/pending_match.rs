use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order-independent identity of an unordered pair of profile ids.
/// Used to detect pairs a voter has already been shown.
pub fn pair_key(a: Uuid, b: Uuid) -> String {
    if a <= b {
        format!("{a}:{b}")
    } else {
        format!("{b}:{a}")
    }
}

/// An issued, not-yet-resolved comparison shown to a voter.
///
/// Created once by the selector, read once by the vote flow, never
/// mutated. At most one outcome may ever be recorded against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingComparison {
    pub id: Uuid,
    pub left_id: Uuid,
    pub right_id: Uuid,
    /// Unordered pair key, see [`pair_key`]
    pub pair_key: String,
    /// Opaque session token of the requesting voter
    pub voter_id: String,
    pub created_at: DateTime<FixedOffset>
}

impl PendingComparison {
    pub fn new(left_id: Uuid, right_id: Uuid, voter_id: &str) -> Self {
        PendingComparison {
            id: Uuid::new_v4(),
            pair_key: pair_key(left_id, right_id),
            left_id,
            right_id,
            voter_id: voter_id.to_string(),
            created_at: Utc::now().fixed_offset()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_is_order_independent() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert_eq!(pair_key(a, b), pair_key(b, a));
    }

    #[test]
    fn test_pair_key_distinguishes_pairs() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();

        assert_ne!(pair_key(a, b), pair_key(a, c));
    }

    #[test]
    fn test_new_pending_comparison() {
        let left = Uuid::new_v4();
        let right = Uuid::new_v4();
        let pending = PendingComparison::new(left, right, "voter-1");

        assert_eq!(pending.left_id, left);
        assert_eq!(pending.right_id, right);
        assert_eq!(pending.voter_id, "voter-1");
        assert_eq!(pending.pair_key, pair_key(right, left));
    }
}
