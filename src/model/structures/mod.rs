pub mod outcome;
pub mod pending_match;
