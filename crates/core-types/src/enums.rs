use serde::{Deserialize, Serialize};

/// The part a selected symbol plays in a user's pick set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Captain,
    ViceCaptain,
    Regular,
}

impl Role {
    /// Returns true for the two designations that earn a multiplier.
    pub fn is_designated(&self) -> bool {
        !matches!(self, Role::Regular)
    }
}

/// Which mode the game is in from the point of view of a presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No picks registered yet (or the game was reset).
    #[default]
    AwaitingPicks,
    /// Picks are installed and reports carry a leaderboard.
    Live,
}
