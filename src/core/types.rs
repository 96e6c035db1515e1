//! Strongly-typed wrappers for game concepts
//!
//! Seats and names are wrapped in distinct types so a seat index can never be
//! mixed up with a coin amount or a die total.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A player's seat in turn order (0-based)
///
/// Seats are stable for the lifetime of a game, so the seat doubles as the
/// player's identifier. Neighbour lookups are modulo the player count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(usize);

impl PlayerId {
    pub fn new(seat: usize) -> Self {
        PlayerId(seat)
    }

    pub fn index(&self) -> usize {
        self.0
    }

    /// Seat to the left, wrapping around a table of `player_count` players
    pub fn next(&self, player_count: usize) -> PlayerId {
        PlayerId((self.0 + 1) % player_count)
    }

    /// Seat to the right, wrapping around a table of `player_count` players
    pub fn previous(&self, player_count: usize) -> PlayerId {
        PlayerId((self.0 + player_count - 1) % player_count)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.0 + 1)
    }
}

/// Player name (distinct from other string types)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(s: impl Into<String>) -> Self {
        PlayerName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PlayerName {
    fn from(s: String) -> Self {
        PlayerName(s)
    }
}

impl From<&str> for PlayerName {
    fn from(s: &str) -> Self {
        PlayerName(s.to_string())
    }
}
