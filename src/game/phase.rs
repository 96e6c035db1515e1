//! Turn steps

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the current player is within their turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Step {
    /// Players are still being configured
    #[default]
    Setup,
    /// Waiting for the current player to roll
    Roll,
    /// Radio Tower owner may keep the roll or reroll once
    ConfirmRoll,
    /// TV Station triggered; a victim must be chosen
    Steal,
    /// Current player may buy one card or landmark, or end the turn
    Buy,
    /// Someone owns all four landmarks
    Won,
}

impl Step {
    /// Steps in which a player can be asked for a decision
    pub fn needs_decision(&self) -> bool {
        matches!(self, Step::Roll | Step::ConfirmRoll | Step::Steal | Step::Buy)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Step::Won)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Step::Setup => "setup",
            Step::Roll => "roll",
            Step::ConfirmRoll => "confirm",
            Step::Steal => "steal",
            Step::Buy => "buy",
            Step::Won => "won",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
