//! Error types for the Machi Koro engine

use crate::core::{Card, Landmark, PlayerId};
use crate::game::Step;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MachiError {
    #[error("{player} cannot pay {amount} coins with a balance of {balance}")]
    NegativeBalance {
        player: PlayerId,
        amount: u32,
        balance: u32,
    },

    #[error("Die value must be between 0 and 6, got {0}")]
    InvalidDie(u8),

    #[error("Die total must be between 1 and 12, got {0}")]
    InvalidRollTotal(u8),

    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    #[error("{player} already owns {card}")]
    DuplicatePurple { player: PlayerId, card: Card },

    #[error("{player} already owns {landmark}")]
    DuplicateLandmark { player: PlayerId, landmark: Landmark },

    #[error("{0} is out of stock")]
    OutOfStock(Card),

    #[error("A game needs 2 to 4 players, got {0}")]
    InvalidPlayerCount(usize),

    #[error("Cannot {action} during step {step}")]
    IllegalStepTransition { step: Step, action: &'static str },

    #[error("Invalid game action: {0}")]
    InvalidAction(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl MachiError {
    /// True for failures that indicate corrupted state or a caller bug rather
    /// than a request made at the wrong time.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            MachiError::NegativeBalance { .. }
                | MachiError::InvalidDie(_)
                | MachiError::InvalidRollTotal(_)
                | MachiError::PlayerNotFound(_)
                | MachiError::DuplicatePurple { .. }
                | MachiError::DuplicateLandmark { .. }
                | MachiError::OutOfStock(_)
                | MachiError::InvalidPlayerCount(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, MachiError>;
