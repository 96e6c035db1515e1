//! Player controller trait and game state view
//!
//! The game loop asks a controller for each decision a turn needs: how many
//! dice to roll, whether to use the Radio Tower, whom to rob with the TV
//! Station, and what to buy. Controllers only see a read-only view.

use crate::core::{Player, PlayerId};
use crate::game::buying::Purchase;
use crate::game::outcomes::DiceMode;
use crate::game::{Dice, GameState, Step};
use crate::Result;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Which kind of controller drives a seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerType {
    Heuristic,
    Random,
}

impl fmt::Display for ControllerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerType::Heuristic => write!(f, "heuristic"),
            ControllerType::Random => write!(f, "random"),
        }
    }
}

/// Read-only view of the game from one seat
pub struct GameStateView<'a> {
    game: &'a GameState,
    player_id: PlayerId,
}

impl<'a> GameStateView<'a> {
    pub fn new(game: &'a GameState, player_id: PlayerId) -> Self {
        GameStateView { game, player_id }
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    /// Full state, for what-if evaluation on clones
    pub fn state(&self) -> &'a GameState {
        self.game
    }

    pub fn me(&self) -> Result<&'a Player> {
        self.game.player(self.player_id)
    }

    pub fn coins(&self) -> u32 {
        self.me().map(Player::coins).unwrap_or(0)
    }

    pub fn is_my_turn(&self) -> bool {
        self.game.current_id() == self.player_id
    }

    pub fn step(&self) -> Step {
        self.game.step()
    }

    pub fn dice(&self) -> Dice {
        self.game.dice()
    }

    pub fn can_roll_two(&self) -> bool {
        self.me().map(Player::has_train_station).unwrap_or(false)
    }

    /// Every other seat, clockwise from this one
    pub fn opponents(&self) -> SmallVec<[PlayerId; 3]> {
        self.game.others_clockwise(self.player_id).collect()
    }
}

/// Decisions an automated or interactive seat must make
pub trait PlayerController {
    fn player_id(&self) -> PlayerId;

    fn controller_type(&self) -> ControllerType;

    /// ROLL: one or two dice; two is only legal with a Train Station
    fn choose_dice_count(&mut self, view: &GameStateView) -> Result<DiceMode>;

    /// CONFIRM_ROLL: true to throw away the roll and roll again
    fn wants_reroll(&mut self, view: &GameStateView) -> Result<bool>;

    /// STEAL: pick one of `candidates` as the TV Station victim
    fn choose_steal_victim(&mut self, view: &GameStateView, candidates: &[PlayerId]) -> Result<PlayerId>;

    /// BUY: pick one of `options`; `options` always contains [`Purchase::EndTurn`]
    fn choose_purchase(&mut self, view: &GameStateView, options: &[Purchase]) -> Result<Purchase>;

    fn on_game_end(&mut self, _view: &GameStateView, _won: bool) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Landmark;

    #[test]
    fn test_view_reads_player() {
        let mut game = GameState::new(3).unwrap();
        game.players[1].add_landmark(Landmark::TrainStation).unwrap();

        let view = GameStateView::new(&game, PlayerId::new(1));
        assert_eq!(view.coins(), 3);
        assert!(view.can_roll_two());
        assert!(!view.is_my_turn());
        assert_eq!(view.opponents().as_slice(), &[PlayerId::new(2), PlayerId::new(0)]);

        let view = GameStateView::new(&game, PlayerId::new(0));
        assert!(!view.can_roll_two());
        assert!(view.is_my_turn());
    }

    #[test]
    fn test_unknown_seat_has_no_coins() {
        let game = GameState::new(2).unwrap();
        let view = GameStateView::new(&game, PlayerId::new(3));
        assert!(view.me().is_err());
        assert_eq!(view.coins(), 0);
    }
}
