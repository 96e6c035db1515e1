//! Random AI controller for testing and baseline gameplay
//!
//! Makes uniformly random legal choices. Serves as the yardstick heuristic
//! profiles are measured against.

use crate::core::PlayerId;
use crate::game::buying::Purchase;
use crate::game::controller::{ControllerType, GameStateView, PlayerController};
use crate::game::outcomes::DiceMode;
use crate::{MachiError, Result};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

pub struct RandomController {
    player_id: PlayerId,
    rng: Box<dyn RngCore>,
}

impl RandomController {
    pub fn new(player_id: PlayerId) -> Self {
        RandomController {
            player_id,
            rng: Box::new(rand::thread_rng()),
        }
    }

    /// Seeded RNG for deterministic games
    pub fn with_seed(player_id: PlayerId, seed: u64) -> Self {
        RandomController {
            player_id,
            rng: Box::new(Xoshiro256PlusPlus::seed_from_u64(seed)),
        }
    }
}

impl PlayerController for RandomController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn controller_type(&self) -> ControllerType {
        ControllerType::Random
    }

    fn choose_dice_count(&mut self, view: &GameStateView) -> Result<DiceMode> {
        if view.can_roll_two() && self.rng.gen_bool(0.5) {
            Ok(DiceMode::Two)
        } else {
            Ok(DiceMode::One)
        }
    }

    fn wants_reroll(&mut self, _view: &GameStateView) -> Result<bool> {
        Ok(self.rng.gen_bool(0.5))
    }

    fn choose_steal_victim(&mut self, _view: &GameStateView, candidates: &[PlayerId]) -> Result<PlayerId> {
        candidates
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| MachiError::InvalidAction("no player to steal from".to_string()))
    }

    fn choose_purchase(&mut self, _view: &GameStateView, options: &[Purchase]) -> Result<Purchase> {
        Ok(options.choose(&mut self.rng).copied().unwrap_or(Purchase::EndTurn))
    }
}
