//! Tuning constants for automated players
//!
//! None of these values come from the rules of the game; they were found by
//! playtesting and can be overridden from a JSON file. Missing fields keep
//! their defaults.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyTuning {
    /// Weight of the average-gain difference when choosing one die over two
    pub roll_single_factor: f64,
    /// Reroll if others gain more than the player by this much (divided by attack degree)
    pub other_player_benefit_reroll: f64,
    /// Reroll if the best case beats the current roll by this much (divided by optimist degree)
    pub best_roll_benefit_reroll: f64,

    pub min_saver_for_cards: u8,
    pub min_saver_for_landmarks: u8,
    /// Highest saver degree that still makes cheap purchases while saving
    pub max_saver_for_cheap_purchase: u8,
    pub saving_value_threshold: f64,
    pub max_cost_for_cheap_purchase: u32,
    /// Saving is only considered with strictly more coins than this
    pub coins_to_consider_saving: u32,

    pub strategy_weight: f64,
    pub progress_weight: f64,
    pub cost_weight: f64,

    /// Share of the attack payout lost per copy already in play
    pub red_competition_factor: f64,
    pub purple_factor: f64,
    /// Tag for grain/cow/gear cards feeding a compound card
    pub focus_supply_tag: f64,
    /// Tag for the compound card itself
    pub focus_compound_tag: f64,
    /// Tag for the Radio Tower on every focus trait
    pub focus_radio_tag: f64,
    pub best_roll_optimist_factor: f64,

    /// Expected share of two-dice rolls for a player with a Train Station
    pub two_dice_share_with_train_station: f64,
    /// Expected share of two-dice rolls for a player still without one
    pub two_dice_share_without_train_station: f64,
    /// Supply cards stop earning a focus tag at this many owned
    pub max_beneficial_focus_cards: u32,
}

impl Default for StrategyTuning {
    fn default() -> Self {
        StrategyTuning {
            roll_single_factor: 20.0,
            other_player_benefit_reroll: 5.0,
            best_roll_benefit_reroll: 10.0,
            min_saver_for_cards: 3,
            min_saver_for_landmarks: 1,
            max_saver_for_cheap_purchase: 2,
            saving_value_threshold: 3.0,
            max_cost_for_cheap_purchase: 2,
            coins_to_consider_saving: 3,
            strategy_weight: 0.5,
            progress_weight: 5.0,
            cost_weight: 0.5,
            red_competition_factor: 0.5,
            purple_factor: 0.7,
            focus_supply_tag: 1.5,
            focus_compound_tag: 2.0,
            focus_radio_tag: 3.0,
            best_roll_optimist_factor: 0.2,
            two_dice_share_with_train_station: 0.5,
            two_dice_share_without_train_station: 0.1,
            max_beneficial_focus_cards: 4,
        }
    }
}

impl StrategyTuning {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        StrategyTuning::from_json_str(&json)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Expected (one die, two dice) shares of a player's future rolls
    pub fn dice_mix(&self, has_train_station: bool) -> (f64, f64) {
        let two = if has_train_station {
            self.two_dice_share_with_train_station
        } else {
            self.two_dice_share_without_train_station
        };
        (1.0 - two, two)
    }
}
