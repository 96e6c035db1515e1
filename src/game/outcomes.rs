//! Outcome enumeration and roll statistics
//!
//! Resolves every reachable die total (1-12) once, using the maximum-victim
//! TV Station variant, and derives expected values from the table under the
//! one-die and two-dice distributions.

use crate::core::PlayerId;
use crate::game::resolver::{resolve_roll, RollEffects, TvStationMode};
use crate::game::GameState;
use crate::{MachiError, Result};
use std::ops::RangeInclusive;

/// Probability of each face of one die
pub const SINGLE_ROLL_PROBABILITY: f64 = 1.0 / 6.0;

/// Probability that two dice show the same face
pub const DOUBLES_PROBABILITY: f64 = 1.0 / 6.0;

/// Highest reachable total
pub const MAX_TOTAL: u8 = 12;

/// Probability of `total` on two dice (triangular distribution over 2..=12)
pub fn two_dice_probability(total: u8) -> f64 {
    match total {
        2..=12 => f64::from(6 - (7 - i32::from(total)).abs()) / 36.0,
        _ => 0.0,
    }
}

/// Probability of `total` on one die
pub fn one_die_probability(total: u8) -> f64 {
    match total {
        1..=6 => SINGLE_ROLL_PROBABILITY,
        _ => 0.0,
    }
}

/// Number of dice rolled
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DiceMode {
    One,
    Two,
}

impl DiceMode {
    pub fn totals(&self) -> RangeInclusive<u8> {
        match self {
            DiceMode::One => 1..=6,
            DiceMode::Two => 2..=12,
        }
    }

    pub fn probability(&self, total: u8) -> f64 {
        match self {
            DiceMode::One => one_die_probability(total),
            DiceMode::Two => two_dice_probability(total),
        }
    }
}

/// Per-player summary of an [`OutcomeTable`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutcomeStats {
    pub average_one_die: f64,
    pub average_two_dice: f64,
    pub best_one_die: i32,
    pub best_two_dice: i32,
    pub best_two_dice_probability: f64,
    pub others_average_one_die: f64,
    pub others_average_two_dice: f64,
}

impl OutcomeStats {
    pub fn average(&self, mode: DiceMode) -> f64 {
        match mode {
            DiceMode::One => self.average_one_die,
            DiceMode::Two => self.average_two_dice,
        }
    }

    pub fn best(&self, mode: DiceMode) -> i32 {
        match mode {
            DiceMode::One => self.best_one_die,
            DiceMode::Two => self.best_two_dice,
        }
    }
}

/// Coin deltas for every die total from 1 to 12, from the current player's turn
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeTable {
    active: PlayerId,
    /// Row `i` holds the effects of total `i + 1`
    rows: Vec<RollEffects>,
}

impl OutcomeTable {
    /// Resolve all totals against `game` for its current player
    pub fn enumerate(game: &GameState) -> Result<Self> {
        let rows = (1..=MAX_TOTAL)
            .map(|total| resolve_roll(game, total, TvStationMode::MaximumVictim).map(|r| r.effects))
            .collect::<Result<Vec<_>>>()?;
        Ok(OutcomeTable {
            active: game.current_id(),
            rows,
        })
    }

    /// Table from precomputed rows, one per total from 1 to 12
    pub fn from_rows(active: PlayerId, rows: Vec<RollEffects>) -> Result<Self> {
        if rows.len() != usize::from(MAX_TOTAL) {
            return Err(MachiError::InvalidAction(format!(
                "outcome table needs {MAX_TOTAL} rows, got {}",
                rows.len()
            )));
        }
        Ok(OutcomeTable { active, rows })
    }

    /// Player whose turn the table was built for
    pub fn active(&self) -> PlayerId {
        self.active
    }

    pub fn effects(&self, total: u8) -> Option<&RollEffects> {
        if total == 0 {
            return None;
        }
        self.rows.get(usize::from(total) - 1)
    }

    /// Delta for `player` on `total`; 0 for unreachable totals
    pub fn delta(&self, player: PlayerId, total: u8) -> i32 {
        self.effects(total).map_or(0, |effects| effects.get(player))
    }

    /// Combined delta of everyone but `player` on `total`
    pub fn others_delta(&self, player: PlayerId, total: u8) -> i32 {
        self.effects(total)
            .map_or(0, |effects| effects.others_total(player))
    }

    pub fn average(&self, player: PlayerId, mode: DiceMode) -> f64 {
        mode.totals()
            .map(|total| f64::from(self.delta(player, total)) * mode.probability(total))
            .sum()
    }

    pub fn others_average(&self, player: PlayerId, mode: DiceMode) -> f64 {
        mode.totals()
            .map(|total| f64::from(self.others_delta(player, total)) * mode.probability(total))
            .sum()
    }

    /// Largest gain `player` can see in `mode`, floored at zero
    pub fn best_case(&self, player: PlayerId, mode: DiceMode) -> i32 {
        mode.totals()
            .map(|total| self.delta(player, total))
            .fold(0, i32::max)
    }

    /// Probability of the total that produces the best case
    ///
    /// Ties go to the first (lowest) total reaching the maximum. A best case
    /// of zero is treated as certain.
    pub fn best_case_probability(&self, player: PlayerId, mode: DiceMode) -> f64 {
        let best = self.best_case(player, mode);
        if best <= 0 {
            return 1.0;
        }
        mode.totals()
            .find(|total| self.delta(player, *total) == best)
            .map_or(1.0, |total| mode.probability(total))
    }

    pub fn stats(&self, player: PlayerId) -> OutcomeStats {
        OutcomeStats {
            average_one_die: self.average(player, DiceMode::One),
            average_two_dice: self.average(player, DiceMode::Two),
            best_one_die: self.best_case(player, DiceMode::One),
            best_two_dice: self.best_case(player, DiceMode::Two),
            best_two_dice_probability: self.best_case_probability(player, DiceMode::Two),
            others_average_one_die: self.others_average(player, DiceMode::One),
            others_average_two_dice: self.others_average(player, DiceMode::Two),
        }
    }
}
