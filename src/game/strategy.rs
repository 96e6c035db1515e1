//! Trait-weighted scorer behind every automated decision
//!
//! One [`Strategy`] value combines a player's [`StrategyProfile`] with the
//! shared [`StrategyTuning`]. Personalities differ only in their degrees.

use crate::config::StrategyTuning;
use crate::core::{StrategyProfile, StrategyTrait};
use crate::game::buying::{compare_decisions, BuyingDecision};

/// Inputs for the dice-count decision, all from the player's point of view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollSingleInputs {
    pub average_one_die: f64,
    pub average_two_dice: f64,
    pub best_two_dice: i32,
    pub others_average_one_die: f64,
    pub others_average_two_dice: f64,
}

/// Inputs for the reroll decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RerollInputs {
    /// Coins the current roll nets the active player
    pub current_benefit: i32,
    /// Combined coins the current roll nets everyone else
    pub others_benefit: i32,
    /// Best case for the dice count already chosen
    pub best_benefit: i32,
    /// Average for the dice count already chosen
    pub average_benefit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Strategy {
    profile: StrategyProfile,
    tuning: StrategyTuning,
}

impl Strategy {
    pub fn new(profile: StrategyProfile, tuning: StrategyTuning) -> Self {
        Strategy { profile, tuning }
    }

    pub fn profile(&self) -> &StrategyProfile {
        &self.profile
    }

    pub fn tuning(&self) -> &StrategyTuning {
        &self.tuning
    }

    fn degree(&self, strategy_trait: StrategyTrait) -> f64 {
        f64::from(self.profile.degree(strategy_trait))
    }

    /// Signed preference for one die; positive means roll one
    pub fn roll_single_weight(&self, inputs: &RollSingleInputs) -> f64 {
        let basic = (inputs.average_one_die - inputs.average_two_dice) * self.tuning.roll_single_factor;
        let optimism = (inputs.average_one_die - f64::from(inputs.best_two_dice))
            * self.degree(StrategyTrait::Optimist);
        let attack = (inputs.others_average_two_dice - inputs.others_average_one_die)
            * self.degree(StrategyTrait::AttackFocused);
        basic + optimism + attack
    }

    pub fn roll_single(&self, inputs: &RollSingleInputs) -> bool {
        self.roll_single_weight(inputs) > 0.0
    }

    /// Whether to use the Radio Tower on the roll just made
    ///
    /// A trait at degree 0 switches off the threshold rule scaled by it.
    pub fn reroll(&self, inputs: &RerollInputs) -> bool {
        let optimism = self.degree(StrategyTrait::Optimist);
        let attack = self.degree(StrategyTrait::AttackFocused);
        let current = f64::from(inputs.current_benefit);

        if inputs.current_benefit <= 0 {
            return true;
        }
        if inputs.average_benefit > current && optimism > 0.0 {
            return true;
        }
        if attack > 0.0
            && f64::from(inputs.others_benefit) > current + self.tuning.other_player_benefit_reroll / attack
        {
            return true;
        }
        if optimism > 0.0
            && f64::from(inputs.best_benefit - inputs.current_benefit)
                > self.tuning.best_roll_benefit_reroll / optimism
        {
            return true;
        }
        false
    }

    /// `(strategic × w_s + benefit + progress × w_p) / (cost × w_c)`
    ///
    /// `strategic` is the tag magnitudes already weighted by trait degree.
    pub fn weighted_score(&self, strategic: f64, benefit: f64, progress: f64, cost: u32) -> f64 {
        let cost = f64::from(cost) * self.tuning.cost_weight;
        if cost <= 0.0 {
            return 0.0;
        }
        (strategic * self.tuning.strategy_weight + benefit + progress * self.tuning.progress_weight) / cost
    }

    pub fn composite_score(&self, decision: &BuyingDecision) -> f64 {
        let strategic: f64 = decision
            .strategic_value
            .iter()
            .map(|(strategy_trait, magnitude)| magnitude * self.degree(*strategy_trait))
            .sum();
        self.weighted_score(strategic, decision.average_benefit, decision.progress(), decision.cost())
    }

    pub fn consider_saving_for_cards(&self, coins: u32) -> bool {
        coins > self.tuning.coins_to_consider_saving
            && self.profile.degree(StrategyTrait::Saver) >= self.tuning.min_saver_for_cards
    }

    pub fn consider_saving_for_landmarks(&self, coins: u32) -> bool {
        coins > self.tuning.coins_to_consider_saving
            && self.profile.degree(StrategyTrait::Saver) >= self.tuning.min_saver_for_landmarks
    }

    fn is_cheap(&self, decision: &BuyingDecision, coins: u32) -> bool {
        decision.cost() <= coins
            && self.profile.degree(StrategyTrait::Saver) <= self.tuning.max_saver_for_cheap_purchase
            && decision.cost() <= self.tuning.max_cost_for_cheap_purchase
    }

    fn is_worth_saving_for(&self, decision: &BuyingDecision, best_affordable: &BuyingDecision, coins: u32) -> bool {
        let gap = decision.composite_score - best_affordable.composite_score;
        if gap <= 0.0 || decision.cost() <= coins {
            return false;
        }
        let shortfall = f64::from(decision.cost() - coins);
        gap / shortfall * self.degree(StrategyTrait::Saver) > self.tuning.saving_value_threshold
    }

    /// Score every candidate and pick one
    ///
    /// Ending the turn scores 0, so a candidate has to beat it to be bought.
    /// When some unaffordable candidate is worth saving for, only a cheap
    /// purchase (or nothing) is made this turn.
    pub fn make_buying_decision(&self, mut candidates: Vec<BuyingDecision>, coins: u32) -> BuyingDecision {
        for decision in candidates.iter_mut() {
            decision.composite_score = self.composite_score(decision);
        }
        candidates.sort_by(compare_decisions);

        let mut best_affordable: Option<&BuyingDecision> = None;
        let mut best_cheap: Option<&BuyingDecision> = None;
        for decision in &candidates {
            let beats = |best: Option<&BuyingDecision>| {
                decision.composite_score > best.map_or(0.0, |b| b.composite_score)
            };
            if decision.cost() <= coins && beats(best_affordable) {
                best_affordable = Some(decision);
            }
            if self.is_cheap(decision, coins) && beats(best_cheap) {
                best_cheap = Some(decision);
            }
        }

        let end_turn = BuyingDecision::end_turn();
        let affordable = best_affordable.unwrap_or(&end_turn);
        let save_up = candidates
            .iter()
            .any(|decision| self.is_worth_saving_for(decision, affordable, coins));
        let chosen = if save_up { best_cheap } else { best_affordable };
        chosen.cloned().unwrap_or(end_turn)
    }
}
