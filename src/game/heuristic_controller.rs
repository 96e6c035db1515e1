//! Heuristic AI controller
//!
//! Every decision starts from an [`OutcomeTable`] of the live state. Purchase
//! candidates are valued by expected coins per round, measured either from
//! the catalog (attack and purple cards) or as the marginal own-production
//! gain between the live state and a clone where the card is already owned.
//! A [`Strategy`] then turns each candidate into a composite score.

use crate::config::StrategyTuning;
use crate::core::{Card, CardCategory, Landmark, Player, PlayerId, StrategyProfile, StrategyTrait, PURPLE_ROLL};
use crate::game::buying::{BuyingDecision, Purchase};
use crate::game::controller::{ControllerType, GameStateView, PlayerController};
use crate::game::outcomes::{
    one_die_probability, two_dice_probability, DiceMode, OutcomeTable, DOUBLES_PROBABILITY,
    SINGLE_ROLL_PROBABILITY,
};
use crate::game::resolver::own_production;
use crate::game::strategy::{RerollInputs, RollSingleInputs, Strategy};
use crate::game::GameState;
use crate::{MachiError, Result};

/// Focus trait served by a compound card
fn focus_trait(compound: Card) -> Option<StrategyTrait> {
    match compound {
        Card::FruitAndVegetableMarket => Some(StrategyTrait::FruitAndVegFocused),
        Card::CheeseFactory => Some(StrategyTrait::CheeseFocused),
        Card::FurnitureFactory => Some(StrategyTrait::FactoryFocused),
        _ => None,
    }
}

/// Expected dice shares for the seat whose turn it is and for everyone else
#[derive(Debug, Clone, Copy)]
struct DiceMix {
    own_one: f64,
    own_two: f64,
    /// Summed over the other players, one share per player
    others_one: f64,
    others_two: f64,
}

pub struct HeuristicController {
    player_id: PlayerId,
    strategy: Strategy,
}

impl HeuristicController {
    pub fn new(player_id: PlayerId, profile: StrategyProfile, tuning: StrategyTuning) -> Self {
        HeuristicController {
            player_id,
            strategy: Strategy::new(profile, tuning),
        }
    }

    /// Neutral profile with default tuning
    pub fn neutral(player_id: PlayerId) -> Self {
        HeuristicController::new(player_id, StrategyProfile::new(), StrategyTuning::default())
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    fn tuning(&self) -> &StrategyTuning {
        self.strategy.tuning()
    }

    fn roll_single_inputs(table: &OutcomeTable, me: PlayerId) -> RollSingleInputs {
        let stats = table.stats(me);
        RollSingleInputs {
            average_one_die: stats.average_one_die,
            average_two_dice: stats.average_two_dice,
            best_two_dice: stats.best_two_dice,
            others_average_one_die: stats.others_average_one_die,
            others_average_two_dice: stats.others_average_two_dice,
        }
    }

    /// ROLL: always one die without a Train Station
    pub fn roll_single_die(&self, game: &GameState) -> Result<bool> {
        let me = game.current_player()?;
        if !me.has_train_station() {
            return Ok(true);
        }
        let table = OutcomeTable::enumerate(game)?;
        Ok(self
            .strategy
            .roll_single(&Self::roll_single_inputs(&table, me.id)))
    }

    /// CONFIRM_ROLL: whether to throw away the dice currently showing
    pub fn should_reroll(&self, game: &GameState) -> Result<bool> {
        let dice = game.dice();
        if !dice.is_rolled() {
            return Err(MachiError::InvalidAction("no roll to reconsider".to_string()));
        }
        let me = game.current_player()?;
        let table = OutcomeTable::enumerate(game)?;
        let current = table.delta(me.id, dice.total());

        // The extra turn from doubles outweighs a better roll
        if dice.is_doubles() && me.has_amusement_park() && (me.coins() > 0 || current > 0) {
            return Ok(false);
        }

        // A reroll uses the same number of dice
        let mode = if dice.rolled_two() {
            DiceMode::Two
        } else {
            DiceMode::One
        };
        Ok(self.strategy.reroll(&RerollInputs {
            current_benefit: current,
            others_benefit: table.others_delta(me.id, dice.total()),
            best_benefit: table.best_case(me.id, mode),
            average_benefit: table.average(me.id, mode),
        }))
    }

    /// STEAL: richest opponent, unless several can pay the full amount
    ///
    /// Among opponents holding at least the TV Station amount, the one closest
    /// to winning is robbed. Ties go to the first seat clockwise.
    pub fn choose_victim(&self, game: &GameState) -> Result<PlayerId> {
        let active = game.current_id();
        let opponents: Vec<&Player> = game
            .others_clockwise(active)
            .map(|id| game.player(id))
            .collect::<Result<_>>()?;

        let full_amount = Card::TvStation.amount();
        let solvent: Vec<&Player> = opponents
            .iter()
            .copied()
            .filter(|p| p.coins() >= full_amount)
            .collect();

        let chosen = if solvent.len() >= 2 {
            solvent
                .into_iter()
                .fold(None, |best: Option<&Player>, p| match best {
                    Some(b) if b.progress() >= p.progress() => Some(b),
                    _ => Some(p),
                })
        } else {
            opponents
                .into_iter()
                .fold(None, |best: Option<&Player>, p| match best {
                    Some(b) if b.coins() >= p.coins() => Some(b),
                    _ => Some(p),
                })
        };
        chosen
            .map(|p| p.id)
            .ok_or_else(|| MachiError::InvalidAction("no player to steal from".to_string()))
    }

    fn dice_mix(&self, game: &GameState, me: &Player) -> DiceMix {
        let tuning = self.tuning();
        let (own_one, own_two) = tuning.dice_mix(me.has_train_station());
        let (others_one, others_two) = game
            .players
            .iter()
            .filter(|p| p.id != me.id)
            .map(|p| tuning.dice_mix(p.has_train_station()))
            .fold((0.0, 0.0), |(a, b), (one, two)| (a + one, b + two));
        DiceMix {
            own_one,
            own_two,
            others_one,
            others_two,
        }
    }

    /// Candidates the current player would consider this turn
    pub fn buying_candidates(&self, game: &GameState) -> Result<Vec<BuyingDecision>> {
        let me = game.current_player()?;
        let coins = me.coins();
        let save_for_cards = self.strategy.consider_saving_for_cards(coins);
        let save_for_landmarks = self.strategy.consider_saving_for_landmarks(coins);

        let mut candidates = Vec::new();
        for card in Card::ALL {
            if game.market_stock(card) == 0 || (card.is_purple() && me.owns(card)) {
                continue;
            }
            if save_for_cards || coins >= card.cost() {
                candidates.push(self.evaluate_card(game, card)?);
            }
        }

        let table = OutcomeTable::enumerate(game)?;
        for landmark in Landmark::ALL {
            if me.has_landmark(landmark) {
                continue;
            }
            if save_for_landmarks || coins >= landmark.cost() {
                candidates.push(self.evaluate_landmark(game, &table, landmark)?);
            }
        }
        Ok(candidates)
    }

    /// BUY: the chosen candidate, or end turn when there is none
    pub fn make_buying_decision(&self, game: &GameState) -> Result<BuyingDecision> {
        let coins = game.current_player()?.coins();
        let candidates = self.buying_candidates(game)?;
        if candidates.is_empty() {
            return Ok(BuyingDecision::end_turn());
        }
        Ok(self.strategy.make_buying_decision(candidates, coins))
    }

    /// Value a card for the current player
    pub fn evaluate_card(&self, game: &GameState, card: Card) -> Result<BuyingDecision> {
        let me = game.current_player()?;
        let mix = self.dice_mix(game, me);
        let mut decision = BuyingDecision::card(card);

        if card.is_purple() {
            let per_trigger = match card {
                Card::Stadium => card.amount() * (game.player_count() as u32 - 1),
                _ => card.amount(),
            };
            let per_trigger = f64::from(per_trigger);
            let benefit = (per_trigger * SINGLE_ROLL_PROBABILITY * mix.own_one
                + per_trigger * two_dice_probability(PURPLE_ROLL) * mix.own_two)
                * self.tuning().purple_factor;
            decision.average_benefit = benefit;
            decision.tag(StrategyTrait::AttackFocused, benefit);
        } else if card.is_attack() {
            let mut per_card = card.amount();
            if me.has_shopping_mall() {
                per_card += 1;
            }
            let per_card = f64::from(per_card);
            let mut if_coins_available = 0.0;
            for &roll in card.rolls() {
                if_coins_available += per_card * two_dice_probability(roll) * mix.others_two;
                if_coins_available += per_card * one_die_probability(roll) * mix.others_one;
            }
            // Copies already in play compete for the same coins
            let competition = f64::from(game.sold_copies(card) + 1) * self.tuning().red_competition_factor;
            let benefit = if_coins_available / competition.min(1.0);
            decision.average_benefit = benefit;
            decision.tag(StrategyTrait::AttackFocused, benefit);
        } else if card.is_own_production() {
            self.evaluate_production_card(game, me, card, &mix, &mut decision)?;
        }
        Ok(decision)
    }

    fn evaluate_production_card(
        &self,
        game: &GameState,
        me: &Player,
        card: Card,
        mix: &DiceMix,
        decision: &mut BuyingDecision,
    ) -> Result<()> {
        let hypothetical = game.with_card_added(me.id, card)?;
        let gain = |roll: u8| -> Result<f64> {
            let before = own_production(game, me.id, roll)?;
            let after = own_production(&hypothetical, me.id, roll)?;
            Ok(f64::from(after) - f64::from(before))
        };

        let mut benefit = 0.0;
        for &roll in card.rolls() {
            let gained = gain(roll)?;
            benefit += gained * one_die_probability(roll) * mix.own_one;
            benefit += gained * two_dice_probability(roll) * mix.own_two;
            if card.is_on_anyones_turn() {
                benefit += gained * one_die_probability(roll) * mix.others_one;
                benefit += gained * two_dice_probability(roll) * mix.others_two;
            }
        }

        // Supply cards also raise an owned compound card's payout
        if let Some(compound) = Card::compound_for(card.category()) {
            if let Some(focus) = focus_trait(compound) {
                if me.category_count(card.category()) < self.tuning().max_beneficial_focus_cards {
                    decision.tag(focus, self.tuning().focus_supply_tag);
                }
            }
            if me.owns(compound) {
                for &roll in compound.rolls() {
                    benefit += gain(roll)? * two_dice_probability(roll) * mix.own_two;
                }
            }
        }

        if let Some(focus) = focus_trait(card) {
            decision.tag(focus, self.tuning().focus_compound_tag);
        }
        decision.average_benefit = benefit;
        Ok(())
    }

    /// Value a landmark for the current player
    pub fn evaluate_landmark(
        &self,
        game: &GameState,
        table: &OutcomeTable,
        landmark: Landmark,
    ) -> Result<BuyingDecision> {
        let me = game.current_player()?;
        let mut decision = BuyingDecision::landmark(landmark);
        match landmark {
            Landmark::TrainStation => {
                let inputs = Self::roll_single_inputs(table, me.id);
                if !self.strategy.roll_single(&inputs) {
                    decision.average_benefit = inputs.average_two_dice - inputs.average_one_die;
                    decision.tag(
                        StrategyTrait::AttackFocused,
                        inputs.others_average_one_die - inputs.others_average_two_dice,
                    );
                    decision.tag(
                        StrategyTrait::Optimist,
                        f64::from(inputs.best_two_dice) * self.tuning().best_roll_optimist_factor,
                    );
                }
            }
            Landmark::ShoppingMall => {
                let mut total = 0.0;
                let mut attack = 0.0;
                for (card, count) in me.stock() {
                    if !matches!(card.category(), CardCategory::Store | CardCategory::Cup) {
                        continue;
                    }
                    let per_copy: f64 = card
                        .rolls()
                        .iter()
                        .map(|&roll| {
                            if me.has_train_station() {
                                two_dice_probability(roll)
                            } else {
                                one_die_probability(roll)
                            }
                        })
                        .sum();
                    let gained = per_copy * f64::from(count);
                    if card.is_attack() {
                        attack += gained;
                    }
                    total += gained;
                }
                decision.average_benefit = total;
                decision.tag(StrategyTrait::AttackFocused, attack);
            }
            Landmark::AmusementPark => {
                if me.has_train_station() {
                    decision.average_benefit = table.average(me.id, DiceMode::Two) * DOUBLES_PROBABILITY;
                }
            }
            Landmark::RadioTower => {
                let best = table.best_case(me.id, DiceMode::Two);
                let probability = table.best_case_probability(me.id, DiceMode::Two);
                decision.average_benefit = f64::from(best) * probability * 2.0;
                let tag = self.tuning().focus_radio_tag;
                decision.tag(StrategyTrait::CheeseFocused, tag);
                decision.tag(StrategyTrait::FruitAndVegFocused, tag);
                decision.tag(StrategyTrait::FactoryFocused, tag);
            }
        }
        Ok(decision)
    }

    fn require_turn(&self, view: &GameStateView) -> Result<()> {
        if view.is_my_turn() {
            Ok(())
        } else {
            Err(MachiError::InvalidAction(format!(
                "{} asked to decide outside its turn",
                self.player_id
            )))
        }
    }
}

impl PlayerController for HeuristicController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn controller_type(&self) -> ControllerType {
        ControllerType::Heuristic
    }

    fn choose_dice_count(&mut self, view: &GameStateView) -> Result<DiceMode> {
        self.require_turn(view)?;
        if self.roll_single_die(view.state())? {
            Ok(DiceMode::One)
        } else {
            Ok(DiceMode::Two)
        }
    }

    fn wants_reroll(&mut self, view: &GameStateView) -> Result<bool> {
        self.require_turn(view)?;
        self.should_reroll(view.state())
    }

    fn choose_steal_victim(&mut self, view: &GameStateView, candidates: &[PlayerId]) -> Result<PlayerId> {
        self.require_turn(view)?;
        let victim = self.choose_victim(view.state())?;
        if candidates.contains(&victim) {
            Ok(victim)
        } else {
            candidates
                .first()
                .copied()
                .ok_or_else(|| MachiError::InvalidAction("no player to steal from".to_string()))
        }
    }

    fn choose_purchase(&mut self, view: &GameStateView, options: &[Purchase]) -> Result<Purchase> {
        self.require_turn(view)?;
        let decision = self.make_buying_decision(view.state())?;
        if options.contains(&decision.purchase) {
            Ok(decision.purchase)
        } else {
            Ok(Purchase::EndTurn)
        }
    }
}
