//! Turn state machine and automated game loop
//!
//! [`TurnEngine`] applies one requested action to a live [`GameState`] after
//! checking it matches the current step, and reports what happened as
//! [`TurnEvent`]s. [`GameLoop`] asks each seat's controller for its next
//! decision, feeds it to the engine, and logs the events.

use crate::core::{Card, Landmark, PlayerId};
use crate::game::buying::Purchase;
use crate::game::controller::{GameStateView, PlayerController};
use crate::game::logger::GameLogger;
use crate::game::outcomes::DiceMode;
use crate::game::resolver::{resolve_roll, tv_station_steal_amount, RollEffects, TvStationMode};
use crate::game::{Dice, GameState, Step};
use crate::{MachiError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use smallvec::SmallVec;
use std::fmt;

/// Verbosity level for game output
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Default,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum VerbosityLevel {
    /// No output during the game
    Silent = 0,
    /// Only the game outcome
    Minimal = 1,
    /// Turns, rolls, steals and purchases
    #[default]
    Normal = 2,
    /// Also per-player coin changes
    Verbose = 3,
}

/// Something the engine did in response to an action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnEvent {
    TurnStarted {
        player: PlayerId,
    },
    Rolled {
        player: PlayerId,
        dice: Dice,
        /// The Radio Tower lets the player reconsider before it counts
        awaiting_confirmation: bool,
    },
    Resolved {
        total: u8,
        effects: RollEffects,
        steal_pending: bool,
    },
    Stole {
        thief: PlayerId,
        victim: PlayerId,
        amount: u32,
    },
    Bought {
        player: PlayerId,
        purchase: Purchase,
    },
    /// Doubles with an Amusement Park
    ExtraTurn {
        player: PlayerId,
    },
    Won {
        player: PlayerId,
    },
}

impl fmt::Display for TurnEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnEvent::TurnStarted { player } => write!(f, "--- {player}'s turn ---"),
            TurnEvent::Rolled {
                player,
                dice,
                awaiting_confirmation,
            } => {
                if dice.rolled_two() {
                    write!(f, "{player} rolled {} + {} = {}", dice.die1(), dice.die2(), dice.total())?;
                } else {
                    write!(f, "{player} rolled {}", dice.total())?;
                }
                if *awaiting_confirmation {
                    write!(f, " (may reroll)")?;
                }
                Ok(())
            }
            TurnEvent::Resolved { total, effects, .. } => {
                write!(f, "Roll {total}:")?;
                if effects.is_zero() {
                    return write!(f, " no coins change hands");
                }
                for (player, delta) in effects.iter().filter(|(_, d)| *d != 0) {
                    write!(f, " {player} {delta:+}")?;
                }
                Ok(())
            }
            TurnEvent::Stole { thief, victim, amount } => {
                write!(f, "{thief} takes {amount} coins from {victim} with the TV Station")
            }
            TurnEvent::Bought { player, purchase } => match purchase {
                Purchase::EndTurn => write!(f, "{player} buys nothing"),
                _ => write!(f, "{player} buys {purchase}"),
            },
            TurnEvent::ExtraTurn { player } => write!(f, "{player} rolled doubles and goes again"),
            TurnEvent::Won { player } => write!(f, "{player} has built every landmark and wins"),
        }
    }
}

pub type TurnEvents = SmallVec<[TurnEvent; 4]>;

/// Rule-checked actions against a live game
pub struct TurnEngine<'a> {
    game: &'a mut GameState,
}

impl<'a> TurnEngine<'a> {
    pub fn new(game: &'a mut GameState) -> Self {
        TurnEngine { game }
    }

    fn expect_step(&self, allowed: &[Step], action: &'static str) -> Result<()> {
        let step = self.game.step();
        if allowed.contains(&step) {
            Ok(())
        } else {
            Err(MachiError::IllegalStepTransition { step, action })
        }
    }

    /// SETUP -> ROLL, first seat to play
    pub fn begin(&mut self) -> Result<TurnEvents> {
        self.expect_step(&[Step::Setup], "begin the game")?;
        let first = PlayerId::new(0);
        self.game.set_current(first)?;
        self.game.reset_dice();
        self.game.set_rolled_once(false);
        self.game.set_step(Step::Roll);
        Ok(smallvec::smallvec![TurnEvent::TurnStarted { player: first }])
    }

    /// Roll with `rng`; see [`TurnEngine::roll_dice`]
    pub fn roll<R: Rng + ?Sized>(&mut self, mode: DiceMode, rng: &mut R) -> Result<TurnEvents> {
        let die1 = rng.gen_range(1..=6);
        let die2 = match mode {
            DiceMode::One => 0,
            DiceMode::Two => rng.gen_range(1..=6),
        };
        self.roll_dice(die1, die2)
    }

    /// Record a roll made outside the engine
    ///
    /// `die2` is 0 for a one-die roll. With a Radio Tower the first roll of a
    /// turn waits in CONFIRM_ROLL; any other roll is committed at once.
    pub fn roll_dice(&mut self, die1: u8, die2: u8) -> Result<TurnEvents> {
        self.expect_step(&[Step::Roll, Step::ConfirmRoll], "roll")?;
        if die1 == 0 {
            return Err(MachiError::InvalidAction("the first die must be rolled".to_string()));
        }
        let dice = Dice::new(die1, die2)?;
        let player = self.game.current_id();
        let current = self.game.current_player()?;
        if dice.rolled_two() && !current.has_train_station() {
            return Err(MachiError::InvalidAction(format!(
                "{player} needs a Train Station to roll two dice"
            )));
        }
        let may_reroll = current.has_radio_tower() && !self.game.rolled_once();

        self.game.set_dice(die1, die2)?;
        let mut events: TurnEvents = smallvec::smallvec![TurnEvent::Rolled {
            player,
            dice,
            awaiting_confirmation: may_reroll,
        }];
        if may_reroll {
            self.game.set_rolled_once(true);
            self.game.set_step(Step::ConfirmRoll);
        } else {
            events.push(self.commit_roll()?);
        }
        Ok(events)
    }

    /// CONFIRM_ROLL: keep the dice showing
    pub fn confirm_roll(&mut self) -> Result<TurnEvents> {
        self.expect_step(&[Step::ConfirmRoll], "confirm the roll")?;
        Ok(smallvec::smallvec![self.commit_roll()?])
    }

    /// Apply passes 1-4 to the live state; the TV Station waits for a victim
    fn commit_roll(&mut self) -> Result<TurnEvent> {
        let total = self.game.dice().total();
        let resolution = resolve_roll(self.game, total, TvStationMode::Pending)?;
        for (player, delta) in resolution.effects.iter() {
            self.game.player_mut(player)?.apply_delta(delta)?;
        }
        self.game.set_step(if resolution.steal_pending {
            Step::Steal
        } else {
            Step::Buy
        });
        Ok(TurnEvent::Resolved {
            total,
            effects: resolution.effects,
            steal_pending: resolution.steal_pending,
        })
    }

    /// STEAL: take up to 5 coins from `victim`
    pub fn steal(&mut self, victim: PlayerId) -> Result<TurnEvents> {
        self.expect_step(&[Step::Steal], "steal")?;
        let thief = self.game.current_id();
        if !self.game.current_player()?.owns(Card::TvStation) {
            return Err(MachiError::InvalidAction(format!("{thief} has no TV Station")));
        }
        if victim == thief {
            return Err(MachiError::InvalidAction(format!("{thief} cannot steal from themselves")));
        }
        let amount = tv_station_steal_amount(self.game.player(victim)?.coins());
        self.game.player_mut(victim)?.decrease_coins(amount)?;
        self.game.current_player_mut()?.increase_coins(amount);
        self.game.set_step(Step::Buy);
        Ok(smallvec::smallvec![TurnEvent::Stole {
            thief,
            victim,
            amount
        }])
    }

    pub fn purchase_card(&mut self, card: Card) -> Result<TurnEvents> {
        self.expect_step(&[Step::Buy], "buy a card")?;
        let player = self.game.current_id();
        if self.game.market_stock(card) == 0 {
            return Err(MachiError::OutOfStock(card));
        }
        // Player::purchase_card checks coins and purple uniqueness before paying
        self.game.current_player_mut()?.purchase_card(card)?;
        self.game.take_from_market(card)?;
        self.finish_purchase(player, Purchase::Card(card))
    }

    pub fn purchase_landmark(&mut self, landmark: Landmark) -> Result<TurnEvents> {
        self.expect_step(&[Step::Buy], "build a landmark")?;
        let player = self.game.current_id();
        self.game.current_player_mut()?.purchase_landmark(landmark)?;
        self.finish_purchase(player, Purchase::Landmark(landmark))
    }

    /// BUY: end the turn without buying
    pub fn complete_turn(&mut self) -> Result<TurnEvents> {
        self.expect_step(&[Step::Buy], "end the turn")?;
        let player = self.game.current_id();
        self.finish_purchase(player, Purchase::EndTurn)
    }

    pub fn apply_purchase(&mut self, purchase: Purchase) -> Result<TurnEvents> {
        match purchase {
            Purchase::Card(card) => self.purchase_card(card),
            Purchase::Landmark(landmark) => self.purchase_landmark(landmark),
            Purchase::EndTurn => self.complete_turn(),
        }
    }

    fn finish_purchase(&mut self, player: PlayerId, purchase: Purchase) -> Result<TurnEvents> {
        let mut events: TurnEvents = smallvec::smallvec![TurnEvent::Bought { player, purchase }];
        events.push(self.end_turn()?);
        Ok(events)
    }

    fn end_turn(&mut self) -> Result<TurnEvent> {
        let current = self.game.current_player()?;
        let player = current.id;
        if current.has_won() {
            self.game.set_step(Step::Won);
            return Ok(TurnEvent::Won { player });
        }
        if current.has_amusement_park() && self.game.dice().is_doubles() {
            self.game.set_rolled_once(false);
            self.game.set_step(Step::Roll);
            return Ok(TurnEvent::ExtraTurn { player });
        }
        self.game.advance_current();
        self.game.reset_dice();
        self.game.set_rolled_once(false);
        self.game.set_step(Step::Roll);
        Ok(TurnEvent::TurnStarted {
            player: self.game.current_id(),
        })
    }
}

/// Result of running a game to completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    pub winner: Option<PlayerId>,
    /// Turns started, extra turns included
    pub turns_played: u32,
    pub end_reason: GameEndReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEndReason {
    /// A player built all four landmarks
    AllLandmarks(PlayerId),
    /// Game reached maximum turn limit
    TurnLimit,
    /// `run_turns` finished its budget first
    Manual,
}

/// Drives a game with one controller per seat
pub struct GameLoop<'a> {
    pub game: &'a mut GameState,
    logger: GameLogger,
    rng: ChaCha12Rng,
    max_turns: u32,
    turns_elapsed: u32,
    /// Increments each time a controller makes any decision
    choice_counter: u32,
}

impl<'a> GameLoop<'a> {
    pub fn new(game: &'a mut GameState) -> Self {
        GameLoop {
            game,
            logger: GameLogger::new(),
            rng: ChaCha12Rng::seed_from_u64(0),
            max_turns: 1000,
            turns_elapsed: 0,
            choice_counter: 0,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha12Rng::seed_from_u64(seed);
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_verbosity(mut self, verbosity: VerbosityLevel) -> Self {
        self.logger.set_verbosity(verbosity);
        self
    }

    pub fn with_logger(mut self, logger: GameLogger) -> Self {
        self.logger = logger;
        self
    }

    pub fn logger(&self) -> &GameLogger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut GameLogger {
        &mut self.logger
    }

    pub fn turns_elapsed(&self) -> u32 {
        self.turns_elapsed
    }

    pub fn choice_count(&self) -> u32 {
        self.choice_counter
    }

    /// Run until someone wins or the turn limit is reached
    pub fn run_game(&mut self, controllers: &mut [Box<dyn PlayerController>]) -> Result<GameResult> {
        self.setup_game(controllers)?;
        loop {
            if let Some(result) = self.finished() {
                self.notify_game_end(controllers, result.winner);
                return Ok(result);
            }
            self.step_once(controllers)?;
        }
    }

    /// Run at most `turns_to_run` more turns
    pub fn run_turns(
        &mut self,
        controllers: &mut [Box<dyn PlayerController>],
        turns_to_run: u32,
    ) -> Result<GameResult> {
        self.setup_game(controllers)?;
        let stop_at = self.turns_elapsed.saturating_add(turns_to_run);
        loop {
            if let Some(result) = self.finished() {
                return Ok(result);
            }
            if self.turns_elapsed >= stop_at {
                return Ok(GameResult {
                    winner: None,
                    turns_played: self.turns_elapsed,
                    end_reason: GameEndReason::Manual,
                });
            }
            self.step_once(controllers)?;
        }
    }

    fn setup_game(&mut self, controllers: &[Box<dyn PlayerController>]) -> Result<()> {
        if controllers.len() != self.game.player_count() {
            return Err(MachiError::InvalidAction(format!(
                "{} controllers for {} players",
                controllers.len(),
                self.game.player_count()
            )));
        }
        for (seat, controller) in controllers.iter().enumerate() {
            if controller.player_id() != PlayerId::new(seat) {
                return Err(MachiError::InvalidAction(format!(
                    "controller for {} sits in seat {}",
                    controller.player_id(),
                    seat + 1
                )));
            }
        }
        if self.game.step() == Step::Setup {
            let events = TurnEngine::new(self.game).begin()?;
            self.record(&events);
        }
        Ok(())
    }

    fn finished(&self) -> Option<GameResult> {
        if self.game.step() == Step::Won {
            let winner = self.game.current_id();
            return Some(GameResult {
                winner: Some(winner),
                turns_played: self.turns_elapsed,
                end_reason: GameEndReason::AllLandmarks(winner),
            });
        }
        if self.turns_elapsed >= self.max_turns {
            return Some(GameResult {
                winner: None,
                turns_played: self.turns_elapsed,
                end_reason: GameEndReason::TurnLimit,
            });
        }
        None
    }

    /// Ask the current seat for one decision and apply it
    pub fn step_once(&mut self, controllers: &mut [Box<dyn PlayerController>]) -> Result<()> {
        let seat = self.game.current_id();
        let controller = controllers
            .get_mut(seat.index())
            .ok_or(MachiError::PlayerNotFound(seat))?;
        let kind = controller.controller_type().to_string();
        self.choice_counter += 1;

        let events = match self.game.step() {
            Step::Roll => {
                let mode = controller.choose_dice_count(&GameStateView::new(self.game, seat))?;
                self.logger
                    .controller_choice(&kind, &format!("{seat} chose to roll {}", dice_label(mode)));
                TurnEngine::new(self.game).roll(mode, &mut self.rng)?
            }
            Step::ConfirmRoll => {
                let reroll = controller.wants_reroll(&GameStateView::new(self.game, seat))?;
                if reroll {
                    let mode = if self.game.dice().rolled_two() {
                        DiceMode::Two
                    } else {
                        DiceMode::One
                    };
                    self.logger
                        .controller_choice(&kind, &format!("{seat} chose to reroll"));
                    TurnEngine::new(self.game).roll(mode, &mut self.rng)?
                } else {
                    self.logger
                        .controller_choice(&kind, &format!("{seat} chose to keep the roll"));
                    TurnEngine::new(self.game).confirm_roll()?
                }
            }
            Step::Steal => {
                let candidates: SmallVec<[PlayerId; 3]> = self.game.others_clockwise(seat).collect();
                let victim =
                    controller.choose_steal_victim(&GameStateView::new(self.game, seat), &candidates)?;
                self.logger
                    .controller_choice(&kind, &format!("{seat} chose to rob {victim}"));
                TurnEngine::new(self.game).steal(victim)?
            }
            Step::Buy => {
                let options = self.game.purchase_options(seat)?;
                let purchase = controller.choose_purchase(&GameStateView::new(self.game, seat), &options)?;
                self.logger
                    .controller_choice(&kind, &format!("{seat} chose {purchase}"));
                TurnEngine::new(self.game).apply_purchase(purchase)?
            }
            step @ (Step::Setup | Step::Won) => {
                return Err(MachiError::IllegalStepTransition {
                    step,
                    action: "ask for a decision",
                });
            }
        };
        self.record(&events);
        Ok(())
    }

    fn record(&mut self, events: &[TurnEvent]) {
        for event in events {
            let level = match event {
                TurnEvent::TurnStarted { .. } | TurnEvent::ExtraTurn { .. } => {
                    self.turns_elapsed += 1;
                    VerbosityLevel::Normal
                }
                TurnEvent::Resolved { .. } => VerbosityLevel::Verbose,
                TurnEvent::Won { .. } => VerbosityLevel::Minimal,
                _ => VerbosityLevel::Normal,
            };
            self.logger.log_fmt(level, format_args!("{event}"));
        }
    }

    fn notify_game_end(&mut self, controllers: &mut [Box<dyn PlayerController>], winner: Option<PlayerId>) {
        for controller in controllers.iter_mut() {
            let id = controller.player_id();
            controller.on_game_end(&GameStateView::new(self.game, id), winner == Some(id));
        }
        if winner.is_none() {
            self.logger.log_fmt(
                VerbosityLevel::Minimal,
                format_args!("No winner after {} turns", self.turns_elapsed),
            );
        }
    }
}

fn dice_label(mode: DiceMode) -> &'static str {
    match mode {
        DiceMode::One => "one die",
        DiceMode::Two => "two dice",
    }
}
