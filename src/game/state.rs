//! Main game state structure

use crate::core::{Card, Landmark, Player, PlayerId, PlayerName};
use crate::game::buying::Purchase;
use crate::game::Step;
use crate::{MachiError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Copies of each non-purple card in the market at game start
pub const STARTING_STOCK: u32 = 6;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// The two dice; 0 means the die was not rolled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dice {
    die1: u8,
    die2: u8,
}

impl Dice {
    pub fn new(die1: u8, die2: u8) -> Result<Self> {
        for die in [die1, die2] {
            if die > 6 {
                return Err(MachiError::InvalidDie(die));
            }
        }
        Ok(Dice { die1, die2 })
    }

    pub fn unrolled() -> Self {
        Dice::default()
    }

    pub fn die1(&self) -> u8 {
        self.die1
    }

    pub fn die2(&self) -> u8 {
        self.die2
    }

    pub fn total(&self) -> u8 {
        self.die1 + self.die2
    }

    pub fn is_rolled(&self) -> bool {
        self.die1 != 0
    }

    pub fn rolled_two(&self) -> bool {
        self.die2 != 0
    }

    pub fn is_doubles(&self) -> bool {
        self.die1 != 0 && self.die1 == self.die2
    }
}

/// Complete state of one game
///
/// Cheap to clone; what-if evaluation always works on a clone and never on
/// the live state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Players in turn order; a player's seat is its index
    pub players: Vec<Player>,

    /// Whose turn it is
    current: PlayerId,

    dice: Dice,

    step: Step,

    /// The Radio Tower reroll has been used this turn
    rolled_once: bool,

    /// Remaining purchasable copies per card
    market: FxHashMap<Card, u32>,
}

impl GameState {
    /// Create a game with default-named players
    pub fn new(player_count: usize) -> Result<Self> {
        let players = (0..player_count)
            .map(|seat| Player::new(PlayerId::new(seat), format!("Player {}", seat + 1)))
            .collect();
        GameState::with_players(players)
    }

    /// Create a game with the given names, one seat per name
    pub fn with_names(names: &[&str]) -> Result<Self> {
        let players = names
            .iter()
            .enumerate()
            .map(|(seat, name)| Player::new(PlayerId::new(seat), PlayerName::new(*name)))
            .collect();
        GameState::with_players(players)
    }

    /// Create a game from pre-built players
    ///
    /// Seats are reassigned from the vector order so ids always match indices.
    pub fn with_players(mut players: Vec<Player>) -> Result<Self> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players.len()) {
            return Err(MachiError::InvalidPlayerCount(players.len()));
        }
        for (seat, player) in players.iter_mut().enumerate() {
            player.id = PlayerId::new(seat);
        }
        let player_count = players.len() as u32;
        let market = Card::ALL
            .into_iter()
            .map(|card| {
                let copies = if card.is_purple() {
                    player_count
                } else {
                    STARTING_STOCK
                };
                (card, copies)
            })
            .collect();
        Ok(GameState {
            players,
            current: PlayerId::new(0),
            dice: Dice::unrolled(),
            step: Step::Setup,
            rolled_once: false,
            market,
        })
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player> {
        self.players
            .get(id.index())
            .ok_or(MachiError::PlayerNotFound(id))
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players
            .get_mut(id.index())
            .ok_or(MachiError::PlayerNotFound(id))
    }

    pub fn current_id(&self) -> PlayerId {
        self.current
    }

    pub fn current_player(&self) -> Result<&Player> {
        self.player(self.current)
    }

    pub fn current_player_mut(&mut self) -> Result<&mut Player> {
        self.player_mut(self.current)
    }

    pub fn set_current(&mut self, id: PlayerId) -> Result<()> {
        self.player(id)?;
        self.current = id;
        Ok(())
    }

    /// Pass the turn to the next seat
    pub fn advance_current(&mut self) {
        self.current = self.current.next(self.players.len());
    }

    /// Every other seat, clockwise starting left of `id`
    pub fn others_clockwise(&self, id: PlayerId) -> impl Iterator<Item = PlayerId> {
        let count = self.players.len();
        (1..count).map(move |offset| PlayerId::new((id.index() + offset) % count))
    }

    /// Every other seat, counter-clockwise starting right of `id`
    pub fn others_counter_clockwise(&self, id: PlayerId) -> impl Iterator<Item = PlayerId> {
        let count = self.players.len();
        (1..count).map(move |offset| PlayerId::new((id.index() + count - offset) % count))
    }

    pub fn dice(&self) -> Dice {
        self.dice
    }

    pub fn set_dice(&mut self, die1: u8, die2: u8) -> Result<()> {
        self.dice = Dice::new(die1, die2)?;
        Ok(())
    }

    pub fn reset_dice(&mut self) {
        self.dice = Dice::unrolled();
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn set_step(&mut self, step: Step) {
        self.step = step;
    }

    pub fn rolled_once(&self) -> bool {
        self.rolled_once
    }

    pub fn set_rolled_once(&mut self, rolled_once: bool) {
        self.rolled_once = rolled_once;
    }

    pub fn market_stock(&self, card: Card) -> u32 {
        self.market.get(&card).copied().unwrap_or(0)
    }

    /// Copies of `card` already bought by any player
    pub fn sold_copies(&self, card: Card) -> u32 {
        let starting = if card.is_purple() {
            self.players.len() as u32
        } else {
            STARTING_STOCK
        };
        starting.saturating_sub(self.market_stock(card))
    }

    pub fn set_market_stock(&mut self, card: Card, copies: u32) {
        self.market.insert(card, copies);
    }

    /// Remove one copy from the market
    pub fn take_from_market(&mut self, card: Card) -> Result<()> {
        match self.market.get_mut(&card) {
            Some(copies) if *copies > 0 => {
                *copies -= 1;
                Ok(())
            }
            _ => Err(MachiError::OutOfStock(card)),
        }
    }

    /// Functional update: a copy of this state where `player` owns one more `card`
    pub fn with_card_added(&self, player: PlayerId, card: Card) -> Result<GameState> {
        let mut hypothetical = self.clone();
        hypothetical.player_mut(player)?.add_card(card)?;
        Ok(hypothetical)
    }

    /// Purchases `id` can make right now; ending the turn is always one of them
    pub fn purchase_options(&self, id: PlayerId) -> Result<Vec<Purchase>> {
        let player = self.player(id)?;
        let coins = player.coins();
        let mut options: Vec<Purchase> = Card::ALL
            .into_iter()
            .filter(|card| self.market_stock(*card) > 0)
            .filter(|card| !(card.is_purple() && player.owns(*card)))
            .filter(|card| card.cost() <= coins)
            .map(Purchase::Card)
            .collect();
        options.extend(
            Landmark::ALL
                .into_iter()
                .filter(|landmark| !player.has_landmark(*landmark) && landmark.cost() <= coins)
                .map(Purchase::Landmark),
        );
        options.push(Purchase::EndTurn);
        Ok(options)
    }

    /// Winner, if any player owns every landmark
    pub fn winner(&self) -> Option<PlayerId> {
        self.players.iter().find(|p| p.has_won()).map(|p| p.id)
    }
}
