//! Player representation

use crate::core::{Card, CardCategory, Landmark, PlayerId, PlayerName, StrategyProfile};
use crate::{MachiError, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Coins every player starts with
pub const STARTING_COINS: u32 = 3;

/// Share of unspent coins counted towards landmark progress
const COINS_TOWARDS_PROGRESS_FACTOR: f64 = 0.5;

/// Represents a player in the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Seat in turn order
    pub id: PlayerId,

    /// Player name
    pub name: PlayerName,

    /// Coin balance; only changed through the checked mutators
    coins: u32,

    /// Owned landmarks, at most one of each
    landmarks: SmallVec<[Landmark; 4]>,

    /// Owned establishments by count
    stock: FxHashMap<Card, u32>,

    /// Strategy profile when this seat is played automatically
    pub profile: Option<StrategyProfile>,
}

impl Player {
    /// A fresh player with starting coins, one Wheat Field and one Bakery
    pub fn new(id: PlayerId, name: impl Into<PlayerName>) -> Self {
        let mut stock = FxHashMap::default();
        stock.insert(Card::WheatField, 1);
        stock.insert(Card::Bakery, 1);
        Player {
            id,
            name: name.into(),
            coins: STARTING_COINS,
            landmarks: SmallVec::new(),
            stock,
            profile: None,
        }
    }

    /// A player with starting coins and no establishments
    pub fn empty(id: PlayerId, name: impl Into<PlayerName>) -> Self {
        Player {
            id,
            name: name.into(),
            coins: STARTING_COINS,
            landmarks: SmallVec::new(),
            stock: FxHashMap::default(),
            profile: None,
        }
    }

    /// Builder for scenario setup: overwrite the owned count of each listed card
    pub fn with_cards(mut self, cards: &[(Card, u32)]) -> Self {
        for (card, count) in cards {
            self.stock.insert(*card, *count);
        }
        self
    }

    /// Builder for scenario setup: grant landmarks without paying
    pub fn with_landmarks(mut self, landmarks: &[Landmark]) -> Self {
        for landmark in landmarks {
            if !self.landmarks.contains(landmark) {
                self.landmarks.push(*landmark);
            }
        }
        self.landmarks.sort();
        self
    }

    /// Builder for scenario setup: replace the coin balance
    pub fn with_coins(mut self, coins: u32) -> Self {
        self.coins = coins;
        self
    }

    pub fn with_profile(mut self, profile: StrategyProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn increase_coins(&mut self, amount: u32) {
        self.coins += amount;
    }

    /// Remove coins, failing instead of going negative
    pub fn decrease_coins(&mut self, amount: u32) -> Result<()> {
        if self.coins < amount {
            return Err(MachiError::NegativeBalance {
                player: self.id,
                amount,
                balance: self.coins,
            });
        }
        self.coins -= amount;
        Ok(())
    }

    /// Apply a signed delta through the checked mutators
    pub fn apply_delta(&mut self, delta: i32) -> Result<()> {
        if delta >= 0 {
            self.increase_coins(delta.unsigned_abs());
            Ok(())
        } else {
            self.decrease_coins(delta.unsigned_abs())
        }
    }

    pub fn count(&self, card: Card) -> u32 {
        self.stock.get(&card).copied().unwrap_or(0)
    }

    pub fn owns(&self, card: Card) -> bool {
        self.count(card) > 0
    }

    /// Owned establishments with non-zero counts
    pub fn stock(&self) -> impl Iterator<Item = (Card, u32)> + '_ {
        self.stock
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(card, count)| (*card, *count))
    }

    /// Total number of owned cards carrying `category`
    pub fn category_count(&self, category: CardCategory) -> u32 {
        self.stock()
            .filter(|(card, _)| card.category() == category)
            .map(|(_, count)| count)
            .sum()
    }

    /// Add one copy of a card without paying; purple cards are singletons
    pub fn add_card(&mut self, card: Card) -> Result<()> {
        if card.is_purple() && self.owns(card) {
            return Err(MachiError::DuplicatePurple {
                player: self.id,
                card,
            });
        }
        *self.stock.entry(card).or_insert(0) += 1;
        Ok(())
    }

    pub fn purchase_card(&mut self, card: Card) -> Result<()> {
        if card.is_purple() && self.owns(card) {
            return Err(MachiError::DuplicatePurple {
                player: self.id,
                card,
            });
        }
        self.decrease_coins(card.cost())?;
        self.add_card(card)
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn has_landmark(&self, landmark: Landmark) -> bool {
        self.landmarks.contains(&landmark)
    }

    /// Add a landmark without paying; each landmark can be owned once
    pub fn add_landmark(&mut self, landmark: Landmark) -> Result<()> {
        if self.has_landmark(landmark) {
            return Err(MachiError::DuplicateLandmark {
                player: self.id,
                landmark,
            });
        }
        self.landmarks.push(landmark);
        self.landmarks.sort();
        Ok(())
    }

    pub fn purchase_landmark(&mut self, landmark: Landmark) -> Result<()> {
        if self.has_landmark(landmark) {
            return Err(MachiError::DuplicateLandmark {
                player: self.id,
                landmark,
            });
        }
        self.decrease_coins(landmark.cost())?;
        self.add_landmark(landmark)
    }

    pub fn has_train_station(&self) -> bool {
        self.has_landmark(Landmark::TrainStation)
    }

    pub fn has_shopping_mall(&self) -> bool {
        self.has_landmark(Landmark::ShoppingMall)
    }

    pub fn has_amusement_park(&self) -> bool {
        self.has_landmark(Landmark::AmusementPark)
    }

    pub fn has_radio_tower(&self) -> bool {
        self.has_landmark(Landmark::RadioTower)
    }

    pub fn has_won(&self) -> bool {
        self.landmarks.len() == Landmark::ALL.len()
    }

    /// Progress towards owning every landmark, in [0, 1]
    ///
    /// Built landmarks count fully, unspent coins count at half value up to
    /// the remaining landmark budget.
    pub fn progress(&self) -> f64 {
        let built: u32 = self.landmarks.iter().map(Landmark::cost).sum();
        let coins_towards = self.coins.min(Landmark::TOTAL_COST - built);
        (f64::from(built) + f64::from(coins_towards) * COINS_TOWARDS_PROGRESS_FACTOR)
            / f64::from(Landmark::TOTAL_COST)
    }
}
