//! Purchase candidates
//!
//! A [`BuyingDecision`] lives for one evaluation cycle: it is built for every
//! eligible card or landmark, scored, ranked, and dropped once the choice is
//! made.

use crate::core::{Card, Landmark, StrategyTrait};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// What the buy step spends coins on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Purchase {
    Card(Card),
    Landmark(Landmark),
    EndTurn,
}

impl Purchase {
    pub fn cost(&self) -> u32 {
        match self {
            Purchase::Card(card) => card.cost(),
            Purchase::Landmark(landmark) => landmark.cost(),
            Purchase::EndTurn => 0,
        }
    }

    /// Share of the landmark budget this purchase completes
    pub fn progress(&self) -> f64 {
        match self {
            Purchase::Landmark(landmark) => landmark.progress(),
            _ => 0.0,
        }
    }

    pub fn is_end_turn(&self) -> bool {
        matches!(self, Purchase::EndTurn)
    }
}

impl fmt::Display for Purchase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Purchase::Card(card) => write!(f, "{card}"),
            Purchase::Landmark(landmark) => write!(f, "{landmark}"),
            Purchase::EndTurn => write!(f, "end turn"),
        }
    }
}

/// A scored purchase candidate
#[derive(Debug, Clone, PartialEq)]
pub struct BuyingDecision {
    pub purchase: Purchase,
    /// Expected coins per round the purchase adds
    pub average_benefit: f64,
    /// Raw tag magnitudes, weighted later by the player's trait degrees
    pub strategic_value: FxHashMap<StrategyTrait, f64>,
    /// Filled in by the scorer
    pub composite_score: f64,
}

impl BuyingDecision {
    pub fn new(purchase: Purchase) -> Self {
        BuyingDecision {
            purchase,
            average_benefit: 0.0,
            strategic_value: FxHashMap::default(),
            composite_score: 0.0,
        }
    }

    pub fn card(card: Card) -> Self {
        BuyingDecision::new(Purchase::Card(card))
    }

    pub fn landmark(landmark: Landmark) -> Self {
        BuyingDecision::new(Purchase::Landmark(landmark))
    }

    pub fn end_turn() -> Self {
        BuyingDecision::new(Purchase::EndTurn)
    }

    pub fn with_benefit(mut self, average_benefit: f64) -> Self {
        self.average_benefit = average_benefit;
        self
    }

    /// Set a tag; a later call for the same trait overwrites it
    pub fn tag(&mut self, strategy_trait: StrategyTrait, magnitude: f64) {
        self.strategic_value.insert(strategy_trait, magnitude);
    }

    pub fn with_tag(mut self, strategy_trait: StrategyTrait, magnitude: f64) -> Self {
        self.tag(strategy_trait, magnitude);
        self
    }

    pub fn tag_value(&self, strategy_trait: StrategyTrait) -> f64 {
        self.strategic_value
            .get(&strategy_trait)
            .copied()
            .unwrap_or(0.0)
    }

    pub fn cost(&self) -> u32 {
        self.purchase.cost()
    }

    pub fn progress(&self) -> f64 {
        self.purchase.progress()
    }

    pub fn is_end_turn(&self) -> bool {
        self.purchase.is_end_turn()
    }
}

/// Ranking order: higher composite score first, cheaper first on ties
pub fn compare_decisions(a: &BuyingDecision, b: &BuyingDecision) -> Ordering {
    b.composite_score
        .total_cmp(&a.composite_score)
        .then_with(|| a.cost().cmp(&b.cost()))
}
