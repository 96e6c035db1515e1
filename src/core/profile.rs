//! Strategy profiles for automated players
//!
//! A profile is flat data: each named trait carries a small degree (0-3).
//! The decision engine reads degrees, it never dispatches on personality.

use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest degree a trait can take
pub const MAX_DEGREE: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StrategyTrait {
    /// Prioritizes saving up for landmarks over cheaper cards
    Saver,
    /// Holds out for a great roll when a reroll is available
    Optimist,
    /// Prioritizes taking coins from other players
    AttackFocused,
    /// Long-term goal: Fruit and Vegetable Market windfall
    FruitAndVegFocused,
    /// Long-term goal: Cheese Factory windfall
    CheeseFocused,
    /// Long-term goal: Furniture Factory windfall
    FactoryFocused,
}

impl StrategyTrait {
    pub const ALL: [StrategyTrait; 6] = [
        StrategyTrait::Saver,
        StrategyTrait::Optimist,
        StrategyTrait::AttackFocused,
        StrategyTrait::FruitAndVegFocused,
        StrategyTrait::CheeseFocused,
        StrategyTrait::FactoryFocused,
    ];
}

impl fmt::Display for StrategyTrait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyTrait::Saver => "saver",
            StrategyTrait::Optimist => "optimist",
            StrategyTrait::AttackFocused => "attack",
            StrategyTrait::FruitAndVegFocused => "fruit-and-veg",
            StrategyTrait::CheeseFocused => "cheese",
            StrategyTrait::FactoryFocused => "factory",
        };
        write!(f, "{name}")
    }
}

/// Per-player mapping of trait to degree; missing traits read as 0
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyProfile {
    degrees: FxHashMap<StrategyTrait, u8>,
}

impl StrategyProfile {
    pub fn new() -> Self {
        StrategyProfile::default()
    }

    /// Builder-style setter, clamping to [`MAX_DEGREE`]
    pub fn with(mut self, strategy_trait: StrategyTrait, degree: u8) -> Self {
        self.set(strategy_trait, degree);
        self
    }

    pub fn set(&mut self, strategy_trait: StrategyTrait, degree: u8) {
        self.degrees.insert(strategy_trait, degree.min(MAX_DEGREE));
    }

    pub fn degree(&self, strategy_trait: StrategyTrait) -> u8 {
        self.degrees.get(&strategy_trait).copied().unwrap_or(0)
    }

    /// Random but sensible profile: saver/optimist/attack in 0..=3 and at most
    /// one long-term focus trait switched on
    pub fn reasonable<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut profile = StrategyProfile::new()
            .with(StrategyTrait::Saver, rng.gen_range(0..=MAX_DEGREE))
            .with(StrategyTrait::Optimist, rng.gen_range(0..=MAX_DEGREE))
            .with(StrategyTrait::AttackFocused, rng.gen_range(0..=MAX_DEGREE));
        match rng.gen_range(0..4) {
            1 => profile.set(StrategyTrait::CheeseFocused, 1),
            2 => profile.set(StrategyTrait::FactoryFocused, 1),
            3 => profile.set(StrategyTrait::FruitAndVegFocused, 1),
            _ => {}
        }
        profile
    }
}

impl fmt::Display for StrategyProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = StrategyTrait::ALL
            .iter()
            .filter(|t| self.degree(**t) > 0)
            .map(|t| format!("{t}={}", self.degree(*t)))
            .collect();
        if parts.is_empty() {
            write!(f, "neutral")
        } else {
            write!(f, "{}", parts.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_missing_trait_is_zero() {
        let profile = StrategyProfile::new().with(StrategyTrait::Saver, 2);
        assert_eq!(profile.degree(StrategyTrait::Saver), 2);
        assert_eq!(profile.degree(StrategyTrait::Optimist), 0);
    }

    #[test]
    fn test_degree_is_clamped() {
        let profile = StrategyProfile::new().with(StrategyTrait::AttackFocused, 9);
        assert_eq!(profile.degree(StrategyTrait::AttackFocused), MAX_DEGREE);
    }

    #[test]
    fn test_reasonable_profile_has_at_most_one_focus() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        for _ in 0..50 {
            let profile = StrategyProfile::reasonable(&mut rng);
            let focus = [
                StrategyTrait::CheeseFocused,
                StrategyTrait::FactoryFocused,
                StrategyTrait::FruitAndVegFocused,
            ]
            .iter()
            .filter(|t| profile.degree(**t) > 0)
            .count();
            assert!(focus <= 1);
            assert!(profile.degree(StrategyTrait::Saver) <= MAX_DEGREE);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(StrategyProfile::new().to_string(), "neutral");
        let profile = StrategyProfile::new()
            .with(StrategyTrait::Saver, 1)
            .with(StrategyTrait::CheeseFocused, 1);
        assert_eq!(profile.to_string(), "saver=1,cheese=1");
    }
}
