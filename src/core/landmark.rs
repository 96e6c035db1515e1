//! Landmarks - the four unique buildings a player needs to win

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Landmark {
    /// Allows rolling two dice
    TrainStation,
    /// +1 per store and cup payout
    ShoppingMall,
    /// Extra turn on doubles
    AmusementPark,
    /// One reroll per turn
    RadioTower,
}

impl Landmark {
    pub const ALL: [Landmark; 4] = [
        Landmark::TrainStation,
        Landmark::ShoppingMall,
        Landmark::AmusementPark,
        Landmark::RadioTower,
    ];

    /// Combined cost of every landmark
    pub const TOTAL_COST: u32 = 4 + 10 + 16 + 22;

    pub fn cost(&self) -> u32 {
        match self {
            Landmark::TrainStation => 4,
            Landmark::ShoppingMall => 10,
            Landmark::AmusementPark => 16,
            Landmark::RadioTower => 22,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Landmark::TrainStation => "Train Station",
            Landmark::ShoppingMall => "Shopping Mall",
            Landmark::AmusementPark => "Amusement Park",
            Landmark::RadioTower => "Radio Tower",
        }
    }

    /// Fraction of the total landmark budget this landmark represents
    pub fn progress(&self) -> f64 {
        f64::from(self.cost()) / f64::from(Self::TOTAL_COST)
    }

    pub fn from_name(name: &str) -> Option<Landmark> {
        let wanted: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Landmark::ALL.into_iter().find(|landmark| {
            let candidate: String = landmark
                .name()
                .chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .map(|c| c.to_ascii_lowercase())
                .collect();
            candidate == wanted
        })
    }
}

impl fmt::Display for Landmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
