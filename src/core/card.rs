//! Establishment cards and their static definitions
//!
//! The catalog is fixed: every card is a variant of [`Card`] and its rules
//! text is a `&'static CardDef`. Player stock and market stock only ever hold
//! counts keyed by `Card`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Icon printed on a card, used by compound payouts and landmark bonuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardCategory {
    Grain,
    Cow,
    Gear,
    Cup,
    Store,
    Purple,
    Other,
}

/// How a triggered card computes its payout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payout {
    /// Fixed amount per copy owned
    Basic,
    /// Amount per copy, multiplied by the number of owned cards in a linked category
    PerCategory(CardCategory),
}

/// Immutable card definition
#[derive(Debug)]
pub struct CardDef {
    pub name: &'static str,
    pub rolls: &'static [u8],
    pub category: CardCategory,
    pub on_owners_turn: bool,
    pub on_anyones_turn: bool,
    pub attack: bool,
    pub payout: Payout,
    pub amount: u32,
    pub cost: u32,
}

/// Every purchasable establishment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Card {
    WheatField,
    Ranch,
    Bakery,
    Cafe,
    ConvenienceStore,
    Forest,
    Stadium,
    TvStation,
    CheeseFactory,
    FurnitureFactory,
    Mine,
    FamilyRestaurant,
    AppleOrchard,
    FruitAndVegetableMarket,
}

/// Die total on which every purple card triggers
pub const PURPLE_ROLL: u8 = 6;

const WHEAT_FIELD: CardDef = CardDef {
    name: "Wheat Field",
    rolls: &[1],
    category: CardCategory::Grain,
    on_owners_turn: true,
    on_anyones_turn: true,
    attack: false,
    payout: Payout::Basic,
    amount: 1,
    cost: 1,
};

const RANCH: CardDef = CardDef {
    name: "Ranch",
    rolls: &[2],
    category: CardCategory::Cow,
    on_owners_turn: true,
    on_anyones_turn: true,
    attack: false,
    payout: Payout::Basic,
    amount: 1,
    cost: 1,
};

const BAKERY: CardDef = CardDef {
    name: "Bakery",
    rolls: &[2, 3],
    category: CardCategory::Store,
    on_owners_turn: true,
    on_anyones_turn: false,
    attack: false,
    payout: Payout::Basic,
    amount: 1,
    cost: 1,
};

const CAFE: CardDef = CardDef {
    name: "Cafe",
    rolls: &[3],
    category: CardCategory::Cup,
    on_owners_turn: false,
    on_anyones_turn: false,
    attack: true,
    payout: Payout::Basic,
    amount: 1,
    cost: 2,
};

const CONVENIENCE_STORE: CardDef = CardDef {
    name: "Convenience Store",
    rolls: &[4],
    category: CardCategory::Store,
    on_owners_turn: true,
    on_anyones_turn: false,
    attack: false,
    payout: Payout::Basic,
    amount: 3,
    cost: 2,
};

const FOREST: CardDef = CardDef {
    name: "Forest",
    rolls: &[5],
    category: CardCategory::Gear,
    on_owners_turn: true,
    on_anyones_turn: true,
    attack: false,
    payout: Payout::Basic,
    amount: 1,
    cost: 3,
};

const STADIUM: CardDef = CardDef {
    name: "Stadium",
    rolls: &[PURPLE_ROLL],
    category: CardCategory::Purple,
    on_owners_turn: true,
    on_anyones_turn: false,
    attack: false,
    payout: Payout::Basic,
    amount: 2,
    cost: 6,
};

const TV_STATION: CardDef = CardDef {
    name: "TV Station",
    rolls: &[PURPLE_ROLL],
    category: CardCategory::Purple,
    on_owners_turn: true,
    on_anyones_turn: false,
    attack: false,
    payout: Payout::Basic,
    amount: 5,
    cost: 7,
};

const CHEESE_FACTORY: CardDef = CardDef {
    name: "Cheese Factory",
    rolls: &[7],
    category: CardCategory::Other,
    on_owners_turn: true,
    on_anyones_turn: false,
    attack: false,
    payout: Payout::PerCategory(CardCategory::Cow),
    amount: 3,
    cost: 5,
};

const FURNITURE_FACTORY: CardDef = CardDef {
    name: "Furniture Factory",
    rolls: &[8],
    category: CardCategory::Other,
    on_owners_turn: true,
    on_anyones_turn: false,
    attack: false,
    payout: Payout::PerCategory(CardCategory::Gear),
    amount: 3,
    cost: 3,
};

const MINE: CardDef = CardDef {
    name: "Mine",
    rolls: &[9],
    category: CardCategory::Gear,
    on_owners_turn: true,
    on_anyones_turn: true,
    attack: false,
    payout: Payout::Basic,
    amount: 5,
    cost: 6,
};

const FAMILY_RESTAURANT: CardDef = CardDef {
    name: "Family Restaurant",
    rolls: &[9, 10],
    category: CardCategory::Cup,
    on_owners_turn: false,
    on_anyones_turn: false,
    attack: true,
    payout: Payout::Basic,
    amount: 2,
    cost: 3,
};

const APPLE_ORCHARD: CardDef = CardDef {
    name: "Apple Orchard",
    rolls: &[10],
    category: CardCategory::Grain,
    on_owners_turn: true,
    on_anyones_turn: true,
    attack: false,
    payout: Payout::Basic,
    amount: 3,
    cost: 3,
};

const FRUIT_AND_VEGETABLE_MARKET: CardDef = CardDef {
    name: "Fruit and Vegetable Market",
    rolls: &[11, 12],
    category: CardCategory::Other,
    on_owners_turn: true,
    on_anyones_turn: false,
    attack: false,
    payout: Payout::PerCategory(CardCategory::Grain),
    amount: 2,
    cost: 2,
};

impl Card {
    /// All cards in catalog order
    pub const ALL: [Card; 14] = [
        Card::WheatField,
        Card::Ranch,
        Card::Bakery,
        Card::Cafe,
        Card::ConvenienceStore,
        Card::Forest,
        Card::Stadium,
        Card::TvStation,
        Card::CheeseFactory,
        Card::FurnitureFactory,
        Card::Mine,
        Card::FamilyRestaurant,
        Card::AppleOrchard,
        Card::FruitAndVegetableMarket,
    ];

    pub fn def(&self) -> &'static CardDef {
        match self {
            Card::WheatField => &WHEAT_FIELD,
            Card::Ranch => &RANCH,
            Card::Bakery => &BAKERY,
            Card::Cafe => &CAFE,
            Card::ConvenienceStore => &CONVENIENCE_STORE,
            Card::Forest => &FOREST,
            Card::Stadium => &STADIUM,
            Card::TvStation => &TV_STATION,
            Card::CheeseFactory => &CHEESE_FACTORY,
            Card::FurnitureFactory => &FURNITURE_FACTORY,
            Card::Mine => &MINE,
            Card::FamilyRestaurant => &FAMILY_RESTAURANT,
            Card::AppleOrchard => &APPLE_ORCHARD,
            Card::FruitAndVegetableMarket => &FRUIT_AND_VEGETABLE_MARKET,
        }
    }

    pub fn name(&self) -> &'static str {
        self.def().name
    }

    pub fn category(&self) -> CardCategory {
        self.def().category
    }

    pub fn cost(&self) -> u32 {
        self.def().cost
    }

    pub fn amount(&self) -> u32 {
        self.def().amount
    }

    pub fn rolls(&self) -> &'static [u8] {
        self.def().rolls
    }

    pub fn triggers_on(&self, total: u8) -> bool {
        self.def().rolls.contains(&total)
    }

    pub fn is_attack(&self) -> bool {
        self.def().attack
    }

    pub fn is_purple(&self) -> bool {
        self.def().category == CardCategory::Purple
    }

    /// Pays out during the owner's own turn (purple cards resolve separately)
    pub fn is_own_production(&self) -> bool {
        self.def().on_owners_turn && !self.is_purple()
    }

    pub fn is_on_anyones_turn(&self) -> bool {
        self.def().on_anyones_turn
    }

    pub fn is_basic(&self) -> bool {
        self.def().payout == Payout::Basic
    }

    /// Category whose owned count multiplies this card's payout, for compound cards
    pub fn linked_category(&self) -> Option<CardCategory> {
        match self.def().payout {
            Payout::PerCategory(category) => Some(category),
            Payout::Basic => None,
        }
    }

    /// Compound card whose payout grows when a card of `category` is added
    pub fn compound_for(category: CardCategory) -> Option<Card> {
        Card::ALL
            .into_iter()
            .find(|card| card.linked_category() == Some(category))
    }

    /// Look up a card by its display name, ignoring case, spaces and dashes
    pub fn from_name(name: &str) -> Option<Card> {
        let wanted = normalize(name);
        Card::ALL
            .into_iter()
            .find(|card| normalize(card.name()) == wanted)
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_attributes() {
        assert_eq!(Card::Bakery.rolls(), &[2, 3]);
        assert_eq!(Card::Bakery.category(), CardCategory::Store);
        assert!(Card::Cafe.is_attack());
        assert!(!Card::Cafe.is_own_production());
        assert!(Card::WheatField.is_on_anyones_turn());
        assert_eq!(Card::Mine.amount(), 5);
        assert_eq!(Card::TvStation.cost(), 7);
    }

    #[test]
    fn test_purple_cards_trigger_on_six() {
        for card in Card::ALL.into_iter().filter(Card::is_purple) {
            assert!(card.triggers_on(PURPLE_ROLL));
            assert!(!card.is_own_production());
        }
    }

    #[test]
    fn test_compound_cards() {
        assert_eq!(Card::CheeseFactory.linked_category(), Some(CardCategory::Cow));
        assert_eq!(Card::FurnitureFactory.linked_category(), Some(CardCategory::Gear));
        assert_eq!(
            Card::FruitAndVegetableMarket.linked_category(),
            Some(CardCategory::Grain)
        );
        assert_eq!(Card::compound_for(CardCategory::Cow), Some(Card::CheeseFactory));
        assert_eq!(Card::compound_for(CardCategory::Cup), None);
        assert!(Card::WheatField.is_basic());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Card::from_name("tv station"), Some(Card::TvStation));
        assert_eq!(Card::from_name("Fruit-and-Vegetable Market"), Some(Card::FruitAndVegetableMarket));
        assert_eq!(Card::from_name("casino"), None);
    }
}
