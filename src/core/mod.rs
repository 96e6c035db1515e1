//! Core game types: the asset catalog and players

pub mod card;
pub mod landmark;
pub mod player;
pub mod profile;
pub mod types;

pub use card::{Card, CardCategory, CardDef, Payout, PURPLE_ROLL};
pub use landmark::Landmark;
pub use player::{Player, STARTING_COINS};
pub use profile::{StrategyProfile, StrategyTrait, MAX_DEGREE};
pub use types::{PlayerId, PlayerName};
