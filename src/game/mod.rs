//! Game state, rules and automated play

pub mod buying;
pub mod controller;
pub mod game_loop;
pub mod heuristic_controller;
pub mod logger;
pub mod outcomes;
pub mod phase;
pub mod random_controller;
pub mod resolver;
pub mod state;
pub mod strategy;

pub use buying::{BuyingDecision, Purchase};
pub use controller::{ControllerType, GameStateView, PlayerController};
pub use game_loop::{GameEndReason, GameLoop, GameResult, TurnEngine, TurnEvent, VerbosityLevel};
pub use heuristic_controller::HeuristicController;
pub use logger::{GameLogger, OutputFormat, OutputMode};
pub use outcomes::{DiceMode, OutcomeStats, OutcomeTable};
pub use phase::Step;
pub use random_controller::RandomController;
pub use resolver::{resolve_roll, RollEffects, TvStationMode};
pub use state::{Dice, GameState};
pub use strategy::Strategy;
