//! Machi Koro rules engine and automated players
//!
//! Resolves dice rolls into coin movements, enumerates every possible roll
//! for lookahead, and scores purchases for heuristic players with tunable
//! strategy profiles.

pub mod config;
pub mod core;
pub mod error;
pub mod game;
pub mod tournament;

pub use error::{MachiError, Result};
