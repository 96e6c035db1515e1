//! Tournament mode: play many automated games and collect win statistics
//!
//! Games run one after another. Each game derives its own seeds from the
//! tournament seed and the game index, so any single game can be replayed.

use crate::{
    config::StrategyTuning,
    core::{Player, PlayerId, StrategyProfile, StrategyTrait},
    game::{
        controller::PlayerController, GameEndReason, GameLoop, GameState, HeuristicController, RandomController,
        VerbosityLevel,
    },
    MachiError, Result,
};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rustc_hash::FxHashMap;
use std::time::{Duration, Instant};

/// How a seat is played in every game of the tournament
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatKind {
    /// Heuristic player with a fixed profile
    Heuristic(StrategyProfile),
    /// Heuristic player with a fresh reasonable profile each game
    RandomProfile,
    /// Uniformly random legal choices
    Random,
}

#[derive(Debug, Clone)]
pub struct TourneyConfig {
    pub games: usize,
    pub seats: Vec<SeatKind>,
    pub seed: u64,
    pub max_turns: u32,
    pub tuning: StrategyTuning,
}

impl TourneyConfig {
    pub fn new(seats: Vec<SeatKind>, games: usize) -> Self {
        TourneyConfig {
            games,
            seats,
            seed: 0,
            max_turns: 1000,
            tuning: StrategyTuning::default(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_tuning(mut self, tuning: StrategyTuning) -> Self {
        self.tuning = tuning;
        self
    }
}

/// Statistics collected during a tournament
#[derive(Debug, Default, Clone)]
pub struct TournamentStats {
    pub games_played: usize,
    /// Wins per seat index
    pub seat_wins: Vec<usize>,
    /// Games that hit the turn limit
    pub draws: usize,
    pub failed: usize,
    pub total_turns: u64,
    /// Wins by heuristic players that had the trait switched on
    pub trait_wins: FxHashMap<StrategyTrait, usize>,
    pub elapsed: Duration,
}

impl TournamentStats {
    pub fn average_turns(&self) -> f64 {
        let decided = self.games_played.saturating_sub(self.failed);
        if decided == 0 {
            0.0
        } else {
            self.total_turns as f64 / decided as f64
        }
    }

    pub fn win_rate(&self, seat: usize) -> f64 {
        let wins = self.seat_wins.get(seat).copied().unwrap_or(0);
        if self.games_played == 0 {
            0.0
        } else {
            wins as f64 / self.games_played as f64
        }
    }
}

/// Outcome of one tournament game
struct GameOutcome {
    winner: Option<PlayerId>,
    turns: u32,
    profiles: Vec<Option<StrategyProfile>>,
}

/// Run every game of the tournament and return the collected statistics
pub fn run_tourney(config: &TourneyConfig) -> Result<TournamentStats> {
    let seat_count = config.seats.len();
    if !(2..=4).contains(&seat_count) {
        return Err(MachiError::InvalidPlayerCount(seat_count));
    }
    if config.games == 0 {
        return Err(MachiError::InvalidAction(
            "Tournament requires at least one game".to_string(),
        ));
    }

    let start = Instant::now();
    let mut stats = TournamentStats {
        seat_wins: vec![0; seat_count],
        ..TournamentStats::default()
    };

    for game_idx in 0..config.games {
        stats.games_played += 1;
        match play_one(config, game_idx) {
            Ok(outcome) => {
                stats.total_turns += u64::from(outcome.turns);
                match outcome.winner {
                    Some(winner) => {
                        stats.seat_wins[winner.index()] += 1;
                        if let Some(Some(profile)) = outcome.profiles.get(winner.index()) {
                            for strategy_trait in StrategyTrait::ALL {
                                if profile.degree(strategy_trait) > 0 {
                                    *stats.trait_wins.entry(strategy_trait).or_insert(0) += 1;
                                }
                            }
                        }
                    }
                    None => stats.draws += 1,
                }
            }
            Err(e) => {
                eprintln!("Warning: Game {game_idx} failed: {e}");
                stats.failed += 1;
            }
        }
    }

    stats.elapsed = start.elapsed();
    Ok(stats)
}

fn play_one(config: &TourneyConfig, game_idx: usize) -> Result<GameOutcome> {
    let game_seed = config.seed.wrapping_add(game_idx as u64);
    let mut profile_rng = Xoshiro256PlusPlus::seed_from_u64(game_seed);

    let mut players = Vec::with_capacity(config.seats.len());
    let mut controllers: Vec<Box<dyn PlayerController>> = Vec::with_capacity(config.seats.len());
    let mut profiles = Vec::with_capacity(config.seats.len());

    for (seat, kind) in config.seats.iter().enumerate() {
        let id = PlayerId::new(seat);
        let profile = match kind {
            SeatKind::Heuristic(profile) => Some(profile.clone()),
            SeatKind::RandomProfile => Some(StrategyProfile::reasonable(&mut profile_rng)),
            SeatKind::Random => None,
        };
        let mut player = Player::new(id, format!("Player {}", seat + 1));
        let controller: Box<dyn PlayerController> = match &profile {
            Some(profile) => {
                player = player.with_profile(profile.clone());
                Box::new(HeuristicController::new(id, profile.clone(), config.tuning.clone()))
            }
            None => {
                let controller_seed = game_seed.wrapping_add(0x9E37_79B9_7F4A_7C15_u64.wrapping_mul(seat as u64 + 1));
                Box::new(RandomController::with_seed(id, controller_seed))
            }
        };
        players.push(player);
        controllers.push(controller);
        profiles.push(profile);
    }

    let mut game = GameState::with_players(players)?;
    let mut game_loop = GameLoop::new(&mut game)
        .with_seed(game_seed)
        .with_max_turns(config.max_turns)
        .with_verbosity(VerbosityLevel::Silent);
    let result = game_loop.run_game(&mut controllers)?;

    let winner = match result.end_reason {
        GameEndReason::AllLandmarks(winner) => Some(winner),
        GameEndReason::TurnLimit | GameEndReason::Manual => None,
    };
    Ok(GameOutcome {
        winner,
        turns: result.turns_played,
        profiles,
    })
}

/// Print a human-readable summary of a finished tournament
pub fn print_report(config: &TourneyConfig, stats: &TournamentStats) {
    println!("=== Tournament Complete ===");
    println!("Total games played: {}", stats.games_played);
    println!("Elapsed time: {:.2}s", stats.elapsed.as_secs_f64());
    if stats.elapsed.as_secs_f64() > 0.0 {
        println!(
            "Games per second: {:.2}",
            stats.games_played as f64 / stats.elapsed.as_secs_f64()
        );
    }
    println!("Average turns per game: {:.1}\n", stats.average_turns());

    println!("=== Seat Statistics ===");
    for (seat, kind) in config.seats.iter().enumerate() {
        let label = match kind {
            SeatKind::Heuristic(profile) => format!("heuristic ({profile})"),
            SeatKind::RandomProfile => "heuristic (random profile)".to_string(),
            SeatKind::Random => "random".to_string(),
        };
        println!(
            "  P{} {label}: {} wins ({:.1}%)",
            seat + 1,
            stats.seat_wins[seat],
            100.0 * stats.win_rate(seat)
        );
    }
    println!("  Draws: {}", stats.draws);
    if stats.failed > 0 {
        println!("  Failed: {}", stats.failed);
    }

    if !stats.trait_wins.is_empty() {
        println!("\n=== Wins By Trait ===");
        let mut traits: Vec<_> = stats.trait_wins.iter().collect();
        traits.sort_by_key(|(strategy_trait, _)| **strategy_trait);
        for (strategy_trait, wins) in traits {
            println!("  {strategy_trait}: {wins}");
        }
    }
}
