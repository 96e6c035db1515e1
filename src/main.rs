//! Machi Koro engine - main binary
//!
//! Plays automated games with heuristic or random players and runs
//! tournaments between strategy profiles.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use machi_engine::{
    config::StrategyTuning,
    core::{Player, PlayerId, StrategyProfile},
    game::{
        GameEndReason, GameLogger, GameLoop, GameState, HeuristicController, OutputFormat, PlayerController,
        RandomController, VerbosityLevel,
    },
    tournament::{print_report, run_tourney, SeatKind, TourneyConfig},
};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use std::path::{Path, PathBuf};

/// Controller type for a seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SeatArg {
    /// Heuristic player with a random reasonable profile
    Heuristic,
    /// Heuristic player with every trait at 0
    Neutral,
    /// Makes random legal choices
    Random,
}

/// Verbosity level for game output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

#[derive(Parser)]
#[command(name = "machi")]
#[command(about = "Machi Koro rules engine and automated players", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one automated game and print it
    Play {
        /// One entry per seat, 2 to 4 seats
        #[arg(long = "seat", value_enum, num_args = 1.., default_values_t = [SeatArg::Heuristic, SeatArg::Heuristic])]
        seats: Vec<SeatArg>,

        /// Set random seed for deterministic games
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Stop after this many turns
        #[arg(long, default_value_t = 1000)]
        max_turns: u32,

        /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,

        /// JSON file overriding strategy tuning constants
        #[arg(long, value_name = "TUNING_FILE")]
        tuning: Option<PathBuf>,

        /// Print one JSON object per log line
        #[arg(long)]
        json: bool,

        /// Echo every controller decision to stderr
        #[arg(long)]
        debug_choices: bool,
    },

    /// Run many games and report win statistics
    Tourney {
        /// One entry per seat, 2 to 4 seats
        #[arg(long = "seat", value_enum, num_args = 1.., default_values_t = [SeatArg::Heuristic, SeatArg::Random])]
        seats: Vec<SeatArg>,

        /// Number of games to run
        #[arg(long, default_value_t = 100)]
        games: usize,

        /// Tournament seed; game n uses seed + n
        #[arg(long, default_value_t = 0)]
        seed: u64,

        #[arg(long, default_value_t = 1000)]
        max_turns: u32,

        /// JSON file overriding strategy tuning constants
        #[arg(long, value_name = "TUNING_FILE")]
        tuning: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            seats,
            seed,
            max_turns,
            verbosity,
            tuning,
            json,
            debug_choices,
        } => {
            let tuning = load_tuning(tuning.as_deref())?;
            let mut logger = GameLogger::with_verbosity(verbosity.0);
            if json {
                logger.set_output_format(OutputFormat::Json);
            }
            logger.set_debug_choices(debug_choices);
            run_play(&seats, seed, max_turns, tuning, logger)?;
        }
        Commands::Tourney {
            seats,
            games,
            seed,
            max_turns,
            tuning,
        } => {
            let tuning = load_tuning(tuning.as_deref())?;
            let seats = seats
                .iter()
                .map(|seat| match seat {
                    SeatArg::Heuristic => SeatKind::RandomProfile,
                    SeatArg::Neutral => SeatKind::Heuristic(StrategyProfile::new()),
                    SeatArg::Random => SeatKind::Random,
                })
                .collect();
            let config = TourneyConfig::new(seats, games)
                .with_seed(seed)
                .with_max_turns(max_turns)
                .with_tuning(tuning);
            println!("=== Machi Koro - Tournament Mode ===");
            println!("Running {games} games, seed {seed}\n");
            let stats = run_tourney(&config).context("tournament failed")?;
            print_report(&config, &stats);
        }
    }

    Ok(())
}

fn load_tuning(path: Option<&Path>) -> anyhow::Result<StrategyTuning> {
    match path {
        Some(path) => StrategyTuning::load_from_file(path)
            .with_context(|| format!("failed to load tuning from {}", path.display())),
        None => Ok(StrategyTuning::default()),
    }
}

fn run_play(
    seats: &[SeatArg],
    seed: u64,
    max_turns: u32,
    tuning: StrategyTuning,
    logger: GameLogger,
) -> anyhow::Result<()> {
    if !(2..=4).contains(&seats.len()) {
        bail!("a game needs 2 to 4 seats, got {}", seats.len());
    }

    let mut profile_rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let mut players = Vec::with_capacity(seats.len());
    let mut controllers: Vec<Box<dyn PlayerController>> = Vec::with_capacity(seats.len());
    for (seat, kind) in seats.iter().enumerate() {
        let id = PlayerId::new(seat);
        let mut player = Player::new(id, format!("Player {}", seat + 1));
        let controller: Box<dyn PlayerController> = match kind {
            SeatArg::Heuristic | SeatArg::Neutral => {
                let profile = if *kind == SeatArg::Heuristic {
                    StrategyProfile::reasonable(&mut profile_rng)
                } else {
                    StrategyProfile::new()
                };
                println!("{id}: heuristic ({profile})");
                player = player.with_profile(profile.clone());
                Box::new(HeuristicController::new(id, profile, tuning.clone()))
            }
            SeatArg::Random => {
                println!("{id}: random");
                Box::new(RandomController::with_seed(id, seed.wrapping_add(seat as u64 + 1)))
            }
        };
        players.push(player);
        controllers.push(controller);
    }
    println!();

    let mut game = GameState::with_players(players)?;
    let result = {
        let mut game_loop = GameLoop::new(&mut game)
            .with_seed(seed)
            .with_max_turns(max_turns)
            .with_logger(logger);
        game_loop.run_game(&mut controllers).context("game failed")?
    };

    println!("\n=== Game Over ===");
    match result.end_reason {
        GameEndReason::AllLandmarks(winner) => println!("Winner: {winner} after {} turns", result.turns_played),
        GameEndReason::TurnLimit => println!("No winner after {} turns", result.turns_played),
        GameEndReason::Manual => println!("Stopped after {} turns", result.turns_played),
    }
    for player in &game.players {
        println!(
            "  {}: {} coins, {} landmarks, progress {:.0}%",
            player.name.as_str(),
            player.coins(),
            player.landmarks().len(),
            100.0 * player.progress()
        );
    }
    Ok(())
}
