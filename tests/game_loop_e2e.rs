//! End-to-end games through the turn state machine
//!
//! Runs complete automated games and checks they are reproducible from a
//! seed and never break the rules along the way.

use machi_engine::core::{Card, Landmark, Player, PlayerId, StrategyProfile, StrategyTrait};
use machi_engine::config::StrategyTuning;
use machi_engine::game::{
    DiceMode, GameEndReason, GameLogger, GameLoop, GameResult, GameState, HeuristicController, OutputMode, PlayerController,
    RandomController, Step, TurnEngine, TurnEvent, VerbosityLevel,
};
use machi_engine::MachiError;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use similar_asserts::assert_eq;
use std::process::Command;

fn mixed_controllers(seed: u64) -> Vec<Box<dyn PlayerController>> {
    vec![
        Box::new(HeuristicController::new(
            PlayerId::new(0),
            StrategyProfile::new().with(StrategyTrait::Saver, 2),
            StrategyTuning::default(),
        )),
        Box::new(RandomController::with_seed(PlayerId::new(1), seed)),
        Box::new(HeuristicController::new(
            PlayerId::new(2),
            StrategyProfile::new()
                .with(StrategyTrait::AttackFocused, 3)
                .with(StrategyTrait::Optimist, 1),
            StrategyTuning::default(),
        )),
        Box::new(HeuristicController::neutral(PlayerId::new(3))),
    ]
}

/// Play a captured game and return its result, log text and final state
fn play(seed: u64, max_turns: u32) -> (GameResult, Vec<String>, GameState) {
    let mut game = GameState::new(4).unwrap();
    let mut controllers = mixed_controllers(seed);
    let mut logger = GameLogger::with_verbosity(VerbosityLevel::Verbose);
    logger.set_output_mode(OutputMode::Memory);

    let (result, lines) = {
        let mut game_loop = GameLoop::new(&mut game)
            .with_seed(seed)
            .with_max_turns(max_turns)
            .with_logger(logger);
        let result = game_loop.run_game(&mut controllers).unwrap();
        let lines: Vec<String> = game_loop
            .logger()
            .logs()
            .iter()
            .map(|entry| entry.message.clone())
            .collect();
        (result, lines)
    };
    (result, lines, game)
}

#[test]
fn test_same_seed_same_game() {
    let (result1, log1, state1) = play(42, 400);
    let (result2, log2, state2) = play(42, 400);
    assert!(!log1.is_empty());
    assert_eq!(log1, log2);
    assert_eq!(result1, result2);
    assert_eq!(state1, state2);
}

#[test]
fn test_different_seeds_diverge() {
    let (_, log1, _) = play(1, 200);
    let (_, log2, _) = play(2, 200);
    assert_ne!(log1, log2);
}

#[test]
fn test_market_and_holdings_stay_consistent() {
    for seed in 0..5 {
        let (result, _, game) = play(seed, 500);
        for card in Card::ALL {
            let owned: u32 = game.players.iter().map(|p| p.count(card)).sum();
            let starting_hand = match card {
                Card::WheatField | Card::Bakery => game.player_count() as u32,
                _ => 0,
            };
            assert_eq!(
                owned - starting_hand,
                game.sold_copies(card),
                "{} copies bought vs sold in game {seed}",
                card.name()
            );
            if card.is_purple() {
                assert!(game.players.iter().all(|p| p.count(card) <= 1));
            }
        }
        match result.end_reason {
            GameEndReason::AllLandmarks(winner) => {
                assert_eq!(game.step(), Step::Won);
                assert!(game.player(winner).unwrap().has_won());
                assert_eq!(result.winner, Some(winner));
                assert_eq!(game.winner(), Some(winner));
            }
            GameEndReason::TurnLimit => {
                assert_eq!(result.winner, None);
                assert!(game.winner().is_none());
            }
            GameEndReason::Manual => panic!("run_game never stops manually"),
        }
    }
}

#[test]
fn test_turn_limit() {
    let (result, _, game) = play(7, 3);
    assert_eq!(result.end_reason, GameEndReason::TurnLimit);
    assert_eq!(result.turns_played, 3);
    assert!(game.step().needs_decision());
}

#[test]
fn test_controller_choices_are_logged() {
    let mut game = GameState::new(2).unwrap();
    let mut controllers: Vec<Box<dyn PlayerController>> = vec![
        Box::new(HeuristicController::neutral(PlayerId::new(0))),
        Box::new(HeuristicController::neutral(PlayerId::new(1))),
    ];
    let mut logger = GameLogger::with_verbosity(VerbosityLevel::Silent);
    logger.enable_capture();
    let mut game_loop = GameLoop::new(&mut game).with_seed(3).with_logger(logger);
    game_loop.run_turns(&mut controllers, 4).unwrap();

    let logs = game_loop.logger().logs();
    let choices = logs
        .iter()
        .filter(|entry| entry.category == Some("controller_choice"))
        .count();
    assert!(choices >= 8, "expected a roll and a buy per turn, got {choices}");
    assert!(logs[0].message.contains("Player 1's turn"));
}

#[test]
fn test_resume_after_run_turns() {
    let mut game = GameState::new(2).unwrap();
    let mut controllers: Vec<Box<dyn PlayerController>> = vec![
        Box::new(RandomController::with_seed(PlayerId::new(0), 1)),
        Box::new(RandomController::with_seed(PlayerId::new(1), 2)),
    ];
    let partial = {
        let mut game_loop = GameLoop::new(&mut game)
            .with_seed(5)
            .with_verbosity(VerbosityLevel::Silent);
        game_loop.run_turns(&mut controllers, 6).unwrap()
    };
    assert_eq!(partial.end_reason, GameEndReason::Manual);
    assert_ne!(game.step(), Step::Setup);

    // A fresh loop continues from the saved step instead of restarting
    let mut game_loop = GameLoop::new(&mut game)
        .with_seed(6)
        .with_max_turns(50)
        .with_verbosity(VerbosityLevel::Silent);
    let result = game_loop.run_game(&mut controllers).unwrap();
    assert!(result.turns_played <= 50);
}

#[test]
fn test_actions_out_of_step_are_rejected() {
    let mut game = GameState::new(2).unwrap();
    let mut engine = TurnEngine::new(&mut game);
    assert!(matches!(
        engine.roll_dice(3, 0),
        Err(MachiError::IllegalStepTransition { step: Step::Setup, .. })
    ));
    engine.begin().unwrap();
    assert!(matches!(
        engine.purchase_card(Card::Ranch),
        Err(MachiError::IllegalStepTransition { step: Step::Roll, .. })
    ));
    assert!(matches!(
        engine.steal(PlayerId::new(1)),
        Err(MachiError::IllegalStepTransition { .. })
    ));
    assert!(engine.complete_turn().is_err());
    assert!(engine.confirm_roll().is_err());

    engine.roll_dice(4, 0).unwrap();
    assert!(matches!(
        engine.roll_dice(4, 0),
        Err(MachiError::IllegalStepTransition { step: Step::Buy, .. })
    ));
}

#[test]
fn test_radio_tower_turn_with_random_dice() {
    let players = vec![
        Player::new(PlayerId::new(0), "A")
            .with_landmarks(&[Landmark::TrainStation, Landmark::RadioTower])
            .with_coins(0),
        Player::new(PlayerId::new(1), "B"),
    ];
    let mut game = GameState::with_players(players).unwrap();
    let mut rng = ChaCha12Rng::seed_from_u64(99);
    let mut engine = TurnEngine::new(&mut game);
    engine.begin().unwrap();

    let events = engine
        .roll(DiceMode::Two, &mut rng)
        .unwrap();
    assert!(matches!(
        events[0],
        TurnEvent::Rolled {
            awaiting_confirmation: true,
            ..
        }
    ));
    assert_eq!(game.step(), Step::ConfirmRoll);
    let first = game.dice();
    assert!(first.rolled_two());

    let mut engine = TurnEngine::new(&mut game);
    let events = engine
        .roll(DiceMode::Two, &mut rng)
        .unwrap();
    assert!(matches!(
        events[0],
        TurnEvent::Rolled {
            awaiting_confirmation: false,
            ..
        }
    ));
    assert!(matches!(events[1], TurnEvent::Resolved { .. }));
    assert!(matches!(game.step(), Step::Buy | Step::Steal));
}

#[test]
fn test_binary_is_deterministic() {
    let run = || {
        let output = Command::new(env!("CARGO_BIN_EXE_machi"))
            .args(["play", "--seed", "42", "--max-turns", "200", "--verbosity", "verbose"])
            .output()
            .expect("Failed to run machi binary");
        assert!(output.status.success());
        String::from_utf8(output.stdout).expect("Invalid UTF-8 in stdout")
    };
    let run1 = run();
    let run2 = run();
    assert!(run1.contains("=== Game Over ==="));
    assert_eq!(run1, run2, "same seed produced different output");
}
