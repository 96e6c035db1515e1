//! Roll resolution and outcome enumeration against a fixed four-player table
//!
//! Seats (coins, landmarks, cards):
//! - P1: 4, Shopping Mall + Train Station, Wheat 1, Bakery 2, Cafe 2, Convenience Store 3,
//!   Furniture Factory 1, Family Restaurant 1
//! - P2: 1, Train Station + Amusement Park, Wheat 1, Bakery 1, Ranch 2, Convenience Store 1,
//!   Cheese Factory 2, Apple Orchard 2, Fruit and Vegetable Market 3
//! - P3: 7, Train Station, Wheat 1, Bakery 1, Cafe 1, Forest 1, Furniture Factory 2, Mine 2,
//!   Family Restaurant 1
//! - P4: 2, no landmarks, Wheat 2, Bakery 1, Forest 3, Stadium, TV Station

use machi_engine::core::{Card, Landmark, Player, PlayerId};
use machi_engine::game::outcomes::{two_dice_probability, DiceMode, OutcomeTable};
use machi_engine::game::resolver::{own_production, resolve_roll, RollEffects, TvStationMode};
use machi_engine::game::GameState;
use similar_asserts::assert_eq;

fn seat(n: usize) -> PlayerId {
    PlayerId::new(n - 1)
}

fn table_game(current: usize) -> GameState {
    let players = vec![
        Player::empty(seat(1), "P1")
            .with_coins(4)
            .with_landmarks(&[Landmark::ShoppingMall, Landmark::TrainStation])
            .with_cards(&[
                (Card::WheatField, 1),
                (Card::Bakery, 2),
                (Card::Cafe, 2),
                (Card::ConvenienceStore, 3),
                (Card::FurnitureFactory, 1),
                (Card::FamilyRestaurant, 1),
            ]),
        Player::empty(seat(2), "P2")
            .with_coins(1)
            .with_landmarks(&[Landmark::TrainStation, Landmark::AmusementPark])
            .with_cards(&[
                (Card::WheatField, 1),
                (Card::Bakery, 1),
                (Card::Ranch, 2),
                (Card::ConvenienceStore, 1),
                (Card::CheeseFactory, 2),
                (Card::AppleOrchard, 2),
                (Card::FruitAndVegetableMarket, 3),
            ]),
        Player::empty(seat(3), "P3")
            .with_coins(7)
            .with_landmarks(&[Landmark::TrainStation])
            .with_cards(&[
                (Card::WheatField, 1),
                (Card::Bakery, 1),
                (Card::Cafe, 1),
                (Card::Forest, 1),
                (Card::FurnitureFactory, 2),
                (Card::Mine, 2),
                (Card::FamilyRestaurant, 1),
            ]),
        Player::empty(seat(4), "P4").with_coins(2).with_cards(&[
            (Card::WheatField, 2),
            (Card::Bakery, 1),
            (Card::Forest, 3),
            (Card::Stadium, 1),
            (Card::TvStation, 1),
        ]),
    ];
    let mut game = GameState::with_players(players).unwrap();
    game.set_current(seat(current)).unwrap();
    game
}

fn deltas(effects: &RollEffects) -> Vec<i32> {
    effects.iter().map(|(_, delta)| delta).collect()
}

fn resolved(current: usize, total: u8) -> Vec<i32> {
    let game = table_game(current);
    deltas(&resolve_roll(&game, total, TvStationMode::MaximumVictim).unwrap().effects)
}

#[test]
fn test_every_total_for_player_one() {
    let table = OutcomeTable::enumerate(&table_game(1)).unwrap();
    let expected: [[i32; 4]; 12] = [
        [1, 1, 1, 2],
        [4, 2, 0, 0],
        [3, 0, 1, 0],
        [12, 0, 0, 0],
        [0, 0, 1, 3],
        [0, 0, 0, 0],
        [0, 0, 0, 0],
        [0, 0, 0, 0],
        [-2, 0, 12, 0],
        [-2, 6, 2, 0],
        [0, 0, 0, 0],
        [0, 0, 0, 0],
    ];
    for (row, want) in expected.iter().enumerate() {
        let total = row as u8 + 1;
        assert_eq!(deltas(table.effects(total).unwrap()), want.to_vec(), "total {total}");
    }
}

#[test]
fn test_every_total_for_player_two() {
    let table = OutcomeTable::enumerate(&table_game(2)).unwrap();
    let expected: [[i32; 4]; 12] = [
        [1, 1, 1, 2],
        [0, 3, 0, 0],
        [1, 0, 0, 0],
        [0, 3, 0, 0],
        [0, 0, 1, 3],
        [0, 0, 0, 0],
        [0, 12, 0, 0],
        [0, 0, 0, 0],
        [1, -1, 10, 0],
        [1, 5, 0, 0],
        [0, 18, 0, 0],
        [0, 18, 0, 0],
    ];
    for (row, want) in expected.iter().enumerate() {
        let total = row as u8 + 1;
        assert_eq!(deltas(table.effects(total).unwrap()), want.to_vec(), "total {total}");
    }
}

#[test]
fn test_shopping_mall_boosts_cafe() {
    // P1's two Cafes take 2 x (1 + 1) from P3; P3's Bakery then pays 1
    assert_eq!(resolved(3, 3), vec![4, 0, -3, 0]);
}

#[test]
fn test_family_restaurant_with_mall() {
    // P1 takes 3, P3's Mines pay 10
    assert_eq!(resolved(3, 9), vec![3, 0, 7, 0]);
}

#[test]
fn test_attackers_paid_counter_clockwise_until_broke() {
    // P3 is paid first and P1 only gets the coin left over
    assert_eq!(resolved(4, 3), vec![1, 0, 1, -1]);
}

#[test]
fn test_attack_on_empty_purse_pays_nothing() {
    let mut game = table_game(2);
    game.players[1] = game.players[1].clone().with_coins(0);
    let resolution = resolve_roll(&game, 3, TvStationMode::MaximumVictim).unwrap();
    // Only P2's own Bakery pays out
    assert_eq!(deltas(&resolution.effects), vec![0, 1, 0, 0]);
}

#[test]
fn test_stadium_and_tv_station_use_running_balances() {
    assert_eq!(resolved(4, 6), vec![-2, -1, -7, 10]);
}

#[test]
fn test_tv_station_pending_leaves_the_steal_to_the_turn() {
    let game = table_game(4);
    let resolution = resolve_roll(&game, 6, TvStationMode::Pending).unwrap();
    assert!(resolution.steal_pending);
    assert_eq!(deltas(&resolution.effects), vec![-2, -1, -2, 5]);
}

#[test]
fn test_purple_cards_idle_on_other_totals() {
    assert_eq!(resolved(1, 6), vec![0, 0, 0, 0]);
    let resolution = resolve_roll(&table_game(4), 2, TvStationMode::Pending).unwrap();
    assert!(!resolution.steal_pending);
}

#[test]
fn test_own_production() {
    let game = table_game(1);
    assert_eq!(own_production(&game, seat(1), 4).unwrap(), 12);
    assert_eq!(own_production(&game, seat(1), 1).unwrap(), 1);
    assert_eq!(own_production(&game, seat(1), 8).unwrap(), 0);
    assert_eq!(own_production(&game, seat(1), 5).unwrap(), 0);

    let game = table_game(2);
    assert_eq!(own_production(&game, seat(2), 2).unwrap(), 3);
    assert_eq!(own_production(&game, seat(2), 7).unwrap(), 12);
    assert_eq!(own_production(&game, seat(2), 11).unwrap(), 18);

    let game = table_game(3);
    assert_eq!(own_production(&game, seat(3), 8).unwrap(), 18);
    assert_eq!(own_production(&game, seat(3), 9).unwrap(), 10);
}

#[test]
fn test_resolution_never_overdraws() {
    for current in 1..=4 {
        let game = table_game(current);
        for total in 1..=12 {
            let effects = resolve_roll(&game, total, TvStationMode::MaximumVictim).unwrap().effects;
            for (id, delta) in effects.iter() {
                let balance = game.player(id).unwrap().coins() as i32;
                assert!(balance + delta >= 0, "seat {id} total {total} current {current}");
            }
        }
    }
}

fn synthetic_table(active: usize, rows: &[[i32; 4]; 12]) -> OutcomeTable {
    let rows = rows.iter().map(|row| RollEffects::from_deltas(row)).collect();
    OutcomeTable::from_rows(seat(active), rows).unwrap()
}

const ZERO: [i32; 4] = [0, 0, 0, 0];

fn example_a() -> OutcomeTable {
    synthetic_table(
        1,
        &[
            [1, 1, 1, 2],
            [4, 2, 0, 0],
            [3, 0, 1, 0],
            [12, 0, 0, 0],
            [0, 0, 1, 3],
            [5, -1, -2, -2],
            ZERO,
            ZERO,
            [-2, 0, 12, 0],
            [-2, 6, 2, 0],
            ZERO,
            ZERO,
        ],
    )
}

fn example_b() -> OutcomeTable {
    synthetic_table(
        4,
        &[
            [3, 1, 1, 2],
            [2, 2, 0, 3],
            [1, 0, 1, -2],
            [0, 0, 0, 6],
            [0, 0, 1, 3],
            [0, -4, 0, 4],
            [0, 0, 0, 6],
            ZERO,
            [0, 0, 12, 0],
            [0, 6, 2, 0],
            [0, 0, 0, 21],
            [0, 0, 0, 21],
        ],
    )
}

fn close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
}

#[test]
fn test_averages() {
    let a = example_a();
    close(a.average(seat(1), DiceMode::One), 25.0 / 6.0);
    close(a.average(seat(3), DiceMode::One), 1.0 / 6.0);
    close(a.average(seat(1), DiceMode::Two), 57.0 / 36.0);
    close(a.others_average(seat(1), DiceMode::One), 1.0);
    close(a.others_average(seat(1), DiceMode::Two), 67.0 / 36.0);

    let b = example_b();
    close(b.average(seat(4), DiceMode::One), 16.0 / 6.0);
    close(b.average(seat(4), DiceMode::Two), 148.0 / 36.0);
    close(b.others_average(seat(4), DiceMode::One), 8.0 / 6.0);
    close(b.others_average(seat(4), DiceMode::Two), 64.0 / 36.0);
}

#[test]
fn test_best_cases() {
    let a = example_a();
    assert_eq!(a.best_case(seat(1), DiceMode::One), 12);
    assert_eq!(a.best_case(seat(1), DiceMode::Two), 12);
    close(a.best_case_probability(seat(1), DiceMode::Two), 3.0 / 36.0);

    let b = example_b();
    assert_eq!(b.best_case(seat(4), DiceMode::One), 6);
    assert_eq!(b.best_case(seat(4), DiceMode::Two), 21);
    close(b.best_case_probability(seat(4), DiceMode::Two), 2.0 / 36.0);
}

#[test]
fn test_best_case_tie_takes_lowest_total() {
    let mut rows = [ZERO; 12];
    rows[3] = [0, 12, 0, 0];
    rows[4] = [20, 0, 0, 0];
    rows[6] = [0, 12, 0, 0];
    let table = synthetic_table(1, &rows);
    assert_eq!(table.best_case(seat(2), DiceMode::Two), 12);
    close(table.best_case_probability(seat(2), DiceMode::Two), two_dice_probability(4));
}

#[test]
fn test_nothing_to_gain_is_certain() {
    let table = synthetic_table(1, &[ZERO; 12]);
    assert_eq!(table.best_case(seat(1), DiceMode::Two), 0);
    close(table.best_case_probability(seat(1), DiceMode::Two), 1.0);
}

#[test]
fn test_from_rows_needs_twelve_rows() {
    let rows = vec![RollEffects::zeroed(2); 6];
    assert!(OutcomeTable::from_rows(seat(1), rows).is_err());
}

#[test]
fn test_stats_match_individual_queries() {
    let table = OutcomeTable::enumerate(&table_game(2)).unwrap();
    let stats = table.stats(seat(2));
    close(stats.average_one_die, table.average(seat(2), DiceMode::One));
    close(stats.average_two_dice, table.average(seat(2), DiceMode::Two));
    assert_eq!(stats.best_two_dice, 18);
    close(stats.best_two_dice_probability, two_dice_probability(11));
    close(stats.others_average_two_dice, table.others_average(seat(2), DiceMode::Two));
}
