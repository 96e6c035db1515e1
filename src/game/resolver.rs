//! Turn effect resolution
//!
//! Given a state and one die total, compute the signed coin change of every
//! player. Resolution never touches the state it is given: passes run against
//! a private ledger of working balances, so later passes see the coins moved
//! by earlier ones and every transfer can be capped at the payer's balance.
//!
//! Pass order is fixed:
//! 1. attack cards held by other players (paid by the active player)
//! 2. the active player's own production
//! 3. other players' anyone's-turn cards (paid by the bank)
//! 4. Stadium
//! 5. TV Station (pending steal, or the maximum-victim variant)

use crate::core::{Card, CardCategory, PlayerId};
use crate::game::GameState;
use crate::{MachiError, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// How the TV Station pass resolves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TvStationMode {
    /// Leave the steal to a later decision and report it as pending
    Pending,
    /// Steal from the wealthiest other player immediately
    MaximumVictim,
}

/// Signed coin change per seat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollEffects {
    deltas: SmallVec<[i32; 4]>,
}

impl RollEffects {
    pub fn zeroed(player_count: usize) -> Self {
        RollEffects {
            deltas: SmallVec::from_elem(0, player_count),
        }
    }

    /// Effects from explicit per-seat deltas, seat order
    pub fn from_deltas(deltas: &[i32]) -> Self {
        RollEffects {
            deltas: SmallVec::from_slice(deltas),
        }
    }

    pub fn get(&self, player: PlayerId) -> i32 {
        self.deltas.get(player.index()).copied().unwrap_or(0)
    }

    pub fn player_count(&self) -> usize {
        self.deltas.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, i32)> + '_ {
        self.deltas
            .iter()
            .enumerate()
            .map(|(seat, delta)| (PlayerId::new(seat), *delta))
    }

    /// Sum of every delta except `player`'s
    pub fn others_total(&self, player: PlayerId) -> i32 {
        self.iter()
            .filter(|(id, _)| *id != player)
            .map(|(_, delta)| delta)
            .sum()
    }

    pub fn is_zero(&self) -> bool {
        self.deltas.iter().all(|delta| *delta == 0)
    }

    fn add(&mut self, player: PlayerId, amount: i32) {
        if let Some(delta) = self.deltas.get_mut(player.index()) {
            *delta += amount;
        }
    }
}

/// Outcome of resolving one die total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub effects: RollEffects,
    /// The active player's TV Station triggered and still needs a victim
    pub steal_pending: bool,
}

/// Working balances plus accumulated deltas
struct Ledger {
    balances: SmallVec<[u32; 4]>,
    effects: RollEffects,
}

impl Ledger {
    fn new(game: &GameState) -> Self {
        Ledger {
            balances: game.players.iter().map(|p| p.coins()).collect(),
            effects: RollEffects::zeroed(game.player_count()),
        }
    }

    fn balance(&self, player: PlayerId) -> u32 {
        self.balances[player.index()]
    }

    fn credit(&mut self, player: PlayerId, amount: u32) {
        self.balances[player.index()] += amount;
        self.effects.add(player, amount as i32);
    }

    /// Move up to `amount` coins, capped at the payer's balance; returns the amount moved
    fn transfer(&mut self, from: PlayerId, to: PlayerId, amount: u32) -> u32 {
        let moved = amount.min(self.balance(from));
        self.balances[from.index()] -= moved;
        self.effects.add(from, -(moved as i32));
        self.credit(to, moved);
        moved
    }
}

/// Resolve every effect of `total` for the current player
pub fn resolve_roll(game: &GameState, total: u8, tv_mode: TvStationMode) -> Result<Resolution> {
    if !(1..=12).contains(&total) {
        return Err(MachiError::InvalidRollTotal(total));
    }
    let active = game.current_id();
    game.player(active)?;

    let mut ledger = Ledger::new(game);
    attack_pass(game, active, total, &mut ledger)?;
    let own = own_production(game, active, total)?;
    ledger.credit(active, own);
    anyones_turn_pass(game, active, total, &mut ledger)?;
    stadium_pass(game, active, total, &mut ledger)?;
    let steal_pending = tv_station_pass(game, active, total, tv_mode, &mut ledger)?;

    Ok(Resolution {
        effects: ledger.effects,
        steal_pending,
    })
}

/// Coins `player` would make from their own cards if they rolled `total`
///
/// This is pass 2 in isolation and is what purchase evaluation compares
/// between the live state and a hypothetical one.
pub fn own_production(game: &GameState, player: PlayerId, total: u8) -> Result<u32> {
    let owner = game.player(player)?;
    let mut payout = 0;
    for (card, count) in owner.stock() {
        if !card.is_own_production() || !card.triggers_on(total) {
            continue;
        }
        payout += match card.linked_category() {
            Some(category) => count * owner.category_count(category) * card.amount(),
            None => {
                let mut per_card = card.amount();
                if owner.has_shopping_mall() && card.category() == CardCategory::Store {
                    per_card += 1;
                }
                per_card * count
            }
        };
    }
    Ok(payout)
}

/// Attack cards, walking counter-clockwise from the player right of `active`
///
/// The active player's purse is drained in that order, so whoever sits
/// closest on the right is paid first.
fn attack_pass(game: &GameState, active: PlayerId, total: u8, ledger: &mut Ledger) -> Result<()> {
    for holder_id in game.others_counter_clockwise(active) {
        let holder = game.player(holder_id)?;
        let owed: u32 = holder
            .stock()
            .filter(|(card, _)| card.is_attack() && card.is_basic() && card.triggers_on(total))
            .map(|(card, count)| {
                let mut per_card = card.amount();
                if holder.has_shopping_mall() && card.category() == CardCategory::Cup {
                    per_card += 1;
                }
                per_card * count
            })
            .sum();
        if owed > 0 {
            ledger.transfer(active, holder_id, owed);
        }
    }
    Ok(())
}

/// Bank-funded payouts to other players' anyone's-turn cards
fn anyones_turn_pass(
    game: &GameState,
    active: PlayerId,
    total: u8,
    ledger: &mut Ledger,
) -> Result<()> {
    for owner_id in game.others_clockwise(active) {
        let owner = game.player(owner_id)?;
        let payout: u32 = owner
            .stock()
            .filter(|(card, _)| card.is_on_anyones_turn() && card.is_basic() && card.triggers_on(total))
            .map(|(card, count)| card.amount() * count)
            .sum();
        if payout > 0 {
            ledger.credit(owner_id, payout);
        }
    }
    Ok(())
}

fn stadium_pass(game: &GameState, active: PlayerId, total: u8, ledger: &mut Ledger) -> Result<()> {
    let stadium = Card::Stadium;
    if !game.player(active)?.owns(stadium) || !stadium.triggers_on(total) {
        return Ok(());
    }
    for payer in game.others_clockwise(active) {
        ledger.transfer(payer, active, stadium.amount());
    }
    Ok(())
}

fn tv_station_pass(
    game: &GameState,
    active: PlayerId,
    total: u8,
    mode: TvStationMode,
    ledger: &mut Ledger,
) -> Result<bool> {
    let tv = Card::TvStation;
    if !game.player(active)?.owns(tv) || !tv.triggers_on(total) {
        return Ok(false);
    }
    match mode {
        TvStationMode::Pending => Ok(true),
        TvStationMode::MaximumVictim => {
            // Ties go to the first seat clockwise from the active player
            let mut victim: Option<PlayerId> = None;
            for candidate in game.others_clockwise(active) {
                let richer = victim.map_or(true, |best| ledger.balance(candidate) > ledger.balance(best));
                if richer {
                    victim = Some(candidate);
                }
            }
            if let Some(victim) = victim {
                ledger.transfer(victim, active, tv.amount());
            }
            Ok(false)
        }
    }
}

/// Coins the TV Station takes from a victim holding `victim_coins`
pub fn tv_station_steal_amount(victim_coins: u32) -> u32 {
    victim_coins.min(Card::TvStation.amount())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Landmark, Player};

    fn two_player_game() -> GameState {
        GameState::new(2).unwrap()
    }

    #[test]
    fn test_three_wheat_fields_pay_three() {
        let players = vec![
            Player::empty(PlayerId::new(0), "A").with_cards(&[(Card::WheatField, 3)]),
            Player::empty(PlayerId::new(1), "B").with_cards(&[(Card::Bakery, 1)]),
        ];
        let game = GameState::with_players(players).unwrap();

        let resolution = resolve_roll(&game, 1, TvStationMode::Pending).unwrap();
        assert_eq!(resolution.effects.get(PlayerId::new(0)), 3);
        assert_eq!(resolution.effects.get(PlayerId::new(1)), 0);
        assert!(!resolution.steal_pending);
    }

    #[test]
    fn test_resolution_is_pure() {
        let mut game = two_player_game();
        game.players[1].add_card(Card::Cafe).unwrap();
        let before = game.clone();
        let first = resolve_roll(&game, 3, TvStationMode::MaximumVictim).unwrap();
        let second = resolve_roll(&game, 3, TvStationMode::MaximumVictim).unwrap();
        assert_eq!(first, second);
        assert_eq!(game, before);
    }

    #[test]
    fn test_shopping_mall_boosts_stores_only() {
        let mut game = two_player_game();
        game.players[0].add_card(Card::ConvenienceStore).unwrap();
        assert_eq!(own_production(&game, PlayerId::new(0), 4).unwrap(), 3);
        game.players[0].add_landmark(Landmark::ShoppingMall).unwrap();
        assert_eq!(own_production(&game, PlayerId::new(0), 4).unwrap(), 4);
        // Wheat field is grain, no bonus
        assert_eq!(own_production(&game, PlayerId::new(0), 1).unwrap(), 1);
    }

    #[test]
    fn test_attack_is_capped_at_active_balance() {
        let mut game = two_player_game();
        game.players[0] = game.players[0].clone().with_coins(1);
        game.players[1].add_card(Card::Cafe).unwrap();
        game.players[1].add_card(Card::Cafe).unwrap();

        let resolution = resolve_roll(&game, 3, TvStationMode::Pending).unwrap();
        // Cafe takes the single coin, then the bakery pays 1
        assert_eq!(resolution.effects.get(PlayerId::new(1)), 1);
        assert_eq!(resolution.effects.get(PlayerId::new(0)), 0);
    }

    #[test]
    fn test_tv_station_pending_moves_no_coins() {
        let mut game = two_player_game();
        game.players[0].add_card(Card::TvStation).unwrap();
        let resolution = resolve_roll(&game, 6, TvStationMode::Pending).unwrap();
        assert!(resolution.steal_pending);
        assert!(resolution.effects.is_zero());

        let resolution = resolve_roll(&game, 6, TvStationMode::MaximumVictim).unwrap();
        assert!(!resolution.steal_pending);
        assert_eq!(resolution.effects.get(PlayerId::new(0)), 3);
        assert_eq!(resolution.effects.get(PlayerId::new(1)), -3);
    }

    #[test]
    fn test_invalid_total() {
        let game = two_player_game();
        assert!(matches!(
            resolve_roll(&game, 13, TvStationMode::Pending),
            Err(MachiError::InvalidRollTotal(13))
        ));
        assert!(resolve_roll(&game, 0, TvStationMode::Pending).is_err());
    }

    #[test]
    fn test_steal_amount() {
        assert_eq!(tv_station_steal_amount(2), 2);
        assert_eq!(tv_station_steal_amount(9), 5);
    }
}
