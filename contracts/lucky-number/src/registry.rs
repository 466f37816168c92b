//! Game records and their per-player and global indices.
//!
//! Ids are dense: `GameCounter == n` means games `1..=n` all exist. The recent
//! games window is derived from the counter and never stored.

use soroban_sdk::{Address, Env, Vec};

use crate::{ledger::extend_persistent_ttl, DataKey, Error, Game, RECENT_GAMES_LIMIT};

pub fn game_counter(env: &Env) -> u64 {
    env.storage()
        .persistent()
        .get(&DataKey::GameCounter)
        .unwrap_or(0)
}

/// Start the id sequence so the first settled game gets id 1.
pub fn seed_counter(env: &Env) {
    env.storage().persistent().set(&DataKey::GameCounter, &0u64);
    extend_persistent_ttl(env, &DataKey::GameCounter);
}

/// Id the next settled game will receive.
pub fn next_game_id(env: &Env) -> Result<u64, Error> {
    game_counter(env).checked_add(1).ok_or(Error::Overflow)
}

/// Store a settled game and index it. `game.id` must equal [`next_game_id`].
///
/// A player's id list is unbounded and append-only. It is read and rewritten
/// whole on every bet, so the cost of a bet grows with that player's history.
pub fn record(env: &Env, game: &Game) {
    let game_key = DataKey::Game(game.id);
    env.storage().persistent().set(&game_key, game);
    extend_persistent_ttl(env, &game_key);

    env.storage().persistent().set(&DataKey::GameCounter, &game.id);
    extend_persistent_ttl(env, &DataKey::GameCounter);

    let player_key = DataKey::PlayerGames(game.player.clone());
    let mut ids = player_games(env, &game.player);
    ids.push_back(game.id);
    env.storage().persistent().set(&player_key, &ids);
    extend_persistent_ttl(env, &player_key);
}

pub fn game(env: &Env, game_id: u64) -> Result<Game, Error> {
    if game_id == 0 || game_id > game_counter(env) {
        return Err(Error::NotFound);
    }
    env.storage()
        .persistent()
        .get(&DataKey::Game(game_id))
        .ok_or(Error::NotFound)
}

pub fn player_games(env: &Env, player: &Address) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&DataKey::PlayerGames(player.clone()))
        .unwrap_or_else(|| Vec::new(env))
}

/// The last `min(counter, RECENT_GAMES_LIMIT)` ids, oldest first.
pub fn recent_games(env: &Env) -> Vec<u64> {
    let counter = game_counter(env);
    let first = counter.saturating_sub(RECENT_GAMES_LIMIT) + 1;
    let mut ids = Vec::new(env);
    for id in first..=counter {
        ids.push_back(id);
    }
    ids
}
