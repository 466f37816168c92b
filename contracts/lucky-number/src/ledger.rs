//! Balance table, global counters and the reentrancy lock.
//!
//! Every read and write of money-carrying state goes through this module.
//! `TotalOwed` mirrors the sum of all `Balance(player)` entries so the
//! solvency guard never has to iterate players.

use soroban_sdk::{token::TokenClient, Address, Env};

use crate::{DataKey, Error, PERSISTENT_BUMP_LEDGERS};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

pub fn owner(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .ok_or(Error::NotInitialized)
}

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Admin, owner);
}

pub fn token(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .ok_or(Error::NotInitialized)
}

pub fn is_paused(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::Paused)
        .unwrap_or(false)
}

pub fn set_paused(env: &Env, paused: bool) {
    env.storage().instance().set(&DataKey::Paused, &paused);
}

// ---------------------------------------------------------------------------
// Funds held by the contract
// ---------------------------------------------------------------------------

/// Live token balance of the contract address.
pub fn contract_balance(env: &Env) -> Result<i128, Error> {
    let token = token(env)?;
    Ok(TokenClient::new(env, &token).balance(&env.current_contract_address()))
}

/// Funds not yet promised to any player.
pub fn free_balance(env: &Env) -> Result<i128, Error> {
    contract_balance(env)?
        .checked_sub(total_owed(env))
        .ok_or(Error::Overflow)
}

/// Move `amount` tokens from `from` into the contract.
pub fn pull(env: &Env, from: &Address, amount: i128) -> Result<(), Error> {
    let token = token(env)?;
    TokenClient::new(env, &token).transfer(from, &env.current_contract_address(), &amount);
    Ok(())
}

/// Move `amount` tokens out of the contract to `to`.
///
/// Callers must have committed every bookkeeping write before calling this.
pub fn push(env: &Env, to: &Address, amount: i128) -> Result<(), Error> {
    if contract_balance(env)? < amount {
        return Err(Error::InsufficientContractBalance);
    }
    let token = token(env)?;
    TokenClient::new(env, &token).transfer(&env.current_contract_address(), to, &amount);
    Ok(())
}

// ---------------------------------------------------------------------------
// Player balances
// ---------------------------------------------------------------------------

pub fn balance(env: &Env, player: &Address) -> i128 {
    get_i128(env, &DataKey::Balance(player.clone()))
}

pub fn total_owed(env: &Env) -> i128 {
    get_i128(env, &DataKey::TotalOwed)
}

pub fn credit(env: &Env, player: &Address, amount: i128) -> Result<(), Error> {
    let new_balance = balance(env, player)
        .checked_add(amount)
        .ok_or(Error::Overflow)?;
    let new_owed = total_owed(env)
        .checked_add(amount)
        .ok_or(Error::Overflow)?;

    set_i128(env, DataKey::Balance(player.clone()), new_balance);
    set_i128(env, DataKey::TotalOwed, new_owed);
    Ok(())
}

pub fn debit(env: &Env, player: &Address, amount: i128) -> Result<(), Error> {
    let current = balance(env, player);
    if amount > current {
        return Err(Error::InsufficientBalance);
    }
    let new_balance = current.checked_sub(amount).ok_or(Error::Overflow)?;
    let new_owed = total_owed(env)
        .checked_sub(amount)
        .ok_or(Error::Overflow)?;

    set_i128(env, DataKey::Balance(player.clone()), new_balance);
    set_i128(env, DataKey::TotalOwed, new_owed);
    Ok(())
}

// ---------------------------------------------------------------------------
// Global stats
// ---------------------------------------------------------------------------

pub fn prize_pool(env: &Env) -> i128 {
    get_i128(env, &DataKey::PrizePool)
}

pub fn total_volume(env: &Env) -> i128 {
    get_i128(env, &DataKey::TotalVolume)
}

pub fn add_volume(env: &Env, amount: i128) -> Result<(), Error> {
    let v = total_volume(env).checked_add(amount).ok_or(Error::Overflow)?;
    set_i128(env, DataKey::TotalVolume, v);
    Ok(())
}

pub fn add_prize_pool(env: &Env, amount: i128) -> Result<(), Error> {
    let v = prize_pool(env).checked_add(amount).ok_or(Error::Overflow)?;
    set_i128(env, DataKey::PrizePool, v);
    Ok(())
}

// ---------------------------------------------------------------------------
// Reentrancy lock
// ---------------------------------------------------------------------------

/// Run `f` while holding the contract-wide lock.
///
/// A second entry while the lock is held fails with `ReentrantCall`. On
/// error the host discards the whole invocation, lock write included.
pub fn non_reentrant<T>(env: &Env, f: impl FnOnce() -> Result<T, Error>) -> Result<T, Error> {
    if env.storage().temporary().has(&DataKey::Lock) {
        return Err(Error::ReentrantCall);
    }
    env.storage().temporary().set(&DataKey::Lock, &true);
    let out = f()?;
    env.storage().temporary().remove(&DataKey::Lock);
    Ok(out)
}

// ---------------------------------------------------------------------------
// Storage helpers
// ---------------------------------------------------------------------------

pub fn get_i128(env: &Env, key: &DataKey) -> i128 {
    env.storage().persistent().get(key).unwrap_or(0)
}

/// Write an i128 to persistent storage and extend its TTL in one step.
pub fn set_i128(env: &Env, key: DataKey, value: i128) {
    env.storage().persistent().set(&key, &value);
    extend_persistent_ttl(env, &key);
}

pub fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_BUMP_LEDGERS, PERSISTENT_BUMP_LEDGERS);
}
