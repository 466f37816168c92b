//! Stellarcade Lucky Number Contract
//!
//! Players guess a number from 1 to 10 and wager between `MIN_BET` and
//! `MAX_BET`. Each bet is settled in the same invocation: a lucky number is
//! drawn, the payout tier is computed from the distance between the guess and
//! the draw, and any payout is credited to the player's internal balance.
//! Players pull their winnings later with `withdraw` or `withdraw_amount`.
//!
//! ## Game Flow
//! 1. Player calls `place_bet` → wager transfers in, game settles, payout is
//!    credited to the withdrawable balance.
//! 2. Player calls `withdraw` / `withdraw_amount` → balance is debited, then
//!    tokens transfer out.
//!
//! ## Payout
//! See [`payout`]: exact match pays 9x, off by one refunds 30%, off by two
//! refunds 20%, anything further pays nothing and the wager joins the prize
//! pool.
//!
//! ## Solvency
//! A bet with a non-zero payout is rejected unless
//! `token.balance(contract) - total_owed >= payout`, where `total_owed` is the
//! sum of every player's withdrawable balance. `emergency_withdraw` bypasses
//! this accounting and may leave the contract holding less than it owes.
//!
//! ## Storage Strategy
//! - `instance()`: Admin, Token, Paused.
//! - `persistent()`: counters, games, per-player game lists and balances.
//! - `temporary()`: the reentrancy lock, held for one invocation.
#![no_std]
#![allow(unexpected_cfgs)]

use soroban_sdk::{
    contract, contracterror, contractevent, contractimpl, contracttype, log, Address, Env, String,
    Vec,
};

mod ledger;
pub mod outcome;
pub mod payout;
mod registry;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const PERSISTENT_BUMP_LEDGERS: u32 = 518_400;

/// 0.001 in 7-decimal token units.
pub const MIN_BET: i128 = 10_000;
/// 0.005 in 7-decimal token units.
pub const MAX_BET: i128 = 50_000;
pub const MIN_NUMBER: u32 = 1;
pub const MAX_NUMBER: u32 = 10;
/// Size of the `get_recent_games` window.
pub const RECENT_GAMES_LIMIT: u64 = 10;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    AlreadyInitialized          = 1,
    NotInitialized              = 2,
    Unauthorized                = 3,
    BetTooLow                   = 4,
    BetTooHigh                  = 5,
    InvalidNumberRange          = 6,
    Paused                      = 7,
    AlreadyPaused               = 8,
    NotPaused                   = 9,
    InsufficientContractBalance = 10,
    NoWithdrawableBalance       = 11,
    InsufficientBalance         = 12,
    InvalidAmount               = 13,
    NotFound                    = 14,
    ReentrantCall               = 15,
    Overflow                    = 16,
}

// ---------------------------------------------------------------------------
// Storage types
// ---------------------------------------------------------------------------

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    // --- instance() ---
    Admin,
    Token,
    Paused,
    // --- persistent() ---
    GameCounter,
    PrizePool,
    TotalVolume,
    /// Sum of all withdrawable balances.
    TotalOwed,
    Game(u64),
    PlayerGames(Address),
    Balance(Address),
    // --- temporary() ---
    Lock,
}

#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GameStatus {
    Settled,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Game {
    pub id: u64,
    pub player: Address,
    pub bet_amount: i128,
    pub chosen_number: u32,
    pub lucky_number: u32,
    pub payout: i128,
    pub label: String,
    pub timestamp: u64,
    pub status: GameStatus,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Stats {
    pub game_counter: u64,
    pub prize_pool: i128,
    pub total_volume: i128,
    pub contract_balance: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub admin: Address,
    pub token: Address,
    pub min_bet: i128,
    pub max_bet: i128,
    pub min_number: u32,
    pub max_number: u32,
    pub paused: bool,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[contractevent]
pub struct Initialized {
    pub admin: Address,
    pub token: Address,
}

#[contractevent]
pub struct BetPlaced {
    #[topic]
    pub game_id: u64,
    #[topic]
    pub player: Address,
    pub chosen_number: u32,
}

#[contractevent]
pub struct GameResult {
    #[topic]
    pub game_id: u64,
    #[topic]
    pub player: Address,
    pub chosen_number: u32,
    pub lucky_number: u32,
    pub payout: i128,
    pub label: String,
}

#[contractevent]
pub struct WithdrawalMade {
    #[topic]
    pub player: Address,
    pub amount: i128,
}

#[contractevent]
pub struct Funded {
    #[topic]
    pub from: Address,
    pub amount: i128,
}

#[contractevent]
pub struct EmergencyWithdrawal {
    #[topic]
    pub admin: Address,
    pub amount: i128,
}

#[contractevent]
pub struct PauseChanged {
    pub paused: bool,
    pub admin: Address,
}

#[contractevent]
pub struct OwnershipTransferred {
    pub previous_owner: Address,
    pub new_owner: Address,
}

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

#[contract]
pub struct LuckyNumber;

#[contractimpl]
impl LuckyNumber {
    // -----------------------------------------------------------------------
    // init
    // -----------------------------------------------------------------------

    /// Initialize the game. May only be called once.
    ///
    /// `token` is the SEP-41 contract used for wagers, funding and payouts.
    pub fn init(env: Env, admin: Address, token: Address) -> Result<(), Error> {
        if ledger::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        admin.require_auth();

        ledger::set_owner(&env, &admin);
        env.storage().instance().set(&DataKey::Token, &token);
        ledger::set_paused(&env, false);

        registry::seed_counter(&env);
        ledger::set_i128(&env, DataKey::PrizePool, 0);
        ledger::set_i128(&env, DataKey::TotalVolume, 0);
        ledger::set_i128(&env, DataKey::TotalOwed, 0);

        Initialized { admin, token }.publish(&env);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // place_bet
    // -----------------------------------------------------------------------

    /// Wager `bet_amount` on `chosen_number` and settle immediately.
    ///
    /// Returns the new game id. On any error nothing is recorded and the
    /// wager stays with the player.
    pub fn place_bet(
        env: Env,
        player: Address,
        chosen_number: u32,
        bet_amount: i128,
    ) -> Result<u64, Error> {
        require_initialized(&env)?;
        player.require_auth();

        ledger::non_reentrant(&env, || settle_bet(&env, &player, chosen_number, bet_amount))
    }

    // -----------------------------------------------------------------------
    // withdrawals
    // -----------------------------------------------------------------------

    /// Withdraw the caller's entire balance. Returns the amount sent.
    pub fn withdraw(env: Env, player: Address) -> Result<i128, Error> {
        require_initialized(&env)?;
        player.require_auth();

        ledger::non_reentrant(&env, || {
            let amount = ledger::balance(&env, &player);
            if amount == 0 {
                return Err(Error::NoWithdrawableBalance);
            }
            pay_out(&env, &player, amount)?;
            Ok(amount)
        })
    }

    /// Withdraw part of the caller's balance.
    pub fn withdraw_amount(env: Env, player: Address, amount: i128) -> Result<(), Error> {
        require_initialized(&env)?;
        player.require_auth();

        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        ledger::non_reentrant(&env, || pay_out(&env, &player, amount))
    }

    // -----------------------------------------------------------------------
    // admin
    // -----------------------------------------------------------------------

    /// Block new bets. Withdrawals stay open.
    pub fn pause(env: Env, admin: Address) -> Result<(), Error> {
        require_owner(&env, &admin)?;
        if ledger::is_paused(&env) {
            return Err(Error::AlreadyPaused);
        }

        ledger::non_reentrant(&env, || {
            ledger::set_paused(&env, true);
            PauseChanged { paused: true, admin: admin.clone() }.publish(&env);
            Ok(())
        })
    }

    pub fn unpause(env: Env, admin: Address) -> Result<(), Error> {
        require_owner(&env, &admin)?;
        if !ledger::is_paused(&env) {
            return Err(Error::NotPaused);
        }

        ledger::non_reentrant(&env, || {
            ledger::set_paused(&env, false);
            PauseChanged { paused: false, admin: admin.clone() }.publish(&env);
            Ok(())
        })
    }

    /// Top up the house bankroll. Any address may fund.
    pub fn fund_contract(env: Env, from: Address, amount: i128) -> Result<(), Error> {
        require_initialized(&env)?;
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        from.require_auth();

        ledger::non_reentrant(&env, || {
            ledger::pull(&env, &from, amount)?;
            Funded { from: from.clone(), amount }.publish(&env);
            Ok(())
        })
    }

    /// Send `amount` straight from the contract to the owner. Owner only.
    ///
    /// Player balances are not touched, so this can leave the contract
    /// holding less than `total_owed`; later withdrawals then fail with
    /// `InsufficientContractBalance`.
    pub fn emergency_withdraw(env: Env, admin: Address, amount: i128) -> Result<(), Error> {
        require_owner(&env, &admin)?;
        if amount <= 0 {
            return Err(Error::InvalidAmount);
        }

        ledger::non_reentrant(&env, || {
            ledger::push(&env, &admin, amount)?;
            log!(&env, "emergency withdrawal", amount, ledger::total_owed(&env));
            EmergencyWithdrawal { admin: admin.clone(), amount }.publish(&env);
            Ok(())
        })
    }

    /// Hand the owner capability to `new_owner`. Owner only.
    pub fn transfer_ownership(env: Env, admin: Address, new_owner: Address) -> Result<(), Error> {
        require_owner(&env, &admin)?;

        ledger::non_reentrant(&env, || {
            ledger::set_owner(&env, &new_owner);
            OwnershipTransferred {
                previous_owner: admin.clone(),
                new_owner: new_owner.clone(),
            }
            .publish(&env);
            Ok(())
        })
    }

    // -----------------------------------------------------------------------
    // views
    // -----------------------------------------------------------------------

    pub fn get_stats(env: Env) -> Result<Stats, Error> {
        require_initialized(&env)?;
        Ok(Stats {
            game_counter: registry::game_counter(&env),
            prize_pool: ledger::prize_pool(&env),
            total_volume: ledger::total_volume(&env),
            contract_balance: ledger::contract_balance(&env)?,
        })
    }

    pub fn get_game(env: Env, game_id: u64) -> Result<Game, Error> {
        require_initialized(&env)?;
        registry::game(&env, game_id)
    }

    /// All of `player`'s game ids, oldest first.
    pub fn get_player_games(env: Env, player: Address) -> Result<Vec<u64>, Error> {
        require_initialized(&env)?;
        Ok(registry::player_games(&env, &player))
    }

    /// Up to the ten most recent game ids, oldest first.
    pub fn get_recent_games(env: Env) -> Result<Vec<u64>, Error> {
        require_initialized(&env)?;
        Ok(registry::recent_games(&env))
    }

    pub fn get_withdrawable_balance(env: Env, player: Address) -> Result<i128, Error> {
        require_initialized(&env)?;
        Ok(ledger::balance(&env, &player))
    }

    /// Quote the payout and tier label for a hypothetical outcome.
    pub fn calculate_payout(
        env: Env,
        bet_amount: i128,
        chosen_number: u32,
        lucky_number: u32,
    ) -> Result<(i128, String), Error> {
        let (amount, tier) = payout::calculate(bet_amount, chosen_number, lucky_number)?;
        Ok((amount, payout::label(&env, tier)))
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        ledger::owner(&env)
    }

    pub fn is_paused(env: Env) -> bool {
        ledger::is_paused(&env)
    }

    pub fn get_config(env: Env) -> Result<Config, Error> {
        Ok(Config {
            admin: ledger::owner(&env)?,
            token: ledger::token(&env)?,
            min_bet: MIN_BET,
            max_bet: MAX_BET,
            min_number: MIN_NUMBER,
            max_number: MAX_NUMBER,
            paused: ledger::is_paused(&env),
        })
    }
}

// ---------------------------------------------------------------------------
// Settlement
// ---------------------------------------------------------------------------

fn settle_bet(
    env: &Env,
    player: &Address,
    chosen_number: u32,
    bet_amount: i128,
) -> Result<u64, Error> {
    if bet_amount < MIN_BET {
        return Err(Error::BetTooLow);
    }
    if bet_amount > MAX_BET {
        return Err(Error::BetTooHigh);
    }
    if !(MIN_NUMBER..=MAX_NUMBER).contains(&chosen_number) {
        return Err(Error::InvalidNumberRange);
    }
    if ledger::is_paused(env) {
        return Err(Error::Paused);
    }

    let game_id = registry::next_game_id(env)?;
    let lucky_number = outcome::lucky_number(env, game_id);
    let (amount, tier) = payout::calculate(bet_amount, chosen_number, lucky_number)?;

    // The wager counts toward what the contract can cover.
    if amount > 0 {
        let free = ledger::free_balance(env)?
            .checked_add(bet_amount)
            .ok_or(Error::Overflow)?;
        if free < amount {
            return Err(Error::InsufficientContractBalance);
        }
    }

    let label = payout::label(env, tier);
    let game = Game {
        id: game_id,
        player: player.clone(),
        bet_amount,
        chosen_number,
        lucky_number,
        payout: amount,
        label: label.clone(),
        timestamp: env.ledger().timestamp(),
        status: GameStatus::Settled,
    };

    registry::record(env, &game);
    ledger::add_volume(env, bet_amount)?;
    if amount == 0 {
        ledger::add_prize_pool(env, bet_amount)?;
    } else {
        ledger::credit(env, player, amount)?;
    }

    ledger::pull(env, player, bet_amount)?;

    log!(env, "bet settled", game_id, lucky_number, amount);

    BetPlaced { game_id, player: player.clone(), chosen_number }.publish(env);
    GameResult {
        game_id,
        player: player.clone(),
        chosen_number,
        lucky_number,
        payout: amount,
        label,
    }
    .publish(env);

    Ok(game_id)
}

/// Debit `player` by `amount`, then transfer. Balance is written before the
/// token call.
fn pay_out(env: &Env, player: &Address, amount: i128) -> Result<(), Error> {
    ledger::debit(env, player, amount)?;
    ledger::push(env, player, amount)?;
    WithdrawalMade { player: player.clone(), amount }.publish(env);
    Ok(())
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn require_initialized(env: &Env) -> Result<(), Error> {
    if !ledger::is_initialized(env) {
        return Err(Error::NotInitialized);
    }
    Ok(())
}

/// Verify that `caller` is the stored owner and has signed the invocation.
fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
    let owner = ledger::owner(env)?;
    caller.require_auth();
    if caller != &owner {
        return Err(Error::Unauthorized);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
