//! Tiered payout schedule.
//!
//! | distance | payout          |
//! |----------|-----------------|
//! | 0        | 9x wager        |
//! | 1        | 30% of wager    |
//! | 2        | 20% of wager    |
//! | 3+       | nothing         |
//!
//! Fractional amounts truncate toward zero.

use soroban_sdk::{Env, String};
use stellarcade_shared::bps_share;

use crate::Error;

pub const EXACT_MATCH_MULTIPLIER: i128 = 9;
pub const OFF_BY_ONE_BPS: u32 = 3_000;
pub const OFF_BY_TWO_BPS: u32 = 2_000;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Tier {
    ExactMatch,
    OffByOne,
    OffByTwo,
    Miss,
}

impl Tier {
    pub fn classify(chosen_number: u32, lucky_number: u32) -> Self {
        match chosen_number.abs_diff(lucky_number) {
            0 => Tier::ExactMatch,
            1 => Tier::OffByOne,
            2 => Tier::OffByTwo,
            _ => Tier::Miss,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::ExactMatch => "Exact Match - Win 9x!",
            Tier::OffByOne => "Off by 1 - 30% refund",
            Tier::OffByTwo => "Off by 2 - 20% refund",
            Tier::Miss => "Off by 3+ - Better luck next time!",
        }
    }

    pub fn payout(self, bet_amount: i128) -> Result<i128, Error> {
        if bet_amount < 0 {
            return Err(Error::InvalidAmount);
        }
        match self {
            Tier::ExactMatch => bet_amount
                .checked_mul(EXACT_MATCH_MULTIPLIER)
                .ok_or(Error::Overflow),
            Tier::OffByOne => bps_share(bet_amount, OFF_BY_ONE_BPS).ok_or(Error::Overflow),
            Tier::OffByTwo => bps_share(bet_amount, OFF_BY_TWO_BPS).ok_or(Error::Overflow),
            Tier::Miss => Ok(0),
        }
    }
}

/// Payout amount and tier for a settled guess. Reads no state.
pub fn calculate(
    bet_amount: i128,
    chosen_number: u32,
    lucky_number: u32,
) -> Result<(i128, Tier), Error> {
    let tier = Tier::classify(chosen_number, lucky_number);
    Ok((tier.payout(bet_amount)?, tier))
}

pub fn label(env: &Env, tier: Tier) -> String {
    String::from_str(env, tier.label())
}
