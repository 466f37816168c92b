//! Lucky number derivation.
//!
//! The result is computed as:
//!
//!   `sha256(timestamp_be || sequence_be || game_id_be)[0..8] % 10 + 1`
//!
//! Ledger timestamp and sequence are known to whoever closes the ledger, so
//! this source is only as unpredictable as ledger close itself.

use soroban_sdk::{Bytes, BytesN, Env};

use crate::{MAX_NUMBER, MIN_NUMBER};

/// Number of distinct outcomes in `[MIN_NUMBER, MAX_NUMBER]`.
const OUTCOMES: u64 = (MAX_NUMBER - MIN_NUMBER + 1) as u64;

/// Draw the lucky number for `game_id` from the current ledger.
pub fn lucky_number(env: &Env, game_id: u64) -> u32 {
    let ledger = env.ledger();
    derive(env, ledger.timestamp(), ledger.sequence(), game_id)
}

/// Deterministic core of [`lucky_number`]. Always in `[MIN_NUMBER, MAX_NUMBER]`.
pub fn derive(env: &Env, timestamp: u64, sequence: u32, game_id: u64) -> u32 {
    let mut preimage = [0u8; 20];
    preimage[..8].copy_from_slice(&timestamp.to_be_bytes());
    preimage[8..12].copy_from_slice(&sequence.to_be_bytes());
    preimage[12..].copy_from_slice(&game_id.to_be_bytes());

    let digest: BytesN<32> = env.crypto().sha256(&Bytes::from_slice(env, &preimage)).into();
    let arr = digest.to_array();
    let raw = u64::from_be_bytes([arr[0], arr[1], arr[2], arr[3], arr[4], arr[5], arr[6], arr[7]]);
    (raw % OUTCOMES) as u32 + MIN_NUMBER
}
