//! Constant product pricing (x·y=k) without a trading fee.

use integer_sqrt::IntegerSquareRoot;

use crate::error::SwapError;

pub const SCALE: u128 = 1_000_000_000_000_000_000;

/// Spot price of the input token in units of the output token, scaled by `SCALE`.
pub fn spot_price(reserve_in: u64, reserve_out: u64) -> Result<u128, SwapError> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(SwapError::EmptyPool);
    }

    (reserve_out as u128)
        .checked_mul(SCALE)
        .map(|scaled| scaled / reserve_in as u128)
        .ok_or(SwapError::Overflow)
}

/// Output of a swap of `amount_in` against the given reserves:
/// `amount_in * reserve_out / (reserve_in + amount_in)`, rounded down.
pub fn amount_out(amount_in: u64, reserve_in: u64, reserve_out: u64) -> Result<u64, SwapError> {
    if amount_in == 0 || reserve_in == 0 || reserve_out == 0 {
        return Err(SwapError::InvalidAmount);
    }

    let amount_in = amount_in as u128;
    let numerator = amount_in
        .checked_mul(reserve_out as u128)
        .ok_or(SwapError::Overflow)?;
    let denominator = (reserve_in as u128) + amount_in;

    // always below reserve_out, so it fits
    Ok((numerator / denominator) as u64)
}

pub fn initial_shares(amount_a: u64, amount_b: u64) -> Result<u64, SwapError> {
    let product = (amount_a as u128)
        .checked_mul(amount_b as u128)
        .ok_or(SwapError::Overflow)?;

    // sqrt of a u128 built from two u64 always fits in u64
    Ok(product.integer_sqrt() as u64)
}

pub fn quote(amount: u64, reserve_from: u64, reserve_to: u64) -> Result<u64, SwapError> {
    if reserve_from == 0 || reserve_to == 0 {
        return Err(SwapError::EmptyPool);
    }

    let quoted = (amount as u128)
        .checked_mul(reserve_to as u128)
        .ok_or(SwapError::Overflow)?
        / reserve_from as u128;

    u64::try_from(quoted).map_err(|_| SwapError::Overflow)
}

// smaller of the two per-token mints
pub fn proportional_shares(
    amount_a: u64,
    amount_b: u64,
    reserve_a: u64,
    reserve_b: u64,
    total_shares: u64,
) -> Result<u64, SwapError> {
    if reserve_a == 0 || reserve_b == 0 || total_shares == 0 {
        return Err(SwapError::EmptyPool);
    }

    let total = total_shares as u128;

    let from_a = (amount_a as u128)
        .checked_mul(total)
        .ok_or(SwapError::Overflow)?
        / reserve_a as u128;
    let from_b = (amount_b as u128)
        .checked_mul(total)
        .ok_or(SwapError::Overflow)?
        / reserve_b as u128;

    u64::try_from(from_a.min(from_b)).map_err(|_| SwapError::Overflow)
}

pub fn redemption(shares: u64, reserve: u64, total_shares: u64) -> Result<u64, SwapError> {
    if total_shares == 0 {
        return Err(SwapError::EmptyPool);
    }
    if shares > total_shares {
        return Err(SwapError::InsufficientShares);
    }

    let owed = (reserve as u128)
        .checked_mul(shares as u128)
        .ok_or(SwapError::Overflow)?
        / total_shares as u128;

    Ok(owed as u64)
}
