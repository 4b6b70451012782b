//! AMM Calculator
//!
//! Constant-product swap math with a proportional fee, evaluated on exact
//! integers so results match the on-chain module bit for bit.
//!
//! Fees are in units of 1/10000. A hop whose result falls outside valid bounds
//! yields `None`; callers drop the path rather than fail.

use std::collections::HashMap;

use animeswap_core::number::{ceil_to_int, floor_to_int, to_decimal};
use animeswap_core::CoinType;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

use crate::constants::{fees::FEE_SCALE, U64_MAX};
use crate::state::{LiquidityPoolResource, SlippageDirection};

fn fee_multiplier(fee: u64) -> BigInt {
    BigInt::from(FEE_SCALE) - BigInt::from(fee)
}

/// Calculate swap output for an exact input
///
/// Formula: out = floor(in * (10000 - fee) * reserve_out / (reserve_in * 10000 + in * (10000 - fee)))
///
/// Returns `None` when the result is negative or exceeds `reserve_out`.
pub fn calculate_output(
    amount_in: &BigInt,
    reserve_in: &BigInt,
    reserve_out: &BigInt,
    fee: u64,
) -> Option<BigInt> {
    let amount_in_with_fee = amount_in * fee_multiplier(fee);
    let denominator = reserve_in * BigInt::from(FEE_SCALE) + &amount_in_with_fee;
    if !denominator.is_positive() {
        return None;
    }

    let output = amount_in_with_fee * reserve_out / denominator;
    if output.is_negative() || output > *reserve_out {
        return None;
    }
    Some(output)
}

/// Calculate required input for an exact output (reverse calculation)
///
/// Formula: in = floor(out * 10000 * reserve_in / ((reserve_out - out) * (10000 - fee))) + 1
///
/// The `+ 1` rounds in the pool's favour. Returns `None` when the output drains
/// the pool or the input is negative or above `u64::MAX`.
pub fn calculate_input(
    amount_out: &BigInt,
    reserve_out: &BigInt,
    reserve_in: &BigInt,
    fee: u64,
) -> Option<BigInt> {
    let denominator = (reserve_out - amount_out) * fee_multiplier(fee);
    if !denominator.is_positive() {
        return None;
    }

    let input = amount_out * BigInt::from(FEE_SCALE) * reserve_in / denominator + BigInt::one();
    if input.is_negative() || input > BigInt::from(U64_MAX) {
        return None;
    }
    Some(input)
}

/// Apply a slippage tolerance to an amount.
///
/// `Minus` floors `amount * (1 - slippage)`; `Plus` ceils `amount * (1 + slippage)`.
pub fn apply_slippage(
    amount: &BigInt,
    slippage: &BigDecimal,
    direction: SlippageDirection,
) -> BigInt {
    let amount = to_decimal(amount);
    match direction {
        SlippageDirection::Minus => {
            floor_to_int(&(amount.clone() - amount * slippage.clone()))
        }
        SlippageDirection::Plus => ceil_to_int(&(amount.clone() + amount * slippage.clone())),
    }
}

/// Proportional counter-amount for a deposit.
///
/// Formula: floor(amount_x * reserve_y / reserve_x). `None` for an empty pool.
pub fn quote(amount_x: &BigInt, reserve_x: &BigInt, reserve_y: &BigInt) -> Option<BigInt> {
    if reserve_x.is_zero() {
        return None;
    }
    Some(amount_x * reserve_y / reserve_x)
}

/// Coins visited when walking `pools` from `coin_in`
pub fn coin_type_list(coin_in: &CoinType, pools: &[LiquidityPoolResource]) -> Vec<CoinType> {
    let mut coins = Vec::with_capacity(pools.len() + 1);
    coins.push(coin_in.clone());
    let mut current = coin_in.clone();
    for pool in pools {
        let next = pool
            .pair
            .other(&current)
            .cloned()
            .unwrap_or_else(|| pool.pair.coin_x.clone());
        coins.push(next.clone());
        current = next;
    }
    coins
}

/// Price impact of a simulated route.
///
/// The no-impact output extrapolates the input through every hop's current
/// fee-adjusted rate `reserve_out / reserve_in * (10000 - fee) / 10000`. The
/// result is `|ideal - realized| / ideal`, or zero when the ideal is zero.
pub fn price_impact(
    coin_in: &CoinType,
    pools: &[LiquidityPoolResource],
    amount_list: &[BigInt],
    fee: u64,
) -> BigDecimal {
    let (Some(first), Some(last)) = (amount_list.first(), amount_list.last()) else {
        return BigDecimal::zero();
    };

    let fee_rate = to_decimal(&fee_multiplier(fee)) / to_decimal(&BigInt::from(FEE_SCALE));
    let mut ideal = to_decimal(first);
    let mut current = coin_in.clone();
    for pool in pools {
        let Some((reserve_in, reserve_out)) = pool.reserves_for(&current) else {
            return BigDecimal::zero();
        };
        if reserve_in.is_zero() {
            return BigDecimal::zero();
        }
        ideal = ideal * to_decimal(reserve_out) / to_decimal(reserve_in) * fee_rate.clone();
        if let Some(next) = pool.pair.other(&current) {
            current = next.clone();
        }
    }

    if ideal.is_zero() {
        return BigDecimal::zero();
    }
    ((ideal.clone() - to_decimal(last)) / ideal).abs()
}

/// Total reserves held per coin across a set of pools.
pub fn aggregate_coin_reserves(pools: &[LiquidityPoolResource]) -> HashMap<CoinType, BigInt> {
    let mut totals: HashMap<CoinType, BigInt> = HashMap::new();
    for pool in pools {
        *totals.entry(pool.pair.coin_x.clone()).or_default() += &pool.coin_x_reserve;
        *totals.entry(pool.pair.coin_y.clone()).or_default() += &pool.coin_y_reserve;
    }
    totals
}
