//! Command handlers

mod liquidity;
mod trade;

pub use liquidity::*;
pub use trade::*;

use animeswap_core::number::{d, mul_decimals, parse_int};
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};

/// Positive amount in the coin's smallest unit.
///
/// With `decimals` set the value is read as whole coins and floored to raw units.
pub(crate) fn parse_amount(value: &str, decimals: Option<u32>) -> anyhow::Result<BigInt> {
    let amount = match decimals {
        Some(decimals) => d(value).map(|pretty| mul_decimals(&pretty, decimals)),
        None => parse_int(value),
    };
    match amount {
        Some(amount) if amount.sign() == Sign::Plus => Ok(amount),
        _ => anyhow::bail!("amount must be positive, got {}", value),
    }
}

pub(crate) fn parse_slippage(value: &str) -> anyhow::Result<BigDecimal> {
    d(value).ok_or_else(|| anyhow::anyhow!("invalid slippage: {}", value))
}
