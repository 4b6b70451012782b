//! Direct Swap
//!
//! Quotes and payloads for swapping through a single pool, without routing.
//! `fixed` selects which side the user typed: `ExactIn` fixes the amount
//! paid, `ExactOut` the amount received.

use animeswap_core::number::{bigint_str, ratio};
use animeswap_core::{CoinType, NetworkOptions};
use aptos_node_client::ResourceFetcher;
use aptos_tx::{deadline_from, unix_now, EntryFunctionPayload};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::calculator::{self, apply_slippage};
use crate::constants::{entry, fees::FEE_SCALE};
use crate::fetch::{fetch_pool, require_swap_fee};
use crate::state::{LiquidityPoolResource, SlippageDirection, SwapError, TradeType};
use crate::tx_builder::{entry_function, parse_recipient, validate_slippage};

/// Quote for a single-pool swap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRates {
    /// The side the user did not fix: output for exact input, input for exact output
    #[serde(with = "bigint_str")]
    pub amount: BigInt,
    /// `amount` after slippage: minimum received or maximum paid
    #[serde(with = "bigint_str")]
    pub amount_with_slippage: BigInt,
    pub price_impact: BigDecimal,
    /// Effective price: input paid per unit received
    pub coin_from_div_coin_to: BigDecimal,
    pub coin_to_div_coin_from: BigDecimal,
    /// Fee taken from the input, in input units
    #[serde(with = "bigint_str")]
    pub swap_fee: BigInt,
}

/// Parameters for a single-pool swap payload
#[derive(Debug, Clone)]
pub struct SwapPayloadParams {
    pub coin_from: CoinType,
    pub coin_to: CoinType,
    pub amount_from: BigInt,
    pub amount_to: BigInt,
    pub fixed: TradeType,
    pub to_address: String,
    pub slippage: BigDecimal,
    /// Minutes from now
    pub deadline: u64,
}

/// Quote a swap through `pool`.
///
/// # Errors
///
/// * `PoolNotFound` if the pool does not trade between the two coins
/// * `InsufficientLiquidity` if the pool is empty or the amount cannot be filled
/// * `InvalidSlippage` if `slippage` is outside (0, 1)
pub fn calculate_swap_rates(
    pool: &LiquidityPoolResource,
    coin_from: &CoinType,
    coin_to: &CoinType,
    amount: &BigInt,
    fixed: TradeType,
    slippage: &BigDecimal,
    fee: u64,
) -> Result<SwapRates, SwapError> {
    validate_slippage(slippage)?;

    let (reserve_from, reserve_to) = match pool.reserves_for(coin_from) {
        Some(reserves) if pool.pair.other(coin_from) == Some(coin_to) => reserves,
        _ => {
            return Err(SwapError::PoolNotFound(format!(
                "{}, {}",
                coin_from, coin_to
            )))
        }
    };
    if !pool.is_tradable() {
        return Err(SwapError::InsufficientLiquidity);
    }

    let (amount_in, amount_out, computed, amount_with_slippage) = match fixed {
        TradeType::ExactIn => {
            let out = calculator::calculate_output(amount, reserve_from, reserve_to, fee)
                .ok_or(SwapError::InsufficientLiquidity)?;
            let bound = apply_slippage(&out, slippage, SlippageDirection::Minus);
            (amount.clone(), out.clone(), out, bound)
        }
        TradeType::ExactOut => {
            let input = calculator::calculate_input(amount, reserve_to, reserve_from, fee)
                .ok_or(SwapError::InsufficientLiquidity)?;
            let bound = apply_slippage(&input, slippage, SlippageDirection::Plus);
            (input.clone(), amount.clone(), input, bound)
        }
    };

    let price_impact = calculator::price_impact(
        coin_from,
        std::slice::from_ref(pool),
        &[amount_in.clone(), amount_out.clone()],
        fee,
    );

    Ok(SwapRates {
        amount: computed,
        amount_with_slippage,
        price_impact,
        coin_from_div_coin_to: ratio(&amount_in, &amount_out),
        coin_to_div_coin_from: ratio(&amount_out, &amount_in),
        swap_fee: &amount_in * BigInt::from(fee) / BigInt::from(FEE_SCALE),
    })
}

/// Fetch the pool and swap fee, then quote.
pub async fn fetch_swap_rates<F>(
    fetcher: &F,
    options: &NetworkOptions,
    coin_from: &CoinType,
    coin_to: &CoinType,
    amount: &BigInt,
    fixed: TradeType,
    slippage: &BigDecimal,
) -> Result<SwapRates, SwapError>
where
    F: ResourceFetcher + ?Sized,
{
    let (pool, fee) = futures::try_join!(
        fetch_pool(fetcher, options, coin_from, coin_to),
        require_swap_fee(fetcher, options),
    )?;
    let pool = pool.ok_or_else(|| SwapError::PoolNotFound(format!("{}, {}", coin_from, coin_to)))?;
    calculate_swap_rates(
        &pool,
        coin_from,
        coin_to,
        amount,
        fixed,
        slippage,
        fee,
    )
}

/// Single-pool swap payload, expiring `params.deadline` minutes from now.
pub fn create_swap_payload(
    options: &NetworkOptions,
    params: &SwapPayloadParams,
) -> Result<EntryFunctionPayload, SwapError> {
    create_swap_payload_at(options, params, unix_now())
}

/// Single-pool swap payload with deadline measured from `now_secs`.
///
/// Exact input: `[resource_account, amount_from, min(amount_to), to, deadline]`.
/// Exact output: `[resource_account, amount_to, max(amount_from), to, deadline]`.
pub fn create_swap_payload_at(
    options: &NetworkOptions,
    params: &SwapPayloadParams,
    now_secs: u64,
) -> Result<EntryFunctionPayload, SwapError> {
    validate_slippage(&params.slippage)?;
    let to = parse_recipient(&params.to_address)?;

    let (function, fixed, bound) = match params.fixed {
        TradeType::ExactIn => (
            entry::SWAP_EXACT_IN[0],
            &params.amount_from,
            apply_slippage(&params.amount_to, &params.slippage, SlippageDirection::Minus),
        ),
        TradeType::ExactOut => (
            entry::SWAP_EXACT_OUT[0],
            &params.amount_to,
            apply_slippage(&params.amount_from, &params.slippage, SlippageDirection::Plus),
        ),
    };

    Ok(EntryFunctionPayload::new(
        entry_function(options, function),
        vec![
            params.coin_from.as_str().to_string(),
            params.coin_to.as_str().to_string(),
        ],
        vec![
            options.modules.resource_account_address.clone(),
            fixed.to_string(),
            bound.to_string(),
            to.to_string(),
            deadline_from(now_secs, params.deadline).to_string(),
        ],
    ))
}
