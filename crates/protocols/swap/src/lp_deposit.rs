//! LP Deposit
//!
//! Proportional deposit quotes and the `add_liquidity_entry` payload.
//!
//! The pool only accepts deposits at its current reserve ratio; the user fixes
//! one side and the other is derived with `quote`.

use animeswap_core::number::{bigint_str, ratio, to_decimal};
use animeswap_core::{CoinType, NetworkOptions};
use aptos_node_client::ResourceFetcher;
use aptos_tx::{deadline_from, unix_now, EntryFunctionPayload};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::calculator::{apply_slippage, quote};
use crate::constants::entry;
use crate::fetch::fetch_pool;
use crate::state::{LiquidityPoolResource, SlippageDirection, SwapError};
use crate::tx_builder::{entry_function, validate_slippage};

/// Deposit quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLiquidityRates {
    /// Amount of the other coin matching the fixed amount
    #[serde(with = "bigint_str")]
    pub amount: BigInt,
    pub fixed_div_other: BigDecimal,
    pub other_div_fixed: BigDecimal,
    /// Fraction of the fixed coin's reserve the deposit will represent
    pub share_of_pool: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct AddLiquidityParams {
    pub coin_x: CoinType,
    pub coin_y: CoinType,
    pub amount_x: BigInt,
    pub amount_y: BigInt,
    pub slippage: BigDecimal,
    /// Minutes from now
    pub deadline: u64,
}

/// Quote the counter-amount for depositing `amount` of `coin_fixed`.
pub fn calculate_add_liquidity_rates(
    pool: &LiquidityPoolResource,
    coin_fixed: &CoinType,
    amount: &BigInt,
) -> Result<AddLiquidityRates, SwapError> {
    let (reserve_fixed, reserve_other) = pool
        .reserves_for(coin_fixed)
        .ok_or_else(|| SwapError::PoolNotFound(format!("{} in {}", coin_fixed, pool.pair)))?;

    let counter = quote(amount, reserve_fixed, reserve_other)
        .ok_or(SwapError::InsufficientLiquidity)?;

    let total = to_decimal(&(reserve_fixed + amount));
    let share_of_pool = if total == BigDecimal::from(0) {
        BigDecimal::from(0)
    } else {
        to_decimal(amount) / total
    };

    Ok(AddLiquidityRates {
        amount: counter,
        fixed_div_other: ratio(reserve_fixed, reserve_other),
        other_div_fixed: ratio(reserve_other, reserve_fixed),
        share_of_pool,
    })
}

/// Fetch the pool holding `coin_fixed` and `coin_other`, then quote.
pub async fn fetch_add_liquidity_rates<F>(
    fetcher: &F,
    options: &NetworkOptions,
    coin_fixed: &CoinType,
    coin_other: &CoinType,
    amount: &BigInt,
) -> Result<AddLiquidityRates, SwapError>
where
    F: ResourceFetcher + ?Sized,
{
    let pool = fetch_pool(fetcher, options, coin_fixed, coin_other)
        .await?
        .ok_or_else(|| SwapError::PoolNotFound(format!("{}, {}", coin_fixed, coin_other)))?;
    calculate_add_liquidity_rates(&pool, coin_fixed, amount)
}

/// `add_liquidity_entry` payload, expiring `params.deadline` minutes from now
pub fn create_add_liquidity_payload(
    options: &NetworkOptions,
    params: &AddLiquidityParams,
) -> Result<EntryFunctionPayload, SwapError> {
    create_add_liquidity_payload_at(options, params, unix_now())
}

/// Arguments: `[resource_account, amount_x, amount_y, min_x, min_y, deadline]`
pub fn create_add_liquidity_payload_at(
    options: &NetworkOptions,
    params: &AddLiquidityParams,
    now_secs: u64,
) -> Result<EntryFunctionPayload, SwapError> {
    validate_slippage(&params.slippage)?;

    let min_x = apply_slippage(&params.amount_x, &params.slippage, SlippageDirection::Minus);
    let min_y = apply_slippage(&params.amount_y, &params.slippage, SlippageDirection::Minus);

    Ok(EntryFunctionPayload::new(
        entry_function(options, entry::ADD_LIQUIDITY),
        vec![
            params.coin_x.as_str().to_string(),
            params.coin_y.as_str().to_string(),
        ],
        vec![
            options.modules.resource_account_address.clone(),
            params.amount_x.to_string(),
            params.amount_y.to_string(),
            min_x.to_string(),
            min_y.to_string(),
            deadline_from(now_secs, params.deadline).to_string(),
        ],
    ))
}
