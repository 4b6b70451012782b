//! LP Redeem
//!
//! Pro-rata withdrawal quotes and the `remove_liquidity_entry` payload.

use animeswap_core::number::bigint_str;
use animeswap_core::{CoinType, NetworkOptions, ProtocolError};
use aptos_node_client::ResourceFetcher;
use aptos_tx::{deadline_from, unix_now, EntryFunctionPayload};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};

use crate::calculator::apply_slippage;
use crate::constants::entry;
use crate::fetch::{fetch_lp_coin_supply, fetch_pool_resource, sorted_pair};
use crate::state::{LiquidityPoolResource, SlippageDirection, SwapError};
use crate::tx_builder::{entry_function, validate_slippage};

/// Coins returned for burning an amount of LP coin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveLiquidityRates {
    #[serde(with = "bigint_str")]
    pub amount_x: BigInt,
    #[serde(with = "bigint_str")]
    pub amount_y: BigInt,
}

#[derive(Debug, Clone)]
pub struct RemoveLiquidityParams {
    pub coin_x: CoinType,
    pub coin_y: CoinType,
    pub amount: BigInt,
    pub amount_x_desired: BigInt,
    pub amount_y_desired: BigInt,
    pub slippage: BigDecimal,
    /// Minutes from now
    pub deadline: u64,
}

/// `amount_x` and `amount_y` follow the caller's `coin_x` / `coin_y`, whatever
/// orientation the pool is stored under.
pub fn calculate_remove_liquidity_rates(
    pool: &LiquidityPoolResource,
    coin_x: &CoinType,
    coin_y: &CoinType,
    lp_amount: &BigInt,
    lp_supply: &BigInt,
) -> Result<RemoveLiquidityRates, SwapError> {
    let (Some(reserve_x), Some(reserve_y)) = (pool.reserve_of(coin_x), pool.reserve_of(coin_y))
    else {
        return Err(SwapError::PoolNotFound(format!("{}, {}", coin_x, coin_y)));
    };

    if lp_amount.is_negative() || lp_amount > lp_supply {
        return Err(ProtocolError::InvalidAmount {
            message: format!("LP amount {} exceeds supply {}", lp_amount, lp_supply),
        }
        .into());
    }
    if lp_supply.is_zero() {
        return Err(SwapError::InsufficientLiquidity);
    }

    Ok(RemoveLiquidityRates {
        amount_x: lp_amount * reserve_x / lp_supply,
        amount_y: lp_amount * reserve_y / lp_supply,
    })
}

/// Fetch the pool reserves and LP supply together, then quote.
pub async fn fetch_remove_liquidity_rates<F>(
    fetcher: &F,
    options: &NetworkOptions,
    coin_x: &CoinType,
    coin_y: &CoinType,
    lp_amount: &BigInt,
) -> Result<RemoveLiquidityRates, SwapError>
where
    F: ResourceFetcher + ?Sized,
{
    let pair = sorted_pair(coin_x, coin_y);
    let (pool, supply) = futures::try_join!(
        fetch_pool_resource(fetcher, options, &pair),
        fetch_lp_coin_supply(fetcher, options, &pair),
    )?;
    let pool = pool.ok_or_else(|| SwapError::PoolNotFound(pair.to_string()))?;

    tracing::debug!("LP supply for {}: {}", pair, supply);
    calculate_remove_liquidity_rates(&pool, coin_x, coin_y, lp_amount, &supply)
}

pub fn create_remove_liquidity_payload(
    options: &NetworkOptions,
    params: &RemoveLiquidityParams,
) -> Result<EntryFunctionPayload, SwapError> {
    create_remove_liquidity_payload_at(options, params, unix_now())
}

/// Arguments: `[resource_account, lp_amount, min_x, min_y, deadline]`
pub fn create_remove_liquidity_payload_at(
    options: &NetworkOptions,
    params: &RemoveLiquidityParams,
    now_secs: u64,
) -> Result<EntryFunctionPayload, SwapError> {
    validate_slippage(&params.slippage)?;
    if !params.amount.is_positive() {
        return Err(ProtocolError::InvalidAmount {
            message: format!("LP amount must be positive, got {}", params.amount),
        }
        .into());
    }

    let min_x = apply_slippage(
        &params.amount_x_desired,
        &params.slippage,
        SlippageDirection::Minus,
    );
    let min_y = apply_slippage(
        &params.amount_y_desired,
        &params.slippage,
        SlippageDirection::Minus,
    );

    Ok(EntryFunctionPayload::new(
        entry_function(options, entry::REMOVE_LIQUIDITY),
        vec![
            params.coin_x.as_str().to_string(),
            params.coin_y.as_str().to_string(),
        ],
        vec![
            options.modules.resource_account_address.clone(),
            params.amount.to_string(),
            min_x.to_string(),
            min_y.to_string(),
            deadline_from(now_secs, params.deadline).to_string(),
        ],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use animeswap_core::number::d;

    fn big(v: u64) -> BigInt {
        BigInt::from(v)
    }

    #[test]
    fn test_remove_liquidity_rates() {
        let p = pool(COIN_A, COIN_B, 1_000, 3_001);
        let rates =
            calculate_remove_liquidity_rates(&p, &COIN_A.into(), &COIN_B.into(), &big(10), &big(100))
                .unwrap();
        assert_eq!(rates.amount_x, big(100));
        assert_eq!(rates.amount_y, big(300));

        // Caller orientation is kept
        let rates =
            calculate_remove_liquidity_rates(&p, &COIN_B.into(), &COIN_A.into(), &big(10), &big(100))
                .unwrap();
        assert_eq!(rates.amount_x, big(300));
        assert_eq!(rates.amount_y, big(100));

        let all =
            calculate_remove_liquidity_rates(&p, &COIN_A.into(), &COIN_B.into(), &big(100), &big(100))
                .unwrap();
        assert_eq!(all.amount_x, big(1_000));
        assert_eq!(all.amount_y, big(3_001));
    }

    #[test]
    fn test_remove_liquidity_errors() {
        let p = pool(COIN_A, COIN_B, 1_000, 1_000);
        let err =
            calculate_remove_liquidity_rates(&p, &COIN_A.into(), &COIN_B.into(), &big(101), &big(100))
                .unwrap_err();
        assert!(err.is_invalid_argument());

        let err =
            calculate_remove_liquidity_rates(&p, &COIN_A.into(), &COIN_B.into(), &big(0), &big(0))
                .unwrap_err();
        assert!(matches!(err, SwapError::InsufficientLiquidity));

        let err =
            calculate_remove_liquidity_rates(&p, &COIN_A.into(), &COIN_C.into(), &big(1), &big(100))
                .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_fetch_remove_liquidity_rates() {
        let mut fetcher = fetcher_with_pools(&[pool(COIN_A, COIN_B, 2_000, 8_000)], 30);
        insert_lp_supply(&mut fetcher, COIN_A, COIN_B, 4_000);

        let rates = fetch_remove_liquidity_rates(
            &fetcher,
            &options(),
            &COIN_B.into(),
            &COIN_A.into(),
            &big(1_000),
        )
        .await
        .unwrap();
        assert_eq!(rates.amount_x, big(2_000));
        assert_eq!(rates.amount_y, big(500));

        // Pool without a registered LP coin
        let fetcher = fetcher_with_pools(&[pool(COIN_A, COIN_B, 2_000, 8_000)], 30);
        let err = fetch_remove_liquidity_rates(
            &fetcher,
            &options(),
            &COIN_A.into(),
            &COIN_B.into(),
            &big(1),
        )
        .await
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_remove_liquidity_payload() {
        let opts = options();
        let params = RemoveLiquidityParams {
            coin_x: COIN_A.into(),
            coin_y: COIN_B.into(),
            amount: big(1_000),
            amount_x_desired: big(2_000),
            amount_y_desired: big(500),
            slippage: d("0.02").unwrap(),
            deadline: 5,
        };
        let payload = create_remove_liquidity_payload_at(&opts, &params, 100).unwrap();
        assert_eq!(
            payload.function,
            format!("{}::remove_liquidity_entry", opts.modules.scripts)
        );
        assert_eq!(payload.type_arguments, vec![COIN_A, COIN_B]);
        assert_eq!(
            payload.arguments,
            vec![
                opts.modules.resource_account_address.clone(),
                "1000".to_string(),
                "1960".to_string(),
                "490".to_string(),
                "400".to_string(),
            ]
        );

        let zero = RemoveLiquidityParams {
            amount: big(0),
            ..params
        };
        assert!(create_remove_liquidity_payload(&opts, &zero)
            .unwrap_err()
            .is_invalid_argument());
    }
}
