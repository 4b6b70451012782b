//! Pool Discovery and Fetching
//!
//! Reads pool edges, reserves, fee settings and coin metadata from the
//! ledger through a [`ResourceFetcher`].

use animeswap_core::{AccountAddress, CoinType, NetworkOptions};
use aptos_node_client::{fetch_typed_resource, ResourceFetcher};
use aptos_tx::{
    compose_coin_info, compose_coin_store, compose_liquidity_pool, compose_lp, compose_lp_coin,
    compose_lp_coin_type, compose_pair_info, compose_swap_pool_data, extract_address_from_type,
    is_sorted_symbols, parse_type_pair, split_generic_args,
};
use num_bigint::BigInt;
use num_traits::Zero;

use crate::state::{
    CoinInfo, CoinPair, CoinStore, LiquidityPoolData, LiquidityPoolResource, LpCoinBalance,
    PairInfo, SwapError, SwapPoolData,
};

/// Swap fee (units of 1/10000) from the scripts module's `AdminData`.
///
/// `Ok(None)` when the resource is not published.
pub async fn fetch_swap_fee<F>(fetcher: &F, options: &NetworkOptions) -> Result<Option<u64>, SwapError>
where
    F: ResourceFetcher + ?Sized,
{
    let modules = &options.modules;
    let resource_type = compose_swap_pool_data(&modules.scripts);
    let Some(resource) = fetch_typed_resource::<SwapPoolData, F>(
        fetcher,
        &modules.deployer_address,
        &resource_type,
    )
    .await?
    else {
        return Ok(None);
    };

    let fee = u64::try_from(&resource.data.swap_fee).map_err(|_| SwapError::InvalidResource {
        resource_type,
        message: format!("swap_fee {} out of range", resource.data.swap_fee),
    })?;
    Ok(Some(fee))
}

/// Swap fee; a missing `AdminData` is a not-found error
pub async fn require_swap_fee<F>(fetcher: &F, options: &NetworkOptions) -> Result<u64, SwapError>
where
    F: ResourceFetcher + ?Sized,
{
    fetch_swap_fee(fetcher, options).await?.ok_or_else(|| {
        SwapError::resource_not_found(compose_swap_pool_data(&options.modules.scripts))
    })
}

/// Every registered pair, without reserves
pub async fn get_all_pairs<F>(fetcher: &F, options: &NetworkOptions) -> Result<Vec<CoinPair>, SwapError>
where
    F: ResourceFetcher + ?Sized,
{
    let modules = &options.modules;
    let resource_type = compose_pair_info(&modules.scripts);
    let resource =
        fetch_typed_resource::<PairInfo, F>(fetcher, &modules.deployer_address, &resource_type)
            .await?
            .ok_or_else(|| SwapError::resource_not_found(&resource_type))?;

    let pairs = resource
        .data
        .pair_list
        .iter()
        .map(|meta| {
            Ok(CoinPair::new(
                CoinType::new(meta.coin_x.to_type_string()?),
                CoinType::new(meta.coin_y.to_type_string()?),
            ))
        })
        .collect::<Result<Vec<_>, SwapError>>()?;

    tracing::info!("Discovered {} registered pairs", pairs.len());
    Ok(pairs)
}

/// Every pool held by the resource account, with reserves
pub async fn get_all_lp_coin_resources_with_admin<F>(
    fetcher: &F,
    options: &NetworkOptions,
) -> Result<Vec<LiquidityPoolResource>, SwapError>
where
    F: ResourceFetcher + ?Sized,
{
    let modules = &options.modules;
    let resources = fetcher
        .fetch_account_resources(&modules.resource_account_address)
        .await?
        .ok_or_else(|| SwapError::resource_not_found(&modules.resource_account_address))?;

    let pool_base = compose_liquidity_pool(&modules.scripts);
    let mut pools = Vec::new();
    for resource in &resources {
        let Some((coin_x, coin_y)) = parse_type_pair(&resource.resource_type, &pool_base) else {
            continue;
        };
        match resource.parse_data::<LiquidityPoolData>() {
            Ok(parsed) => pools.push(LiquidityPoolResource::new(
                CoinType::new(coin_x),
                CoinType::new(coin_y),
                parsed.data.coin_x_reserve.value,
                parsed.data.coin_y_reserve.value,
            )),
            Err(e) => {
                tracing::warn!("Failed to parse pool {}: {}", resource.resource_type, e);
            }
        }
    }

    tracing::info!(
        "Discovered {} pools across {} resources",
        pools.len(),
        resources.len()
    );
    Ok(pools)
}

/// Reserves of a pool stored under the pair's own orientation
pub async fn fetch_pool_resource<F>(
    fetcher: &F,
    options: &NetworkOptions,
    pair: &CoinPair,
) -> Result<Option<LiquidityPoolResource>, SwapError>
where
    F: ResourceFetcher + ?Sized,
{
    let modules = &options.modules;
    let resource_type = compose_lp(&modules.scripts, pair.coin_x.as_str(), pair.coin_y.as_str());
    let resource = fetch_typed_resource::<LiquidityPoolData, F>(
        fetcher,
        &modules.resource_account_address,
        &resource_type,
    )
    .await?;

    Ok(resource.map(|r| LiquidityPoolResource {
        pair: pair.clone(),
        coin_x_reserve: r.data.coin_x_reserve.value,
        coin_y_reserve: r.data.coin_y_reserve.value,
    }))
}

/// The pair in the orientation pools are published under
pub fn sorted_pair(coin_a: &CoinType, coin_b: &CoinType) -> CoinPair {
    if is_sorted_symbols(coin_a.as_str(), coin_b.as_str()) {
        CoinPair::new(coin_a.clone(), coin_b.clone())
    } else {
        CoinPair::new(coin_b.clone(), coin_a.clone())
    }
}

/// Pool between two coins in either order
pub async fn fetch_pool<F>(
    fetcher: &F,
    options: &NetworkOptions,
    coin_a: &CoinType,
    coin_b: &CoinType,
) -> Result<Option<LiquidityPoolResource>, SwapError>
where
    F: ResourceFetcher + ?Sized,
{
    fetch_pool_resource(fetcher, options, &sorted_pair(coin_a, coin_b)).await
}

pub async fn check_pair_exist<F>(
    fetcher: &F,
    options: &NetworkOptions,
    coin_a: &CoinType,
    coin_b: &CoinType,
) -> Result<bool, SwapError>
where
    F: ResourceFetcher + ?Sized,
{
    Ok(fetch_pool(fetcher, options, coin_a, coin_b).await?.is_some())
}

/// `CoinInfo` published at the coin's defining address
pub async fn fetch_coin_info<F>(
    fetcher: &F,
    options: &NetworkOptions,
    coin: &CoinType,
) -> Result<Option<CoinInfo>, SwapError>
where
    F: ResourceFetcher + ?Sized,
{
    let resource_type = compose_coin_info(&options.modules.coin_info, coin.as_str());
    let address = extract_address_from_type(coin.as_str());
    Ok(fetch_typed_resource::<CoinInfo, F>(fetcher, address, &resource_type)
        .await?
        .map(|r| r.data))
}

/// Circulating supply of a pair's LP coin
pub async fn fetch_lp_coin_supply<F>(
    fetcher: &F,
    options: &NetworkOptions,
    pair: &CoinPair,
) -> Result<BigInt, SwapError>
where
    F: ResourceFetcher + ?Sized,
{
    let lp_coin = compose_lp_coin(
        &options.modules.deployer_address,
        pair.coin_x.as_str(),
        pair.coin_y.as_str(),
    );
    let info = fetch_coin_info(fetcher, options, &CoinType::new(lp_coin.as_str()))
        .await?
        .ok_or_else(|| SwapError::resource_not_found(&lp_coin))?;

    info.total_supply()
        .cloned()
        .ok_or_else(|| SwapError::InvalidResource {
            resource_type: lp_coin,
            message: "supply is not tracked".to_string(),
        })
}

/// Balance of `coin` held by `address`; zero when no store is registered
pub async fn fetch_coin_balance<F>(
    fetcher: &F,
    options: &NetworkOptions,
    address: &AccountAddress,
    coin: &CoinType,
) -> Result<BigInt, SwapError>
where
    F: ResourceFetcher + ?Sized,
{
    let resource_type = compose_coin_store(&options.modules.coin_store, coin.as_str());
    Ok(
        fetch_typed_resource::<CoinStore, F>(fetcher, address.as_str(), &resource_type)
            .await?
            .map(|r| r.data.coin.value)
            .unwrap_or_else(BigInt::zero),
    )
}

/// Every non-empty LP coin balance held by `address`
pub async fn get_all_lp_coin_balances<F>(
    fetcher: &F,
    options: &NetworkOptions,
    address: &AccountAddress,
) -> Result<Vec<LpCoinBalance>, SwapError>
where
    F: ResourceFetcher + ?Sized,
{
    let Some(resources) = fetcher.fetch_account_resources(address.as_str()).await? else {
        return Ok(Vec::new());
    };

    let lp_coin_base = compose_lp_coin_type(&options.modules.deployer_address);
    let mut balances = Vec::new();
    for resource in &resources {
        let Some((store_base, args)) = split_generic_args(&resource.resource_type) else {
            continue;
        };
        if store_base != options.modules.coin_store || args.len() != 1 {
            continue;
        }
        let lp_coin = args[0];
        let Some((coin_x, coin_y)) = parse_type_pair(lp_coin, &lp_coin_base) else {
            continue;
        };

        let store = resource.parse_data::<CoinStore>()?;
        if store.data.coin.value.is_zero() {
            continue;
        }
        balances.push(LpCoinBalance {
            coin_x: CoinType::new(coin_x),
            coin_y: CoinType::new(coin_y),
            lp_coin: lp_coin.to_string(),
            value: store.data.coin.value,
        });
    }

    tracing::debug!("Found {} LP balances for {}", balances.len(), address);
    Ok(balances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use aptos_node_client::MemoryFetcher;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_swap_fee() {
        let fetcher = fetcher_with_pools(&[], 30);
        let fee = fetch_swap_fee(&fetcher, &options()).await.unwrap();
        assert_eq!(fee, Some(30));

        let empty = MemoryFetcher::new();
        assert_eq!(fetch_swap_fee(&empty, &options()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_require_swap_fee() {
        let fetcher = fetcher_with_pools(&[], 25);
        assert_eq!(require_swap_fee(&fetcher, &options()).await.unwrap(), 25);

        let err = require_swap_fee(&MemoryFetcher::new(), &options())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("AdminData"));
    }

    #[tokio::test]
    async fn test_get_all_pairs() {
        let pools = vec![pool(APT, COIN_B, 10, 20), pool(COIN_A, COIN_B, 1, 1)];
        let fetcher = fetcher_with_pools(&pools, 30);
        let pairs = get_all_pairs(&fetcher, &options()).await.unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].coin_x.as_str(), APT);
        assert_eq!(pairs[0].coin_y.as_str(), COIN_B);

        let err = get_all_pairs(&MemoryFetcher::new(), &options())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_all_lp_coin_resources_with_admin() {
        let pools = vec![pool(APT, COIN_B, 1_000, 2_000), pool(COIN_A, COIN_C, 0, 5)];
        let mut fetcher = fetcher_with_pools(&pools, 30);
        let opts = options();
        // Unrelated and malformed resources are skipped
        fetcher.insert_json(
            opts.modules.resource_account_address.as_str(),
            "0x1::account::Account",
            json!({ "sequence_number": "0" }),
        );
        fetcher.insert_json(
            opts.modules.resource_account_address.as_str(),
            compose_lp(&opts.modules.scripts, COIN_C, COIN_D),
            json!({ "unexpected": true }),
        );

        let found = get_all_lp_coin_resources_with_admin(&fetcher, &opts)
            .await
            .unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.contains(&pools[0]));
        assert!(found.contains(&pools[1]));
    }

    #[tokio::test]
    async fn test_fetch_pool_either_order() {
        let stored = pool(COIN_A, COIN_B, 100, 200);
        let fetcher = fetcher_with_pools(std::slice::from_ref(&stored), 30);
        let opts = options();

        let forward = fetch_pool(&fetcher, &opts, &COIN_A.into(), &COIN_B.into())
            .await
            .unwrap()
            .unwrap();
        let backward = fetch_pool(&fetcher, &opts, &COIN_B.into(), &COIN_A.into())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(forward, stored);
        assert_eq!(backward.coin_x_reserve, BigInt::from(100));

        assert!(!check_pair_exist(&fetcher, &opts, &COIN_A.into(), &COIN_C.into())
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_lp_coin_supply_and_balances() {
        let opts = options();
        let modules = &opts.modules;
        let mut fetcher = MemoryFetcher::new();
        let lp_coin = compose_lp_coin(&modules.deployer_address, COIN_A, COIN_B);

        fetcher.insert_json(
            modules.deployer_address.as_str(),
            compose_coin_info(&modules.coin_info, &lp_coin),
            json!({
                "name": "AnimeSwapLPCoin",
                "symbol": "ANILP",
                "decimals": 8,
                "supply": { "vec": [{ "integer": { "vec": [{ "limit": "0", "value": "5000" }] } }] }
            }),
        );
        let supply = fetch_lp_coin_supply(&fetcher, &opts, &CoinPair::new(COIN_A, COIN_B))
            .await
            .unwrap();
        assert_eq!(supply, BigInt::from(5_000));

        let user = AccountAddress::new("0xcafe");
        fetcher.insert_json(
            user.as_str(),
            compose_coin_store(&modules.coin_store, &lp_coin),
            json!({ "coin": { "value": "1200" }, "frozen": false }),
        );
        fetcher.insert_json(
            user.as_str(),
            compose_coin_store(&modules.coin_store, APT),
            json!({ "coin": { "value": "99" }, "frozen": false }),
        );

        let balances = get_all_lp_coin_balances(&fetcher, &opts, &user).await.unwrap();
        assert_eq!(balances.len(), 1);
        assert_eq!(balances[0].coin_x.as_str(), COIN_A);
        assert_eq!(balances[0].value, BigInt::from(1_200));

        let apt = fetch_coin_balance(&fetcher, &opts, &user, &APT.into()).await.unwrap();
        assert_eq!(apt, BigInt::from(99));
        let none = fetch_coin_balance(&fetcher, &opts, &user, &COIN_C.into()).await.unwrap();
        assert!(none.is_zero());
    }
}
