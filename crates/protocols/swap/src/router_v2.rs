//! Route Enumeration and Sampled Simulation
//!
//! Enumerates every path between two coins on the pair registry alone, samples
//! a handful of candidates, fetches reserves only for the pools those
//! candidates touch, and simulates each sampled path once.

use std::collections::{HashMap, HashSet};

use animeswap_core::{CoinType, NetworkOptions, RouterConfig};
use aptos_node_client::ResourceFetcher;
use futures::future::try_join_all;
use num_bigint::BigInt;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::calculator::{calculate_input, calculate_output};
use crate::fetch::{fetch_pool_resource, get_all_pairs, require_swap_fee};
use crate::router::{make_trade, BestTrades};
use crate::state::{CoinPair, LiquidityPoolResource, Route, SwapError, Trade};

/// Reserves keyed by pool edge
pub type EdgeReserveMap = HashMap<CoinPair, LiquidityPoolResource>;

// ---------------------------------------------------------------------------
// Step 1: Route Enumeration
// ---------------------------------------------------------------------------

#[allow(clippy::too_many_arguments)]
fn collect_routes(
    pairs: &[CoinPair],
    current: &CoinType,
    coin_out: &CoinType,
    hops_left: usize,
    used: &mut [bool],
    used_count: usize,
    path: &mut Vec<usize>,
    routes: &mut Vec<Route>,
) {
    for (index, pair) in pairs.iter().enumerate() {
        if used[index] {
            continue;
        }
        let Some(next) = pair.other(current) else {
            continue;
        };

        path.push(index);
        if next == coin_out {
            routes.push(Route(path.iter().map(|&i| pairs[i].clone()).collect()));
        } else if hops_left > 1 && pairs.len() - used_count > 1 {
            used[index] = true;
            collect_routes(pairs, next, coin_out, hops_left - 1, used, used_count + 1, path, routes);
            used[index] = false;
        }
        path.pop();
    }
}

/// Every path from `coin_in` to `coin_out` of at most `max_hops` pools.
///
/// Structure only: reserves are not consulted. The order is deterministic for a
/// given pair list.
pub fn find_routes(
    pairs: &[CoinPair],
    coin_in: &CoinType,
    coin_out: &CoinType,
    max_hops: usize,
) -> Vec<Route> {
    let mut routes = Vec::new();
    if coin_in == coin_out || max_hops == 0 {
        return routes;
    }
    let mut used = vec![false; pairs.len()];
    let mut path = Vec::with_capacity(max_hops);
    collect_routes(pairs, coin_in, coin_out, max_hops, &mut used, 0, &mut path, &mut routes);
    routes
}

/// Fetch the pair registry and enumerate routes on it
pub async fn get_all_routes<F>(
    fetcher: &F,
    options: &NetworkOptions,
    coin_in: &CoinType,
    coin_out: &CoinType,
    max_hops: usize,
) -> Result<Vec<Route>, SwapError>
where
    F: ResourceFetcher + ?Sized,
{
    let pairs = get_all_pairs(fetcher, options).await?;
    let routes = find_routes(&pairs, coin_in, coin_out, max_hops);
    tracing::debug!("Enumerated {} routes {} -> {}", routes.len(), coin_in, coin_out);
    Ok(routes)
}

// ---------------------------------------------------------------------------
// Step 2: Candidate Sampling
// ---------------------------------------------------------------------------

/// Pick at most `max_count` routes to simulate.
///
/// Slots go to the previous winners' routes first, then single-hop routes;
/// what is left is filled uniformly at random without replacement.
pub fn sample_candidates_with_rng<R: Rng + ?Sized>(
    all: &[Route],
    best: Option<&Trade>,
    second: Option<&Trade>,
    max_count: usize,
    rng: &mut R,
) -> Vec<Route> {
    if all.len() <= max_count {
        return all.to_vec();
    }

    let mut picked: Vec<Route> = Vec::with_capacity(max_count);
    let previous = [best, second].into_iter().flatten().map(Trade::route);
    let direct = all.iter().filter(|r| r.hops() == 1).cloned();
    for route in previous.filter(|r| all.contains(r)).chain(direct) {
        if picked.len() == max_count {
            return picked;
        }
        if !picked.contains(&route) {
            picked.push(route);
        }
    }

    let remaining: Vec<&Route> = all.iter().filter(|r| !picked.contains(r)).collect();
    let slots = max_count - picked.len();
    picked.extend(remaining.choose_multiple(rng, slots).map(|r| (*r).clone()));
    picked
}

pub fn sample_candidates(
    all: &[Route],
    best: Option<&Trade>,
    second: Option<&Trade>,
    max_count: usize,
) -> Vec<Route> {
    sample_candidates_with_rng(all, best, second, max_count, &mut rand::thread_rng())
}

// ---------------------------------------------------------------------------
// Step 3: Reserve Fetching
// ---------------------------------------------------------------------------

/// Reserves for every distinct pool on `routes`, fetched concurrently.
///
/// A pool registered in the pair list but missing from the ledger is an error.
pub async fn fetch_reserves_for_routes<F>(
    fetcher: &F,
    options: &NetworkOptions,
    routes: &[Route],
) -> Result<EdgeReserveMap, SwapError>
where
    F: ResourceFetcher + ?Sized,
{
    let mut seen = HashSet::new();
    let pairs: Vec<&CoinPair> = routes
        .iter()
        .flat_map(|route| route.pairs())
        .filter(|pair| seen.insert(*pair))
        .collect();

    let fetched = try_join_all(pairs.iter().map(|pair| async move {
        fetch_pool_resource(fetcher, options, pair)
            .await?
            .ok_or_else(|| SwapError::PoolNotFound(pair.to_string()))
    }))
    .await?;

    tracing::debug!("Fetched reserves for {} pools", fetched.len());
    Ok(fetched
        .into_iter()
        .map(|pool| (pool.pair.clone(), pool))
        .collect())
}

// ---------------------------------------------------------------------------
// Step 4: Simulation
// ---------------------------------------------------------------------------

fn reserve_for<'m>(
    reserves: &'m EdgeReserveMap,
    pair: &CoinPair,
) -> Result<&'m LiquidityPoolResource, SwapError> {
    reserves
        .get(pair)
        .ok_or_else(|| SwapError::PoolNotFound(pair.to_string()))
}

/// Simulate each route spending exactly `amount_in`.
///
/// Routes with an empty pool or an invalid hop are dropped. A route edge with
/// no entry in `reserves` is an error.
pub fn simulate_exact_in(
    routes: &[Route],
    reserves: &EdgeReserveMap,
    coin_in: &CoinType,
    amount_in: &BigInt,
    fee: u64,
    max_results: usize,
) -> Result<Vec<Trade>, SwapError> {
    let mut best = BestTrades::new(max_results);

    'routes: for route in routes {
        let mut current = coin_in.clone();
        let mut pools = Vec::with_capacity(route.hops());
        let mut amounts = vec![amount_in.clone()];

        for pair in route.pairs() {
            let pool = reserve_for(reserves, pair)?;
            if !pool.is_tradable() {
                continue 'routes;
            }
            let Some((reserve_in, reserve_out)) = pool.reserves_for(&current) else {
                continue 'routes;
            };
            let Some(amount) = amounts
                .last()
                .and_then(|a| calculate_output(a, reserve_in, reserve_out, fee))
            else {
                tracing::trace!("Rejected hop through {}", pair);
                continue 'routes;
            };
            let Some(next) = pool.pair.other(&current).cloned() else {
                continue 'routes;
            };

            amounts.push(amount);
            pools.push(pool.clone());
            current = next;
        }

        best.insert(make_trade(coin_in, pools, amounts, fee));
    }

    Ok(best.into_vec())
}

/// Simulate each route receiving exactly `amount_out`, walking from the destination.
pub fn simulate_exact_out(
    routes: &[Route],
    reserves: &EdgeReserveMap,
    coin_in: &CoinType,
    coin_out: &CoinType,
    amount_out: &BigInt,
    fee: u64,
    max_results: usize,
) -> Result<Vec<Trade>, SwapError> {
    let mut best = BestTrades::new(max_results);

    'routes: for route in routes {
        let mut current = coin_out.clone();
        let mut pools = Vec::with_capacity(route.hops());
        let mut amounts = vec![amount_out.clone()];

        for pair in route.pairs().iter().rev() {
            let pool = reserve_for(reserves, pair)?;
            if !pool.is_tradable() {
                continue 'routes;
            }
            let Some((reserve_out, reserve_in)) = pool.reserves_for(&current) else {
                continue 'routes;
            };
            let Some(amount) = amounts
                .last()
                .and_then(|a| calculate_input(a, reserve_out, reserve_in, fee))
            else {
                tracing::trace!("Rejected hop through {}", pair);
                continue 'routes;
            };
            let Some(prev) = pool.pair.other(&current).cloned() else {
                continue 'routes;
            };

            amounts.push(amount);
            pools.push(pool.clone());
            current = prev;
        }

        pools.reverse();
        amounts.reverse();
        best.insert(make_trade(coin_in, pools, amounts, fee));
    }

    Ok(best.into_vec())
}

// ---------------------------------------------------------------------------
// Step 5: Ledger-Backed Routing
// ---------------------------------------------------------------------------

/// Enumerate, sample and fetch reserves for one routing call
async fn prepare<F>(
    fetcher: &F,
    options: &NetworkOptions,
    config: &RouterConfig,
    coin_in: &CoinType,
    coin_out: &CoinType,
    previous: &[Trade],
) -> Result<Option<(Vec<Route>, EdgeReserveMap, u64)>, SwapError>
where
    F: ResourceFetcher + ?Sized,
{
    let (routes, fee) = futures::try_join!(
        get_all_routes(fetcher, options, coin_in, coin_out, config.max_hops_v2),
        require_swap_fee(fetcher, options),
    )?;
    if routes.is_empty() {
        return Ok(None);
    }

    let candidates = sample_candidates(
        &routes,
        previous.first(),
        previous.get(1),
        config.max_candidates,
    );
    let reserves = fetch_reserves_for_routes(fetcher, options, &candidates).await?;
    Ok(Some((candidates, reserves, fee)))
}

/// Exact-input routing over sampled candidates.
///
/// `previous` holds earlier winners (best first); their routes are always re-simulated.
pub async fn route_exact_in_v2<F>(
    fetcher: &F,
    options: &NetworkOptions,
    config: &RouterConfig,
    coin_in: &CoinType,
    coin_out: &CoinType,
    amount_in: &BigInt,
    previous: &[Trade],
) -> Result<Vec<Trade>, SwapError>
where
    F: ResourceFetcher + ?Sized,
{
    let Some((candidates, reserves, fee)) =
        prepare(fetcher, options, config, coin_in, coin_out, previous).await?
    else {
        return Ok(Vec::new());
    };
    simulate_exact_in(
        &candidates,
        &reserves,
        coin_in,
        amount_in,
        fee,
        config.max_results_v2,
    )
}

/// Exact-output routing over sampled candidates
pub async fn route_exact_out_v2<F>(
    fetcher: &F,
    options: &NetworkOptions,
    config: &RouterConfig,
    coin_in: &CoinType,
    coin_out: &CoinType,
    amount_out: &BigInt,
    previous: &[Trade],
) -> Result<Vec<Trade>, SwapError>
where
    F: ResourceFetcher + ?Sized,
{
    let Some((candidates, reserves, fee)) =
        prepare(fetcher, options, config, coin_in, coin_out, previous).await?
    else {
        return Ok(Vec::new());
    };
    simulate_exact_out(
        &candidates,
        &reserves,
        coin_in,
        coin_out,
        amount_out,
        fee,
        config.max_results_v2,
    )
}
