//! Smart Router: Interleaved Multi-Hop Search
//!
//! Finds the best trades between two coins by walking the pool graph depth
//! first and simulating every hop as it is taken. Invalid hops prune the
//! branch immediately, so only feasible paths are ever extended.
//!
//! Edge exclusion is positional: a path never reuses a pool, but it may pass
//! through the same coin twice via different pools.

use std::cmp::Ordering;

use animeswap_core::{CoinType, NetworkOptions, RouterConfig};
use aptos_node_client::ResourceFetcher;
use num_bigint::BigInt;

use crate::calculator::{calculate_input, calculate_output, coin_type_list, price_impact};
use crate::fetch::{get_all_lp_coin_resources_with_admin, require_swap_fee};
use crate::state::{LiquidityPoolResource, SwapError, Trade, TradeType};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Bounds for one search call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_hops: usize,
    pub max_results: usize,
    /// Search nodes visited before giving up with what was found so far
    pub max_visits: usize,
}

impl From<&RouterConfig> for SearchLimits {
    fn from(config: &RouterConfig) -> Self {
        Self {
            max_hops: config.max_hops,
            max_results: config.max_results,
            max_visits: config.max_visits,
        }
    }
}

/// Size-bounded list of trades kept in ranking order.
#[derive(Debug, Clone)]
pub struct BestTrades {
    trades: Vec<Trade>,
    max_size: usize,
}

impl BestTrades {
    pub fn new(max_size: usize) -> Self {
        Self {
            trades: Vec::with_capacity(max_size + 1),
            max_size,
        }
    }

    /// Insert before the first trade that is not strictly better, then drop the tail.
    pub fn insert(&mut self, trade: Trade) {
        if self.max_size == 0 {
            return;
        }
        let position = self
            .trades
            .iter()
            .position(|existing| trade_comparator(existing, &trade) != Ordering::Less)
            .unwrap_or(self.trades.len());
        self.trades.insert(position, trade);
        self.trades.truncate(self.max_size);
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn as_slice(&self) -> &[Trade] {
        &self.trades
    }

    pub fn into_vec(self) -> Vec<Trade> {
        self.trades
    }
}

/// Ranking order: smaller input first; on equal input, larger output first;
/// then fewer hops.
pub fn trade_comparator(a: &Trade, b: &Trade) -> Ordering {
    a.amount_in()
        .cmp(&b.amount_in())
        .then_with(|| b.amount_out().cmp(&a.amount_out()))
        .then_with(|| a.hops().cmp(&b.hops()))
}

/// Assemble a trade from pools and amounts already in route order.
pub(crate) fn make_trade(
    coin_in: &CoinType,
    pools: Vec<LiquidityPoolResource>,
    amount_list: Vec<BigInt>,
    fee: u64,
) -> Trade {
    let coin_type_list = coin_type_list(coin_in, &pools);
    let price_impact = price_impact(coin_in, &pools, &amount_list, fee);
    Trade {
        coin_pair_list: pools,
        amount_list,
        coin_type_list,
        price_impact,
    }
}

// ---------------------------------------------------------------------------
// Step 1: Depth-First Search
// ---------------------------------------------------------------------------

struct Search<'a> {
    pools: &'a [LiquidityPoolResource],
    trade_type: TradeType,
    /// Coin the walk starts from
    start: &'a CoinType,
    /// Coin the search stops at: the destination for exact-in, the source for exact-out
    target: &'a CoinType,
    fee: u64,
    used: Vec<bool>,
    used_count: usize,
    path: Vec<usize>,
    amounts: Vec<BigInt>,
    visits: usize,
    max_visits: usize,
    best: BestTrades,
}

impl<'a> Search<'a> {
    fn new(
        pools: &'a [LiquidityPoolResource],
        trade_type: TradeType,
        start: &'a CoinType,
        target: &'a CoinType,
        amount: &BigInt,
        fee: u64,
        limits: &SearchLimits,
    ) -> Self {
        Self {
            pools,
            trade_type,
            start,
            target,
            fee,
            used: vec![false; pools.len()],
            used_count: 0,
            path: Vec::with_capacity(limits.max_hops),
            amounts: vec![amount.clone()],
            visits: 0,
            max_visits: limits.max_visits,
            best: BestTrades::new(limits.max_results),
        }
    }

    fn exhausted(&self) -> bool {
        self.visits >= self.max_visits
    }

    /// Amount on the far side of `pool` when `current` is the side we hold
    fn step(&self, pool: &LiquidityPoolResource, current: &CoinType, amount: &BigInt) -> Option<BigInt> {
        let (reserve_current, reserve_other) = pool.reserves_for(current)?;
        match self.trade_type {
            TradeType::ExactIn => calculate_output(amount, reserve_current, reserve_other, self.fee),
            TradeType::ExactOut => calculate_input(amount, reserve_current, reserve_other, self.fee),
        }
    }

    fn run(&mut self, current: &CoinType, hops_left: usize) {
        if self.exhausted() {
            return;
        }
        self.visits += 1;

        let amount = match self.amounts.last() {
            Some(amount) => amount.clone(),
            None => return,
        };

        let pools = self.pools;
        for (index, pool) in pools.iter().enumerate() {
            if self.used[index] {
                continue;
            }
            let Some(next) = pool.pair.other(current) else {
                continue;
            };
            if !pool.is_tradable() {
                continue;
            }
            let Some(next_amount) = self.step(pool, current, &amount) else {
                tracing::trace!("Rejected hop through {} for amount {}", pool.pair, amount);
                continue;
            };

            self.path.push(index);
            self.amounts.push(next_amount);

            if next == self.target {
                self.record();
            } else if hops_left > 1 && pools.len() - self.used_count > 1 {
                self.used[index] = true;
                self.used_count += 1;
                self.run(next, hops_left - 1);
                self.used[index] = false;
                self.used_count -= 1;
            }

            self.path.pop();
            self.amounts.pop();

            if self.exhausted() {
                return;
            }
        }
    }

    /// Turn the current path into a trade in route order
    fn record(&mut self) {
        let mut pools: Vec<LiquidityPoolResource> =
            self.path.iter().map(|&i| self.pools[i].clone()).collect();
        let mut amounts = self.amounts.clone();
        let coin_in = match self.trade_type {
            TradeType::ExactIn => self.start.clone(),
            TradeType::ExactOut => {
                pools.reverse();
                amounts.reverse();
                self.target.clone()
            }
        };
        let trade = make_trade(&coin_in, pools, amounts, self.fee);
        self.best.insert(trade);
    }

    fn finish(self) -> Vec<Trade> {
        if self.exhausted() {
            tracing::warn!(
                "Route search stopped after {} visits; results may be incomplete",
                self.visits
            );
        }
        self.best.into_vec()
    }
}

/// Best trades spending exactly `amount_in` of `coin_in`.
///
/// Returns an empty list when no feasible path exists within `max_hops`.
pub fn best_trade_exact_in(
    pools: &[LiquidityPoolResource],
    coin_in: &CoinType,
    coin_out: &CoinType,
    amount_in: &BigInt,
    fee: u64,
    limits: &SearchLimits,
) -> Vec<Trade> {
    if coin_in == coin_out || limits.max_hops == 0 {
        return Vec::new();
    }
    let mut search = Search::new(pools, TradeType::ExactIn, coin_in, coin_out, amount_in, fee, limits);
    search.run(coin_in, limits.max_hops);
    let trades = search.finish();
    tracing::debug!("Found {} exact-in trades {} -> {}", trades.len(), coin_in, coin_out);
    trades
}

/// Best trades receiving exactly `amount_out` of `coin_out`.
///
/// The walk starts at the destination and computes required inputs backwards.
pub fn best_trade_exact_out(
    pools: &[LiquidityPoolResource],
    coin_in: &CoinType,
    coin_out: &CoinType,
    amount_out: &BigInt,
    fee: u64,
    limits: &SearchLimits,
) -> Vec<Trade> {
    if coin_in == coin_out || limits.max_hops == 0 {
        return Vec::new();
    }
    let mut search = Search::new(pools, TradeType::ExactOut, coin_out, coin_in, amount_out, fee, limits);
    search.run(coin_out, limits.max_hops);
    let trades = search.finish();
    tracing::debug!("Found {} exact-out trades {} -> {}", trades.len(), coin_in, coin_out);
    trades
}

// ---------------------------------------------------------------------------
// Step 2: Ledger-Backed Routing
// ---------------------------------------------------------------------------

/// Pools with reserves and the swap fee, read concurrently
async fn load_graph<F>(
    fetcher: &F,
    options: &NetworkOptions,
) -> Result<(Vec<LiquidityPoolResource>, u64), SwapError>
where
    F: ResourceFetcher + ?Sized,
{
    futures::try_join!(
        get_all_lp_coin_resources_with_admin(fetcher, options),
        require_swap_fee(fetcher, options),
    )
}

pub async fn route_exact_in<F>(
    fetcher: &F,
    options: &NetworkOptions,
    config: &RouterConfig,
    coin_in: &CoinType,
    coin_out: &CoinType,
    amount_in: &BigInt,
) -> Result<Vec<Trade>, SwapError>
where
    F: ResourceFetcher + ?Sized,
{
    let (pools, fee) = load_graph(fetcher, options).await?;
    Ok(best_trade_exact_in(
        &pools,
        coin_in,
        coin_out,
        amount_in,
        fee,
        &SearchLimits::from(config),
    ))
}

pub async fn route_exact_out<F>(
    fetcher: &F,
    options: &NetworkOptions,
    config: &RouterConfig,
    coin_in: &CoinType,
    coin_out: &CoinType,
    amount_out: &BigInt,
) -> Result<Vec<Trade>, SwapError>
where
    F: ResourceFetcher + ?Sized,
{
    let (pools, fee) = load_graph(fetcher, options).await?;
    Ok(best_trade_exact_out(
        &pools,
        coin_in,
        coin_out,
        amount_out,
        fee,
        &SearchLimits::from(config),
    ))
}
