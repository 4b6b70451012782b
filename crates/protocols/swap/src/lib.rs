//! AnimeSwap V1 Protocol Implementation
//!
//! Reads pools from the ledger, prices trades across them with the
//! constant-product formula, searches multi-hop routes and assembles the
//! unsigned entry-function payloads a wallet signs.

pub mod calculator;
pub mod constants;
pub mod direct_swap;
pub mod fetch;
pub mod lp_deposit;
pub mod lp_redeem;
pub mod router;
pub mod router_v2;
pub mod state;
pub mod tx_builder;

#[cfg(test)]
mod testing;

// Re-exports
pub use calculator::{apply_slippage, calculate_input, calculate_output, price_impact, quote};
pub use constants::{entry, fees, MAX_PAYLOAD_HOPS, U64_MAX};
pub use direct_swap::{
    calculate_swap_rates, create_swap_payload, fetch_swap_rates, SwapPayloadParams, SwapRates,
};
pub use fetch::{
    check_pair_exist, fetch_coin_balance, fetch_coin_info, fetch_lp_coin_supply, fetch_pool,
    fetch_pool_resource, fetch_swap_fee, get_all_lp_coin_balances,
    get_all_lp_coin_resources_with_admin, get_all_pairs, require_swap_fee,
};
pub use lp_deposit::{
    calculate_add_liquidity_rates, create_add_liquidity_payload, fetch_add_liquidity_rates,
    AddLiquidityParams, AddLiquidityRates,
};
pub use lp_redeem::{
    calculate_remove_liquidity_rates, create_remove_liquidity_payload,
    fetch_remove_liquidity_rates, RemoveLiquidityParams, RemoveLiquidityRates,
};
pub use router::{
    best_trade_exact_in, best_trade_exact_out, route_exact_in, route_exact_out, BestTrades,
    SearchLimits,
};
pub use router_v2::{route_exact_in_v2, route_exact_out_v2, EdgeReserveMap};
pub use state::{
    CoinPair, LiquidityPoolResource, LpCoinBalance, Route, SlippageDirection, SwapError, Trade,
    TradeType,
};
pub use tx_builder::{build_swap_payload, build_swap_payload_with_deadline, SwapBuildResult, SwapPayloadSummary};
