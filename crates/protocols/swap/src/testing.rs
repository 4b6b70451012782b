//! Shared fixtures for unit tests

use animeswap_core::{Network, NetworkOptions};
use aptos_node_client::MemoryFetcher;
use aptos_tx::{compose_coin_info, compose_lp, compose_lp_coin, compose_pair_info, compose_swap_pool_data};
use serde_json::json;

use crate::state::LiquidityPoolResource;

pub const APT: &str = "0x1::aptos_coin::AptosCoin";
pub const COIN_A: &str = "0xa::coin_a::A";
pub const COIN_B: &str = "0xb::coin_b::B";
pub const COIN_C: &str = "0xc::coin_c::C";
pub const COIN_D: &str = "0xd::coin_d::D";

pub fn options() -> NetworkOptions {
    NetworkOptions::for_network(Network::Mainnet)
}

pub fn pool(x: &str, y: &str, rx: u64, ry: u64) -> LiquidityPoolResource {
    LiquidityPoolResource::new(x, y, rx, ry)
}

/// `address::module::Struct` to the on-chain `TypeInfo` JSON shape
pub fn type_info_json(coin: &str) -> serde_json::Value {
    let mut parts = coin.splitn(3, "::");
    let address = parts.next().unwrap_or_default();
    let module = parts.next().unwrap_or_default();
    let name = parts.next().unwrap_or_default();
    json!({
        "account_address": address,
        "module_name": format!("0x{}", hex::encode(module)),
        "struct_name": format!("0x{}", hex::encode(name)),
    })
}

/// A fetcher holding the admin data, the pair registry and one pool resource per entry
pub fn fetcher_with_pools(pools: &[LiquidityPoolResource], swap_fee: u64) -> MemoryFetcher {
    let options = options();
    let modules = &options.modules;
    let mut fetcher = fetcher_without_fee(pools);
    fetcher.insert_json(
        modules.deployer_address.as_str(),
        compose_swap_pool_data(&modules.scripts),
        json!({
            "dev_fee": "5",
            "dev_fee_on": false,
            "fee_to": "0x0",
            "fee_to_setter": "0x0",
            "swap_fee": swap_fee.to_string(),
        }),
    );
    fetcher
}

/// Pair registry and pools, but no `AdminData`
pub fn fetcher_without_fee(pools: &[LiquidityPoolResource]) -> MemoryFetcher {
    let options = options();
    let modules = &options.modules;
    let mut fetcher = MemoryFetcher::new();

    let pair_list: Vec<serde_json::Value> = pools
        .iter()
        .map(|p| {
            json!({
                "coin_x": type_info_json(p.pair.coin_x.as_str()),
                "coin_y": type_info_json(p.pair.coin_y.as_str()),
                "lp_coin": type_info_json("0x16fe::LPCoinV1::LPCoin"),
            })
        })
        .collect();
    fetcher.insert_json(
        modules.deployer_address.as_str(),
        compose_pair_info(&modules.scripts),
        json!({ "pair_list": pair_list }),
    );

    for p in pools {
        insert_pool(&mut fetcher, p);
    }
    fetcher
}

pub fn insert_pool(fetcher: &mut MemoryFetcher, p: &LiquidityPoolResource) {
    let options = options();
    let modules = &options.modules;
    fetcher.insert_json(
        modules.resource_account_address.as_str(),
        compose_lp(&modules.scripts, p.pair.coin_x.as_str(), p.pair.coin_y.as_str()),
        json!({
            "coin_x_reserve": { "value": p.coin_x_reserve.to_string() },
            "coin_y_reserve": { "value": p.coin_y_reserve.to_string() },
            "k_last": "0",
            "last_block_timestamp": "1666000000",
        }),
    );
}

/// Register the LP coin of `x`/`y` with a tracked total supply
pub fn insert_lp_supply(fetcher: &mut MemoryFetcher, x: &str, y: &str, supply: u64) {
    let options = options();
    let modules = &options.modules;
    let lp_coin = compose_lp_coin(&modules.deployer_address, x, y);
    fetcher.insert_json(
        modules.deployer_address.as_str(),
        compose_coin_info(&modules.coin_info, &lp_coin),
        json!({
            "name": "AnimeSwapLPCoin",
            "symbol": "ANILP",
            "decimals": 8,
            "supply": { "vec": [{ "integer": { "vec": [{ "limit": "0", "value": supply.to_string() }] } }] }
        }),
    );
}
