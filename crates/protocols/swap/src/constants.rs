//! AMM Constants
//!
//! Fee scale, numeric bounds and entry-function names for
//! AnimeSwap V1 pools.

/// Fee constants
pub mod fees {
    /// Fees are expressed in units of 1/10000
    pub const FEE_SCALE: u64 = 10_000;
}

/// Largest amount an entry function accepts (`u64::MAX`)
pub const U64_MAX: u64 = u64::MAX;

/// Longest route the swap entry functions support
pub const MAX_PAYLOAD_HOPS: usize = 3;

/// Entry function names in the scripts module
pub mod entry {
    pub const SWAP_EXACT_IN: [&str; 3] = [
        "swap_exact_coins_for_coins_entry",
        "swap_exact_coins_for_coins_2_pair_entry",
        "swap_exact_coins_for_coins_3_pair_entry",
    ];

    pub const SWAP_EXACT_OUT: [&str; 3] = [
        "swap_coins_for_exact_coins_entry",
        "swap_coins_for_exact_coins_2_pair_entry",
        "swap_coins_for_exact_coins_3_pair_entry",
    ];

    pub const ADD_LIQUIDITY: &str = "add_liquidity_entry";
    pub const REMOVE_LIQUIDITY: &str = "remove_liquidity_entry";
}
