//! Move type-string composition and parsing
//!
//! Resources are addressed by strings of the form
//! `address::module::Struct<Arg1, Arg2>`. Generic arguments are separated by
//! `", "`, the ledger's canonical formatting.

use animeswap_core::TxError;
use serde::{Deserialize, Serialize};

const LP_COIN_MODULE: &str = "LPCoinV1";
const LP_COIN_STRUCT: &str = "LPCoin";
const LIQUIDITY_POOL_STRUCT: &str = "LiquidityPool";
const ADMIN_DATA_STRUCT: &str = "AdminData";
const PAIR_INFO_STRUCT: &str = "PairInfo";

/// Join `prefix::part::part` and append `<generics>` when present
pub fn compose_type(prefix: &str, parts: &[&str], generics: &[&str]) -> String {
    let mut out = String::from(prefix);
    for part in parts {
        out.push_str("::");
        out.push_str(part);
    }
    if !generics.is_empty() {
        out.push('<');
        out.push_str(&generics.join(", "));
        out.push('>');
    }
    out
}

/// `{scripts}::LiquidityPool<X, Y>`
pub fn compose_lp(scripts: &str, coin_x: &str, coin_y: &str) -> String {
    compose_type(scripts, &[LIQUIDITY_POOL_STRUCT], &[coin_x, coin_y])
}

/// `{scripts}::LiquidityPool`, the un-parameterised pool struct
pub fn compose_liquidity_pool(scripts: &str) -> String {
    compose_type(scripts, &[LIQUIDITY_POOL_STRUCT], &[])
}

/// `{deployer}::LPCoinV1::LPCoin<X, Y>`
pub fn compose_lp_coin(deployer: &str, coin_x: &str, coin_y: &str) -> String {
    compose_type(deployer, &[LP_COIN_MODULE, LP_COIN_STRUCT], &[coin_x, coin_y])
}

/// `{deployer}::LPCoinV1::LPCoin`
pub fn compose_lp_coin_type(deployer: &str) -> String {
    compose_type(deployer, &[LP_COIN_MODULE, LP_COIN_STRUCT], &[])
}

pub fn compose_swap_pool_data(scripts: &str) -> String {
    compose_type(scripts, &[ADMIN_DATA_STRUCT], &[])
}

pub fn compose_pair_info(scripts: &str) -> String {
    compose_type(scripts, &[PAIR_INFO_STRUCT], &[])
}

/// `{coin_store}<T>`
pub fn compose_coin_store(coin_store: &str, coin_type: &str) -> String {
    compose_type(coin_store, &[], &[coin_type])
}

/// `{coin_info}<T>`
pub fn compose_coin_info(coin_info: &str, coin_type: &str) -> String {
    compose_type(coin_info, &[], &[coin_type])
}

/// Account address that published a type (`0x1::coin::CoinInfo<..>` -> `0x1`)
pub fn extract_address_from_type(type_string: &str) -> &str {
    type_string.split("::").next().unwrap_or(type_string)
}

/// Split `Base<A, B<C, D>>` into `("Base", ["A", "B<C, D>"])`.
///
/// Only top-level commas separate arguments. A type without generics yields an
/// empty argument list. Returns `None` on unbalanced brackets.
pub fn split_generic_args(type_string: &str) -> Option<(&str, Vec<&str>)> {
    let type_string = type_string.trim();
    let Some(open) = type_string.find('<') else {
        if type_string.contains('>') {
            return None;
        }
        return Some((type_string, Vec::new()));
    };
    if !type_string.ends_with('>') {
        return None;
    }

    let base = &type_string[..open];
    let inner = &type_string[open + 1..type_string.len() - 1];

    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                args.push(inner[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    let last = inner[start..].trim();
    if last.is_empty() {
        return None;
    }
    args.push(last);
    Some((base, args))
}

/// Parse `{expected_base}<X, Y>` into `(X, Y)`
pub fn parse_type_pair(type_string: &str, expected_base: &str) -> Option<(String, String)> {
    let (base, args) = split_generic_args(type_string)?;
    if base != expected_base || args.len() != 2 {
        return None;
    }
    Some((args[0].to_string(), args[1].to_string()))
}

/// Whether `(coin_x, coin_y)` is already in the pool's canonical order
pub fn is_sorted_symbols(coin_x: &str, coin_y: &str) -> bool {
    coin_x < coin_y
}

/// On-chain `0x1::type_info::TypeInfo`; module and struct names are hex-encoded UTF-8
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    pub account_address: String,
    pub module_name: String,
    pub struct_name: String,
}

impl TypeInfo {
    pub fn to_type_string(&self) -> Result<String, TxError> {
        let module = decode_hex_name(&self.module_name)?;
        let name = decode_hex_name(&self.struct_name)?;
        Ok(compose_type(&self.account_address, &[&module, &name], &[]))
    }
}

fn decode_hex_name(raw: &str) -> Result<String, TxError> {
    let invalid = || TxError::InvalidType {
        type_string: raw.to_string(),
    };
    let bytes = hex::decode(raw.strip_prefix("0x").unwrap_or(raw)).map_err(|_| invalid())?;
    String::from_utf8(bytes).map_err(|_| invalid())
}
