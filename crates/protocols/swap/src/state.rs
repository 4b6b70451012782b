//! AMM State Types
//!
//! Data structures for pool edges, pool snapshots, routes, trades and the raw
//! on-chain resources they are read from.

use std::fmt;
use std::hash::{Hash, Hasher};

use animeswap_core::number::{bigint_str, bigint_vec_str};
use animeswap_core::{CoinType, NodeError, ProtocolError, TxError};
use aptos_tx::TypeInfo;
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pool edge: the two coins a liquidity pool trades between.
///
/// `coin_x`/`coin_y` keep the orientation the ledger stores the pool under,
/// which decides which reserve is which. Equality and hashing ignore that
/// orientation: `{A, B}` and `{B, A}` name the same pool.
#[derive(Debug, Clone, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinPair {
    pub coin_x: CoinType,
    pub coin_y: CoinType,
}

impl CoinPair {
    pub fn new(coin_x: impl Into<CoinType>, coin_y: impl Into<CoinType>) -> Self {
        Self {
            coin_x: coin_x.into(),
            coin_y: coin_y.into(),
        }
    }

    pub fn contains(&self, coin: &CoinType) -> bool {
        self.coin_x == *coin || self.coin_y == *coin
    }

    /// The coin on the far side of the pool from `coin`
    pub fn other(&self, coin: &CoinType) -> Option<&CoinType> {
        if self.coin_x == *coin {
            Some(&self.coin_y)
        } else if self.coin_y == *coin {
            Some(&self.coin_x)
        } else {
            None
        }
    }

    /// Both coins in lexicographic order
    pub fn sorted(&self) -> (&CoinType, &CoinType) {
        if self.coin_x <= self.coin_y {
            (&self.coin_x, &self.coin_y)
        } else {
            (&self.coin_y, &self.coin_x)
        }
    }
}

impl PartialEq for CoinPair {
    fn eq(&self, other: &Self) -> bool {
        self.sorted() == other.sorted()
    }
}

impl Hash for CoinPair {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sorted().hash(state);
    }
}

impl fmt::Display for CoinPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.coin_x, self.coin_y)
    }
}

/// Snapshot of a pool edge and its reserves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityPoolResource {
    #[serde(flatten)]
    pub pair: CoinPair,
    #[serde(with = "bigint_str")]
    pub coin_x_reserve: BigInt,
    #[serde(with = "bigint_str")]
    pub coin_y_reserve: BigInt,
}

impl LiquidityPoolResource {
    pub fn new(
        coin_x: impl Into<CoinType>,
        coin_y: impl Into<CoinType>,
        coin_x_reserve: impl Into<BigInt>,
        coin_y_reserve: impl Into<BigInt>,
    ) -> Self {
        Self {
            pair: CoinPair::new(coin_x, coin_y),
            coin_x_reserve: coin_x_reserve.into(),
            coin_y_reserve: coin_y_reserve.into(),
        }
    }

    /// A pool with an empty side cannot be traded through
    pub fn is_tradable(&self) -> bool {
        !self.coin_x_reserve.is_zero() && !self.coin_y_reserve.is_zero()
    }

    /// `(reserve_in, reserve_out)` when swapping `coin_in` through this pool
    pub fn reserves_for(&self, coin_in: &CoinType) -> Option<(&BigInt, &BigInt)> {
        if self.pair.coin_x == *coin_in {
            Some((&self.coin_x_reserve, &self.coin_y_reserve))
        } else if self.pair.coin_y == *coin_in {
            Some((&self.coin_y_reserve, &self.coin_x_reserve))
        } else {
            None
        }
    }

    pub fn reserve_of(&self, coin: &CoinType) -> Option<&BigInt> {
        self.reserves_for(coin).map(|(own, _)| own)
    }
}

impl fmt::Display for LiquidityPoolResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pool <{}> | X: {} | Y: {}",
            self.pair, self.coin_x_reserve, self.coin_y_reserve
        )
    }
}

/// Ordered pool edges from a source coin to a destination coin
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Route(pub Vec<CoinPair>);

impl Route {
    pub fn hops(&self) -> usize {
        self.0.len()
    }

    pub fn pairs(&self) -> &[CoinPair] {
        &self.0
    }
}

/// Which side of a swap the caller fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeType {
    ExactIn,
    ExactOut,
}

/// Direction of a slippage bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlippageDirection {
    /// Lower bound on what is received
    Minus,
    /// Upper bound on what is paid
    Plus,
}

/// A route simulated with a concrete amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    /// Pool snapshots in route order
    pub coin_pair_list: Vec<LiquidityPoolResource>,
    /// Amounts at every step, input side first
    #[serde(with = "bigint_vec_str")]
    pub amount_list: Vec<BigInt>,
    /// Coins visited, source first
    pub coin_type_list: Vec<CoinType>,
    pub price_impact: BigDecimal,
}

impl Trade {
    pub fn hops(&self) -> usize {
        self.coin_pair_list.len()
    }

    pub fn amount_in(&self) -> Option<&BigInt> {
        self.amount_list.first()
    }

    pub fn amount_out(&self) -> Option<&BigInt> {
        self.amount_list.last()
    }

    /// The route this trade was simulated on
    pub fn route(&self) -> Route {
        Route(
            self.coin_pair_list
                .iter()
                .map(|pool| pool.pair.clone())
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Raw on-chain resources
// ---------------------------------------------------------------------------

/// `{scripts}::AdminData`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapPoolData {
    #[serde(with = "bigint_str")]
    pub swap_fee: BigInt,
    #[serde(default)]
    pub dev_fee: Option<String>,
    #[serde(default)]
    pub dev_fee_on: Option<bool>,
    #[serde(default)]
    pub fee_to: Option<String>,
    #[serde(default)]
    pub fee_to_setter: Option<String>,
}

/// `0x1::coin::Coin` value wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinValue {
    #[serde(with = "bigint_str")]
    pub value: BigInt,
}

/// `{scripts}::LiquidityPool<X, Y>`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidityPoolData {
    pub coin_x_reserve: CoinValue,
    pub coin_y_reserve: CoinValue,
    #[serde(default)]
    pub k_last: Option<String>,
    #[serde(default)]
    pub last_block_timestamp: Option<String>,
}

/// One registered pair in `{scripts}::PairInfo`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairMeta {
    pub coin_x: TypeInfo,
    pub coin_y: TypeInfo,
    pub lp_coin: TypeInfo,
}

/// `{scripts}::PairInfo`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairInfo {
    pub pair_list: Vec<PairMeta>,
}

/// `0x1::coin::CoinInfo<T>`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinInfo {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    #[serde(default)]
    pub supply: OptionalVec<CoinSupply>,
}

/// Move `Option<T>`, encoded by the ledger as `{ "vec": [] }` or `{ "vec": [T] }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionalVec<T> {
    pub vec: Vec<T>,
}

impl<T> Default for OptionalVec<T> {
    fn default() -> Self {
        Self { vec: Vec::new() }
    }
}

impl<T> OptionalVec<T> {
    pub fn get(&self) -> Option<&T> {
        self.vec.first()
    }
}

/// `0x1::optional_aggregator::OptionalAggregator`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinSupply {
    #[serde(default)]
    pub integer: OptionalVec<SupplyInteger>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplyInteger {
    #[serde(with = "bigint_str")]
    pub value: BigInt,
}

impl CoinInfo {
    /// Total supply when tracked as a plain integer
    pub fn total_supply(&self) -> Option<&BigInt> {
        self.supply
            .get()
            .and_then(|supply| supply.integer.get())
            .map(|integer| &integer.value)
    }
}

/// `0x1::coin::CoinStore<T>` (only the balance is read)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinStore {
    pub coin: CoinValue,
}

/// LP coin balance held by an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LpCoinBalance {
    pub coin_x: CoinType,
    pub coin_y: CoinType,
    pub lp_coin: String,
    #[serde(with = "bigint_str")]
    pub value: BigInt,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Swap protocol errors
#[derive(Debug, Error)]
pub enum SwapError {
    #[error("Pool not found: {0}")]
    PoolNotFound(String),

    #[error("Insufficient liquidity for swap")]
    InsufficientLiquidity,

    #[error("Invalid resource {resource_type}: {message}")]
    InvalidResource {
        resource_type: String,
        message: String,
    },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Tx(#[from] TxError),

    #[error("Node error: {0}")]
    Node(#[from] NodeError),
}

impl SwapError {
    /// A required on-chain resource does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PoolNotFound(_) | Self::Protocol(ProtocolError::ResourceNotFound { .. })
        )
    }

    /// The caller passed a bad argument
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            Self::Protocol(e) => e.is_invalid_argument(),
            Self::Tx(TxError::InvalidAddress { .. }) => true,
            _ => false,
        }
    }

    pub(crate) fn resource_not_found(resource_type: impl Into<String>) -> Self {
        Self::Protocol(ProtocolError::ResourceNotFound {
            resource_type: resource_type.into(),
        })
    }
}
