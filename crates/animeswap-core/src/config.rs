//! Configuration types for AnimeSwap

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, Network, Result};

/// Ledger REST API connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Full node URL (e.g., "https://fullnode.mainnet.aptoslabs.com/v1")
    pub url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            url: "https://fullnode.mainnet.aptoslabs.com/v1".to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl NodeConfig {
    /// Default public full node for a network
    pub fn for_network(network: Network) -> Self {
        let url = match network {
            Network::Mainnet => "https://fullnode.mainnet.aptoslabs.com/v1",
            Network::Devnet => "https://fullnode.devnet.aptoslabs.com/v1",
            Network::Testnet => "https://fullnode.testnet.aptoslabs.com/v1",
        };
        Self {
            url: url.to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// On-chain locations of the swap contract and framework modules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleAddresses {
    /// `address::Module` holding the entry functions and pool structs
    pub scripts: String,
    pub coin_info: String,
    pub coin_store: String,
    /// Account holding `SwapPoolData` and `PairInfo`
    pub deployer_address: String,
    /// Account holding every `LiquidityPool<X, Y>`
    pub resource_account_address: String,
}

/// Per-network contract options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkOptions {
    pub native_coin: String,
    pub modules: ModuleAddresses,
}

const DEPLOYER: &str = "0x16fe2df00ea7dde4a63409201f7f4e536bde7bb7335526a35d05111e68aa322c";
const RESOURCE_ACCOUNT: &str =
    "0x796900ebe1a1a54ff9e932f19c548f5c1af5c6e7d34965857ac2f7b1d1ab2cbf";

impl NetworkOptions {
    pub fn for_network(network: Network) -> Self {
        let scripts_module = match network {
            Network::Mainnet | Network::Devnet => "AnimeSwapPoolV1",
            Network::Testnet => "AnimeSwapPoolV1f1",
        };
        Self {
            native_coin: crate::constants::APTOS_COIN.to_string(),
            modules: ModuleAddresses {
                scripts: format!("{}::{}", DEPLOYER, scripts_module),
                coin_info: crate::constants::COIN_INFO.to_string(),
                coin_store: crate::constants::COIN_STORE.to_string(),
                deployer_address: DEPLOYER.to_string(),
                resource_account_address: RESOURCE_ACCOUNT.to_string(),
            },
        }
    }
}

/// Routing search limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Hop limit for the interleaved search
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,

    /// Best-list size for the interleaved search
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Hop limit for route enumeration
    #[serde(default = "default_max_hops_v2")]
    pub max_hops_v2: usize,

    /// Best-list size for enumerate-then-sample routing
    #[serde(default = "default_max_results_v2")]
    pub max_results_v2: usize,

    /// Number of enumerated routes sampled for simulation
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,

    /// Upper bound on search nodes visited per call
    #[serde(default = "default_max_visits")]
    pub max_visits: usize,
}

fn default_max_hops() -> usize {
    3
}

fn default_max_results() -> usize {
    3
}

fn default_max_hops_v2() -> usize {
    2
}

fn default_max_results_v2() -> usize {
    5
}

fn default_max_candidates() -> usize {
    5
}

fn default_max_visits() -> usize {
    200_000
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_hops: default_max_hops(),
            max_results: default_max_results(),
            max_hops_v2: default_max_hops_v2(),
            max_results_v2: default_max_results_v2(),
            max_candidates: default_max_candidates(),
            max_visits: default_max_visits(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Ledger connection settings
    #[serde(default)]
    pub node: NodeConfig,

    /// Network (mainnet, devnet or testnet)
    pub network: Network,

    /// Routing limits
    #[serde(default)]
    pub router: RouterConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            node: NodeConfig::default(),
            network: Network::Mainnet,
            router: RouterConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn network_options(&self) -> NetworkOptions {
        NetworkOptions::for_network(self.network)
    }
}
