//! Core type definitions for AnimeSwap

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fully qualified Move type of a fungible asset, e.g. `0x1::aptos_coin::AptosCoin`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoinType(pub String);

impl CoinType {
    pub fn new(coin_type: impl Into<String>) -> Self {
        Self(coin_type.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CoinType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Ledger account address (`0x`-prefixed hex)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountAddress(pub String);

impl AccountAddress {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    /// Parse and normalise an address: lowercase, `0x`-prefixed, at most 64 hex digits.
    pub fn parse(addr: &str) -> Option<Self> {
        let hex = addr.strip_prefix("0x").unwrap_or(addr);
        if hex.is_empty() || hex.len() > 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        Some(Self(format!("0x{}", hex.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Network type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Devnet,
    Testnet,
}

impl Network {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Devnet => "devnet",
            Self::Testnet => "testnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "devnet" => Ok(Self::Devnet),
            "testnet" => Ok(Self::Testnet),
            other => Err(format!("unknown network: {}", other)),
        }
    }
}

/// Constants
pub mod constants {
    /// Native gas coin
    pub const APTOS_COIN: &str = "0x1::aptos_coin::AptosCoin";

    /// Framework coin module resources
    pub const COIN_INFO: &str = "0x1::coin::CoinInfo";
    pub const COIN_STORE: &str = "0x1::coin::CoinStore";

    /// Largest value representable by the ledger's `u64`
    pub const U64_MAX: u64 = u64::MAX;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_address_parse() {
        let addr = AccountAddress::parse("0xABCdef").unwrap();
        assert_eq!(addr.as_str(), "0xabcdef");

        let addr = AccountAddress::parse("1").unwrap();
        assert_eq!(addr.as_str(), "0x1");

        assert!(AccountAddress::parse("0x").is_none());
        assert!(AccountAddress::parse("0xzz").is_none());
        assert!(AccountAddress::parse(&format!("0x{}", "a".repeat(65))).is_none());
    }

    #[test]
    fn test_network_display() {
        assert_eq!(Network::Mainnet.as_str(), "mainnet");
        assert_eq!(Network::Devnet.to_string(), "devnet");
        assert_eq!("Testnet".parse::<Network>().unwrap(), Network::Testnet);
        assert!("localnet".parse::<Network>().is_err());
    }

    #[test]
    fn test_coin_type_ordering() {
        let a = CoinType::from("0x1::aptos_coin::AptosCoin");
        let b = CoinType::from("0xabc::usdt::USDT");
        assert!(a < b);
        assert_eq!(a.to_string(), "0x1::aptos_coin::AptosCoin");
    }
}
