//! aptos-node-client: Read-only access to Aptos account resources
//!
//! This crate provides the [`ResourceFetcher`] seam used by the swap protocol
//! crate, a reqwest-backed [`NodeClient`] implementation, and an in-memory
//! [`MemoryFetcher`] for snapshots and tests.
//!
//! A missing resource (HTTP 404) is not an error: fetchers return `Ok(None)`.

pub mod memory;

use std::time::Duration;

use animeswap_core::{NodeConfig, NodeError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub use memory::MemoryFetcher;

/// Result type for node client operations
pub type Result<T> = std::result::Result<T, NodeError>;

/// A Move resource stored under an account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountResource<T = serde_json::Value> {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub data: T,
}

impl AccountResource<serde_json::Value> {
    /// Deserialize the raw `data` payload into a concrete resource struct
    pub fn parse_data<T: DeserializeOwned>(&self) -> Result<AccountResource<T>> {
        let data = serde_json::from_value(self.data.clone()).map_err(|e| {
            NodeError::ParseError(format!("{}: {}", self.resource_type, e))
        })?;
        Ok(AccountResource {
            resource_type: self.resource_type.clone(),
            data,
        })
    }
}

/// Source of on-chain account resources
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Fetch a single resource; `Ok(None)` when the account does not hold it
    async fn fetch_account_resource(
        &self,
        address: &str,
        resource_type: &str,
    ) -> Result<Option<AccountResource>>;

    /// Fetch every resource held by an account; `Ok(None)` when the account does not exist
    async fn fetch_account_resources(&self, address: &str)
        -> Result<Option<Vec<AccountResource>>>;
}

/// Fetch a resource and deserialize its data
pub async fn fetch_typed_resource<T, F>(
    fetcher: &F,
    address: &str,
    resource_type: &str,
) -> Result<Option<AccountResource<T>>>
where
    T: DeserializeOwned,
    F: ResourceFetcher + ?Sized,
{
    match fetcher.fetch_account_resource(address, resource_type).await? {
        Some(resource) => resource.parse_data().map(Some),
        None => Ok(None),
    }
}

/// Aptos full node REST client
#[derive(Debug, Clone)]
pub struct NodeClient {
    http: reqwest::Client,
    config: NodeConfig,
}

impl NodeClient {
    pub fn new(config: NodeConfig) -> Result<Self> {
        reqwest::Url::parse(&config.url).map_err(|e| NodeError::Unreachable {
            url: format!("{}: {}", config.url, e),
        })?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| NodeError::Unreachable {
                url: format!("{}: {}", config.url, e),
            })?;
        Ok(Self { http, config })
    }

    /// Get the current node configuration
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    /// Build `{base}/{segments...}` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url> {
        build_endpoint(&self.config.url, segments)
    }

    /// GET a JSON document; a 404 maps to `Ok(None)`
    async fn get_json<T: DeserializeOwned>(&self, url: reqwest::Url) -> Result<Option<T>> {
        let request = async {
            let response = self
                .http
                .get(url.clone())
                .send()
                .await
                .map_err(|e| classify_transport_error(&self.config.url, e))?;

            let status = response.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                return Ok(None);
            }
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(NodeError::ApiError {
                    message: format!("{} returned {}: {}", url.path(), status, body),
                });
            }

            response
                .json::<T>()
                .await
                .map(Some)
                .map_err(|e| NodeError::ParseError(e.to_string()))
        };
        timed_request(self.timeout(), request).await
    }
}

#[async_trait]
impl ResourceFetcher for NodeClient {
    async fn fetch_account_resource(
        &self,
        address: &str,
        resource_type: &str,
    ) -> Result<Option<AccountResource>> {
        let url = self.endpoint(&["accounts", address, "resource", resource_type])?;
        tracing::debug!(address, resource_type, "Fetching account resource");
        self.get_json(url).await
    }

    async fn fetch_account_resources(
        &self,
        address: &str,
    ) -> Result<Option<Vec<AccountResource>>> {
        let url = self.endpoint(&["accounts", address, "resources"])?;
        tracing::debug!(address, "Fetching all account resources");
        self.get_json(url).await
    }
}

fn build_endpoint(base: &str, segments: &[&str]) -> Result<reqwest::Url> {
    let mut url = reqwest::Url::parse(base).map_err(|e| NodeError::Unreachable {
        url: format!("{}: {}", base, e),
    })?;
    url.path_segments_mut()
        .map_err(|_| NodeError::Unreachable {
            url: format!("{}: not a base URL", base),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn classify_transport_error(base: &str, err: reqwest::Error) -> NodeError {
    if err.is_connect() {
        NodeError::Unreachable {
            url: format!("{}: {}", base, err),
        }
    } else {
        NodeError::ApiError {
            message: err.to_string(),
        }
    }
}

/// Wrap a node API call with a timeout.
async fn timed_request<T>(
    timeout: Duration,
    fut: impl std::future::Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| NodeError::Timeout {
            secs: timeout.as_secs(),
        })?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let client = NodeClient::new(NodeConfig::default()).unwrap();
        assert_eq!(
            client.config().url,
            "https://fullnode.mainnet.aptoslabs.com/v1"
        );
        assert_eq!(client.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_url_rejected() {
        let config = NodeConfig {
            url: "not a url".to_string(),
            timeout_secs: 5,
        };
        assert!(matches!(
            NodeClient::new(config),
            Err(NodeError::Unreachable { .. })
        ));
    }

    #[test]
    fn test_resource_endpoint_encoding() {
        let url = build_endpoint(
            "https://fullnode.mainnet.aptoslabs.com/v1/",
            &[
                "accounts",
                "0x1",
                "resource",
                "0x1::coin::CoinInfo<0x1::aptos_coin::AptosCoin>",
            ],
        )
        .unwrap();
        let s = url.as_str();
        assert!(s.starts_with("https://fullnode.mainnet.aptoslabs.com/v1/accounts/0x1/resource/"));
        assert!(s.contains("CoinInfo%3C0x1::aptos_coin::AptosCoin%3E"));
        assert!(!s.contains("v1//accounts"));
    }

    #[test]
    fn test_parse_resource_data() {
        #[derive(Deserialize)]
        struct Coin {
            value: String,
        }

        let raw: AccountResource = serde_json::from_value(serde_json::json!({
            "type": "0x1::coin::CoinStore<0x1::aptos_coin::AptosCoin>",
            "data": { "value": "100" }
        }))
        .unwrap();
        let typed: AccountResource<Coin> = raw.parse_data().unwrap();
        assert_eq!(typed.data.value, "100");

        let err = raw.parse_data::<Vec<u8>>().unwrap_err();
        assert!(matches!(err, NodeError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_timed_request_timeout() {
        let result: Result<()> = timed_request(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(NodeError::Timeout { .. })));
    }
}
