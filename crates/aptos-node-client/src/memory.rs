//! In-memory resource store
//!
//! Serves resources from a snapshot instead of a live node. A snapshot is a JSON
//! object mapping account addresses to the array returned by
//! `GET /accounts/{address}/resources`.

use std::collections::HashMap;

use animeswap_core::NodeError;
use async_trait::async_trait;

use crate::{AccountResource, ResourceFetcher, Result};

#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    accounts: HashMap<String, Vec<AccountResource>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a resource under an account, replacing any resource of the same type
    pub fn insert(&mut self, address: impl Into<String>, resource: AccountResource) {
        let resources = self.accounts.entry(address.into()).or_default();
        resources.retain(|r| r.resource_type != resource.resource_type);
        resources.push(resource);
    }

    /// Convenience for building fixtures from raw JSON data
    pub fn insert_json(
        &mut self,
        address: impl Into<String>,
        resource_type: impl Into<String>,
        data: serde_json::Value,
    ) {
        self.insert(
            address,
            AccountResource {
                resource_type: resource_type.into(),
                data,
            },
        );
    }

    pub fn from_snapshot_json(raw: &str) -> Result<Self> {
        let accounts: HashMap<String, Vec<AccountResource>> = serde_json::from_str(raw)
            .map_err(|e| NodeError::ParseError(format!("snapshot: {}", e)))?;
        Ok(Self { accounts })
    }

    pub fn resource_count(&self) -> usize {
        self.accounts.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl ResourceFetcher for MemoryFetcher {
    async fn fetch_account_resource(
        &self,
        address: &str,
        resource_type: &str,
    ) -> Result<Option<AccountResource>> {
        Ok(self.accounts.get(address).and_then(|resources| {
            resources
                .iter()
                .find(|r| r.resource_type == resource_type)
                .cloned()
        }))
    }

    async fn fetch_account_resources(
        &self,
        address: &str,
    ) -> Result<Option<Vec<AccountResource>>> {
        Ok(self.accounts.get(address).cloned())
    }
}
