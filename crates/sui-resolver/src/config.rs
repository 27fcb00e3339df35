//! Resolver configuration.
//!
//! Environment variables:
//!
//! - `SUI_MVR_NETWORK` - `mainnet`, `testnet` or a raw chain identifier
//!   (unset: no network selected)
//! - `SUI_MVR_GRAPHQL_ENDPOINT` - GraphQL endpoint (default: per network,
//!   required for a raw chain identifier)
//! - `SUI_MVR_PROTOCOL` - `direct` (default) or `registry`
//! - `SUI_MVR_PAGE_SIZE` - requests per query (default: 10)
//! - `SUI_MVR_MAX_CONCURRENT_BATCHES` - batches in flight (default: 4)

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use sui_mvr_types::env_utils::{env_string, env_var_or};
use sui_transport::network::{
    chain_identifier, resolve_graphql_endpoint, MAINNET_CHAIN_ID, MAINNET_GRAPHQL,
    TESTNET_CHAIN_ID, TESTNET_GRAPHQL,
};

use crate::batch::DEFAULT_PAGE_SIZE;
use crate::resolution::ResolutionMap;

/// Default number of batches resolved concurrently.
pub const DEFAULT_MAX_CONCURRENT_BATCHES: usize = 4;

/// Move Registry core package on mainnet.
pub const MVR_CORE_PACKAGE: &str =
    "0x62c1f5b1cb9e3bfc3dd1f73c95066487b662048a6358eabdbf67f6cdeca6db4b";

/// Table object holding one dynamic field per registered name.
pub const MVR_REGISTRY_TABLE_ID: &str =
    "0xe8417c530cde59eddf6dfb760e8a0e3e2c6f17c69ddaab5a73dd6a6e65fc463b";

/// Settings for the registry + layout protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Object whose dynamic fields are the registry records.
    pub registry_table_id: String,
    /// Move type of the dynamic field key.
    pub name_type: String,
    /// Fetch every metadata object a record lists when no network is selected,
    /// even for names whose address is already known.
    pub eager_metadata_fetch: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            registry_table_id: MVR_REGISTRY_TABLE_ID.to_string(),
            name_type: format!("{}::name::Name", MVR_CORE_PACKAGE),
            eager_metadata_fetch: false,
        }
    }
}

/// Which remote protocol resolves a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Protocol {
    /// `packageByName` / `typeByName` queries.
    Direct,
    /// Registry records, metadata objects, then type layouts.
    Registry(RegistryConfig),
}

impl FromStr for Protocol {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "direct" => Ok(Protocol::Direct),
            "registry" => Ok(Protocol::Registry(RegistryConfig::default())),
            other => Err(anyhow!("unknown resolver protocol: {}", other)),
        }
    }
}

/// Static name → address and type → repr entries that skip remote resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overrides {
    #[serde(default)]
    pub packages: BTreeMap<String, String>,
    #[serde(default)]
    pub types: BTreeMap<String, String>,
}

impl Overrides {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read overrides {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parse overrides {}", path.display()))
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.types.is_empty()
    }

    pub fn to_resolution_map(&self) -> ResolutionMap {
        self.packages
            .iter()
            .chain(self.types.iter())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    pub protocol: Protocol,
    pub endpoint: String,
    /// Chain identifier used to pick per-network registry entries.
    pub network: Option<String>,
    pub page_size: usize,
    pub max_concurrent_batches: usize,
    pub overrides: Overrides,
}

impl ResolverConfig {
    fn for_network(endpoint: &str, chain_id: &str) -> Self {
        Self {
            protocol: Protocol::Direct,
            endpoint: endpoint.to_string(),
            network: Some(chain_id.to_string()),
            page_size: DEFAULT_PAGE_SIZE,
            max_concurrent_batches: DEFAULT_MAX_CONCURRENT_BATCHES,
            overrides: Overrides::default(),
        }
    }

    pub fn mainnet() -> Self {
        Self::for_network(MAINNET_GRAPHQL, MAINNET_CHAIN_ID)
    }

    pub fn testnet() -> Self {
        Self::for_network(TESTNET_GRAPHQL, TESTNET_CHAIN_ID)
    }

    /// Build a config from `SUI_MVR_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_env_with_endpoint(None)
    }

    /// Like [`Self::from_env`], but an explicit endpoint wins over the
    /// environment and the network default.
    pub fn from_env_with_endpoint(endpoint: Option<&str>) -> Result<Self> {
        let network = env_string("SUI_MVR_NETWORK");
        let endpoint = match endpoint {
            Some(endpoint) => endpoint.to_string(),
            None => resolve_graphql_endpoint(network.as_deref())?,
        };
        let protocol = match env_string("SUI_MVR_PROTOCOL") {
            Some(p) => p.parse()?,
            None => Protocol::Direct,
        };
        Ok(Self {
            protocol,
            endpoint,
            network: network.as_deref().map(chain_identifier),
            page_size: env_var_or("SUI_MVR_PAGE_SIZE", DEFAULT_PAGE_SIZE),
            max_concurrent_batches: env_var_or(
                "SUI_MVR_MAX_CONCURRENT_BATCHES",
                DEFAULT_MAX_CONCURRENT_BATCHES,
            ),
            overrides: Overrides::default(),
        })
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Select a network by name (`mainnet`, `testnet`) or chain id; `None` clears it.
    pub fn with_network(mut self, network: Option<&str>) -> Self {
        self.network = network.map(chain_identifier);
        self
    }

    /// Fetch every listed metadata object in the registry protocol.
    ///
    /// Only meaningful without a selected network: with one, metadata is
    /// fetched for records that list that network anyway.
    pub fn with_eager_metadata_fetch(mut self) -> Result<Self> {
        if let Some(network) = &self.network {
            return Err(anyhow!(
                "eager metadata fetch applies only when no network is selected (network {})",
                network
            ));
        }
        match &mut self.protocol {
            Protocol::Registry(registry) => registry.eager_metadata_fetch = true,
            Protocol::Direct => {
                return Err(anyhow!(
                    "eager metadata fetch applies only to the registry protocol"
                ))
            }
        }
        Ok(self)
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(anyhow!("page size must be at least 1"));
        }
        if self.max_concurrent_batches == 0 {
            return Err(anyhow!("max concurrent batches must be at least 1"));
        }
        if self.endpoint.trim().is_empty() {
            return Err(anyhow!("resolver endpoint is empty"));
        }
        Ok(())
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::mainnet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.protocol, Protocol::Direct);
        assert_eq!(config.network.as_deref(), Some(MAINNET_CHAIN_ID));
        assert!(config.endpoint.contains("mainnet"));
        config.validate().unwrap();

        let testnet = ResolverConfig::testnet();
        assert_eq!(testnet.network.as_deref(), Some(TESTNET_CHAIN_ID));
        assert!(testnet.endpoint.contains("testnet"));
    }

    #[test]
    fn test_protocol_from_str() {
        assert_eq!("direct".parse::<Protocol>().unwrap(), Protocol::Direct);
        assert!(matches!(
            "Registry".parse::<Protocol>().unwrap(),
            Protocol::Registry(RegistryConfig {
                eager_metadata_fetch: false,
                ..
            })
        ));
        assert!("graphql".parse::<Protocol>().is_err());
    }

    #[test]
    fn test_from_env_leaves_network_unselected() {
        std::env::remove_var("SUI_MVR_NETWORK");
        let config = ResolverConfig::from_env_with_endpoint(Some("http://localhost:9125")).unwrap();
        assert_eq!(config.network, None);
        assert_eq!(config.endpoint, "http://localhost:9125");
    }

    #[test]
    fn test_eager_metadata_fetch_requires_unselected_network() {
        let registry = Protocol::Registry(RegistryConfig::default());

        let err = ResolverConfig::mainnet()
            .with_protocol(registry.clone())
            .with_eager_metadata_fetch()
            .unwrap_err();
        assert!(err.to_string().contains(MAINNET_CHAIN_ID));

        let err = ResolverConfig::mainnet()
            .with_network(None)
            .with_eager_metadata_fetch()
            .unwrap_err();
        assert!(err.to_string().contains("registry protocol"));

        let config = ResolverConfig::mainnet()
            .with_network(None)
            .with_protocol(registry)
            .with_eager_metadata_fetch()
            .unwrap();
        assert!(matches!(
            config.protocol,
            Protocol::Registry(RegistryConfig {
                eager_metadata_fetch: true,
                ..
            })
        ));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(ResolverConfig::mainnet().with_page_size(0).validate().is_err());
    }

    #[test]
    fn test_overrides_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overrides.json");
        std::fs::write(
            &path,
            r#"{ "packages": { "core@dotmove": "0x1" }, "types": { "core@dotmove::m::T": "0x1::m::T" } }"#,
        )
        .unwrap();

        let overrides = Overrides::from_file(&path).unwrap();
        let map = overrides.to_resolution_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("core@dotmove"), Some("0x1"));

        std::fs::write(&path, "{ not json").unwrap();
        assert!(Overrides::from_file(&path).is_err());
    }
}
