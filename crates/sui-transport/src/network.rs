use anyhow::{anyhow, Result};
use sui_mvr_types::env_utils::env_string;

pub const MAINNET_GRAPHQL: &str = "https://graphql.mainnet.sui.io/graphql";
pub const TESTNET_GRAPHQL: &str = "https://graphql.testnet.sui.io/graphql";

pub const MAINNET_CHAIN_ID: &str = "35834a8a";
pub const TESTNET_CHAIN_ID: &str = "4c78adac";

pub fn infer_network_from_url(url: &str) -> Option<&'static str> {
    let lower = url.to_lowercase();
    if lower.contains("testnet") {
        Some("testnet")
    } else if lower.contains("mainnet") {
        Some("mainnet")
    } else {
        None
    }
}

/// Public GraphQL endpoint of a named network. Raw chain identifiers have none.
pub fn graphql_endpoint(network: &str) -> Option<&'static str> {
    match network.to_lowercase().as_str() {
        "mainnet" => Some(MAINNET_GRAPHQL),
        "testnet" => Some(TESTNET_GRAPHQL),
        _ => None,
    }
}

/// Chain identifier for a network name; anything else is taken as a raw chain id.
pub fn chain_identifier(network: &str) -> String {
    match network.to_lowercase().as_str() {
        "mainnet" => MAINNET_CHAIN_ID.to_string(),
        "testnet" => TESTNET_CHAIN_ID.to_string(),
        _ => network.to_string(),
    }
}

/// Endpoint selection: `SUI_MVR_GRAPHQL_ENDPOINT` wins, then the network's
/// public endpoint (mainnet when no network is given).
///
/// A raw chain identifier has no public endpoint, so one must be configured.
pub fn resolve_graphql_endpoint(network: Option<&str>) -> Result<String> {
    if let Some(endpoint) = env_string("SUI_MVR_GRAPHQL_ENDPOINT") {
        return Ok(endpoint);
    }
    match network {
        None => Ok(MAINNET_GRAPHQL.to_string()),
        Some(network) => graphql_endpoint(network).map(String::from).ok_or_else(|| {
            anyhow!(
                "no public GraphQL endpoint for chain id {}; pass an endpoint explicitly",
                network
            )
        }),
    }
}
