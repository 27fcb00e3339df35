//! GraphQL Client for Sui Network
//!
//! Blocking GraphQL client used by the name resolver. Every query goes through
//! the [`GraphQLTransport`] trait so resolvers can be driven by a recorded
//! transport in tests.
//!
//! ## Endpoints
//! - Mainnet: `https://graphql.mainnet.sui.io/graphql`
//! - Testnet: `https://graphql.testnet.sui.io/graphql`
//!
//! ## Usage
//!
//! ```ignore
//! let client = GraphQLClient::mainnet();
//! let data = client.query("query { chainIdentifier }", serde_json::Value::Null)?;
//! ```

use anyhow::{anyhow, Result};
use serde_json::Value;
use std::time::Duration;

use sui_mvr_types::env_utils::env_var_or;

use crate::network::{MAINNET_GRAPHQL, TESTNET_GRAPHQL};

/// Something that can execute a GraphQL query and hand back its `data` object.
pub trait GraphQLTransport: Send + Sync {
    /// Execute `query` with `variables`, returning the response's `data` value.
    ///
    /// GraphQL-level errors (a non-empty `errors` array) are returned as `Err`.
    fn query(&self, query: &str, variables: Value) -> Result<Value>;
}

/// GraphQL client for Sui network queries.
#[derive(Clone)]
pub struct GraphQLClient {
    endpoint: String,
    agent: ureq::Agent,
}

impl GraphQLClient {
    /// Default request timeout in seconds (can be overridden by env).
    const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Default connect timeout in seconds (can be overridden by env).
    const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

    fn default_timeouts() -> (Duration, Duration) {
        (
            Duration::from_secs(env_var_or(
                "SUI_GRAPHQL_TIMEOUT_SECS",
                Self::DEFAULT_TIMEOUT_SECS,
            )),
            Duration::from_secs(env_var_or(
                "SUI_GRAPHQL_CONNECT_TIMEOUT_SECS",
                Self::DEFAULT_CONNECT_TIMEOUT_SECS,
            )),
        )
    }

    fn build_agent(timeout: Duration, connect_timeout: Duration) -> ureq::Agent {
        ureq::AgentBuilder::new()
            .timeout(timeout)
            .timeout_connect(connect_timeout)
            .build()
    }

    /// Create a client for mainnet.
    pub fn mainnet() -> Self {
        Self::new(MAINNET_GRAPHQL)
    }

    /// Create a client for testnet.
    pub fn testnet() -> Self {
        Self::new(TESTNET_GRAPHQL)
    }

    /// Create a client with a custom endpoint.
    pub fn new(endpoint: &str) -> Self {
        let (timeout, connect_timeout) = Self::default_timeouts();
        Self::with_timeouts(endpoint, timeout, connect_timeout)
    }

    /// Create a client with explicit timeouts.
    pub fn with_timeouts(endpoint: &str, timeout: Duration, connect_timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            agent: Self::build_agent(timeout, connect_timeout),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl GraphQLTransport for GraphQLClient {
    fn query(&self, query: &str, variables: Value) -> Result<Value> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        let response: Value = self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json")
            .send_json(&body)
            .map_err(|e| anyhow!("GraphQL request failed: {}", e))?
            .into_json()
            .map_err(|e| anyhow!("Failed to parse GraphQL response: {}", e))?;

        extract_data(response)
    }
}

/// Split a raw GraphQL response into its `data` payload or its first error.
pub fn extract_data(response: Value) -> Result<Value> {
    if let Some(errors) = response.get("errors").and_then(|e| e.as_array()) {
        if let Some(first) = errors.first() {
            let msg = first
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown error");
            return Err(anyhow!("GraphQL error: {}", msg));
        }
    }

    response
        .get("data")
        .cloned()
        .filter(|d| !d.is_null())
        .ok_or_else(|| anyhow!("No data in GraphQL response"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_creation() {
        let mainnet = GraphQLClient::mainnet();
        assert!(mainnet.endpoint().contains("mainnet"));

        let testnet = GraphQLClient::testnet();
        assert!(testnet.endpoint().contains("testnet"));

        let custom = GraphQLClient::new("https://custom.endpoint");
        assert_eq!(custom.endpoint(), "https://custom.endpoint");
    }

    #[test]
    fn test_extract_data() {
        let data = extract_data(json!({ "data": { "chainIdentifier": "35834a8a" } })).unwrap();
        assert_eq!(data["chainIdentifier"], "35834a8a");
    }

    #[test]
    fn test_extract_data_surfaces_first_error() {
        let err = extract_data(json!({
            "data": null,
            "errors": [{ "message": "Unknown field" }, { "message": "second" }]
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "GraphQL error: Unknown field");

        assert!(extract_data(json!({ "data": null })).is_err());
    }

    /// Run with: cargo test -p sui-transport test_chain_identifier -- --ignored --nocapture
    #[test]
    #[ignore = "requires network access to Sui mainnet"]
    fn test_chain_identifier() {
        let client = GraphQLClient::mainnet();
        let data = client
            .query("query { chainIdentifier }", Value::Null)
            .expect("query failed");
        assert_eq!(data["chainIdentifier"], "35834a8a");
    }
}
