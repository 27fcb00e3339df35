//! Sui Transport Layer
//!
//! Network transport for Sui name resolution.
//!
//! This crate provides:
//! - [`graphql`]: blocking GraphQL client and the [`GraphQLTransport`] seam
//! - [`network`]: endpoint and chain-identifier table
//! - [`test_utils`]: a recording transport for offline tests
//!
//! # Example
//!
//! ```ignore
//! use sui_transport::{GraphQLClient, GraphQLTransport};
//!
//! let client = GraphQLClient::mainnet();
//! let data = client.query("query { chainIdentifier }", serde_json::Value::Null)?;
//! ```

pub mod graphql;
pub mod network;
pub mod test_utils;

pub use graphql::{GraphQLClient, GraphQLTransport};
