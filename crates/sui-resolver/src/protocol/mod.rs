//! Remote resolution protocols.
//!
//! A [`NameResolver`] resolves one batch of requests into a [`ResolutionMap`].
//! Two implementations exist, chosen from configuration:
//!
//! - [`DirectResolver`]: one aliased `packageByName`/`typeByName` query per batch
//! - [`RegistryResolver`]: registry records, then metadata objects, then type layouts

mod direct;
mod registry;

pub use direct::DirectResolver;
pub use registry::{MappingData, NameMapping, RegistryResolver};

use std::sync::Arc;

use anyhow::{anyhow, Result};
use serde_json::Value;
use sui_transport::GraphQLTransport;

use crate::batch::ResolutionRequest;
use crate::resolution::ResolutionMap;

/// Resolves a batch of requests in as few round trips as the protocol allows.
#[async_trait::async_trait]
pub trait NameResolver: Send + Sync {
    async fn resolve_batch(&self, requests: &[ResolutionRequest]) -> Result<ResolutionMap>;
}

/// Run a blocking GraphQL query off the async executor.
pub(crate) async fn run_query(
    transport: &Arc<dyn GraphQLTransport>,
    query: String,
    variables: Value,
) -> Result<Value> {
    let transport = Arc::clone(transport);
    tokio::task::spawn_blocking(move || transport.query(&query, variables))
        .await
        .map_err(|e| anyhow!("GraphQL query task failed: {}", e))?
}

/// Non-null value under `alias` in a response's data object.
pub(crate) fn aliased<'a>(data: &'a Value, alias: &str) -> Option<&'a Value> {
    data.get(alias).filter(|v| !v.is_null())
}
