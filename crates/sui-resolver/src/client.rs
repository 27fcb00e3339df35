//! Batched, concurrent resolution of extracted names.

use std::sync::Arc;

use anyhow::Result;
use futures::{stream, StreamExt, TryStreamExt};
use sui_mvr_types::{normalize_address_checked, NAME_DELIMITER};
use sui_transport::GraphQLTransport;

use crate::batch::{batch_requests, DEFAULT_PAGE_SIZE};
use crate::config::{Protocol, ResolverConfig, DEFAULT_MAX_CONCURRENT_BATCHES};
use crate::error::ResolutionError;
use crate::extract::ExtractedNames;
use crate::protocol::{DirectResolver, NameResolver, RegistryResolver};
use crate::resolution::ResolutionMap;

/// Splits names into pages and resolves the pages concurrently.
#[derive(Clone)]
pub struct ResolverClient {
    resolver: Arc<dyn NameResolver>,
    page_size: usize,
    max_concurrent_batches: usize,
}

impl ResolverClient {
    pub fn new(resolver: Arc<dyn NameResolver>) -> Self {
        Self {
            resolver,
            page_size: DEFAULT_PAGE_SIZE,
            max_concurrent_batches: DEFAULT_MAX_CONCURRENT_BATCHES,
        }
    }

    /// Client for `config.protocol` over `transport`.
    ///
    /// `known` holds validated static resolutions; the registry protocol uses
    /// its package entries instead of looking those names up.
    pub fn from_config(
        config: &ResolverConfig,
        transport: Arc<dyn GraphQLTransport>,
        known: &ResolutionMap,
    ) -> Self {
        let resolver: Arc<dyn NameResolver> = match &config.protocol {
            Protocol::Direct => Arc::new(DirectResolver::new(transport)),
            Protocol::Registry(registry) => Arc::new(
                RegistryResolver::new(transport, registry.clone(), config.network.clone())
                    .with_known_packages(known),
            ),
        };
        Self::new(resolver)
            .with_page_size(config.page_size)
            .with_max_concurrent_batches(config.max_concurrent_batches)
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_max_concurrent_batches(mut self, max: usize) -> Self {
        self.max_concurrent_batches = max.max(1);
        self
    }

    /// Resolve every name; the first failing batch fails the whole call.
    pub async fn resolve(&self, names: &ExtractedNames) -> Result<ResolutionMap> {
        if names.is_empty() {
            return Ok(ResolutionMap::new());
        }

        let batches = batch_requests(names, self.page_size);
        tracing::debug!(
            packages = names.packages.len(),
            types = names.types.len(),
            batches = batches.len(),
            "resolving names"
        );

        let maps: Vec<ResolutionMap> = stream::iter(batches)
            .map(|batch| {
                let resolver = Arc::clone(&self.resolver);
                async move { resolver.resolve_batch(&batch).await }
            })
            .buffer_unordered(self.max_concurrent_batches)
            .try_collect()
            .await?;

        let mut resolved = ResolutionMap::new();
        for map in maps {
            resolved.merge(map);
        }
        Ok(resolved)
    }
}

/// Reject resolved values that would leave a symbolic name behind or that
/// are not addresses where an address is expected. Returns the map with
/// package addresses in full 64-hex form.
pub fn validate_resolution(resolved: &ResolutionMap) -> Result<ResolutionMap> {
    let mut validated = ResolutionMap::new();
    for (key, value) in resolved.iter() {
        let invalid = || ResolutionError::InvalidResolvedValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        if value.contains(NAME_DELIMITER) {
            return Err(invalid().into());
        }
        if key.contains("::") {
            validated.insert(key, value);
        } else {
            let address = normalize_address_checked(value).ok_or_else(invalid)?;
            validated.insert(key, address);
        }
    }
    Ok(validated)
}
