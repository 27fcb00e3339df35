//! Build-time plugins.
//!
//! [`TransactionBuilder`] runs its registered plugins as a middleware chain:
//! each plugin receives the transaction, the build options and a [`Next`]
//! continuation, and decides when (and whether) the rest of the chain runs.
//! When the chain completes the builder checks that only concrete packages
//! and types are left and serializes the transaction.
//!
//! [`NamedPackagesPlugin`] is the plugin that resolves symbolic names.

use std::sync::Arc;

use anyhow::{Context, Result};
use sui_mvr_types::{parse_address, parse_type_tag, Command, TransactionData};
use sui_transport::{GraphQLClient, GraphQLTransport};

use crate::client::{validate_resolution, ResolverClient};
use crate::config::ResolverConfig;
use crate::error::ResolutionError;
use crate::extract::extract_names;
use crate::resolution::ResolutionMap;
use crate::rewrite::rewrite_transaction;

/// Registry key of [`NamedPackagesPlugin`].
pub const NAMED_PACKAGES_PLUGIN_KEY: &str = "namedPackagesPlugin";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Serialize only the command list, without the sender.
    pub only_transaction_kind: bool,
}

/// A step in the build chain.
#[async_trait::async_trait]
pub trait TransactionPlugin: Send + Sync {
    /// Transform `tx`, then call `next.run(tx)` to continue the build.
    async fn apply(
        &self,
        tx: &mut TransactionData,
        options: &BuildOptions,
        next: Next<'_>,
    ) -> Result<()>;
}

type PluginSlot = (String, Arc<dyn TransactionPlugin>);

/// Continuation over the plugins that have not run yet.
pub struct Next<'a> {
    plugins: &'a [PluginSlot],
    options: &'a BuildOptions,
}

impl<'a> Next<'a> {
    pub async fn run(self, tx: &mut TransactionData) -> Result<()> {
        let Some(((key, plugin), rest)) = self.plugins.split_first() else {
            return Ok(());
        };
        tracing::trace!(plugin = %key, "running build plugin");
        let next = Next {
            plugins: rest,
            options: self.options,
        };
        plugin.apply(tx, self.options, next).await
    }
}

/// Owns a transaction and the plugins applied when it is built.
#[derive(Default)]
pub struct TransactionBuilder {
    data: TransactionData,
    plugins: Vec<PluginSlot>,
}

impl TransactionBuilder {
    pub fn new(data: TransactionData) -> Self {
        Self {
            data,
            plugins: Vec::new(),
        }
    }

    pub fn data(&self) -> &TransactionData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut TransactionData {
        &mut self.data
    }

    /// Register `plugin` under `key`. A plugin already registered under the
    /// same key is replaced in place and keeps its position in the chain.
    pub fn add_plugin(&mut self, key: impl Into<String>, plugin: Arc<dyn TransactionPlugin>) {
        let key = key.into();
        match self.plugins.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = plugin,
            None => self.plugins.push((key, plugin)),
        }
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Run the plugin chain, check the result is concrete and serialize it as JSON.
    pub async fn build(&mut self, options: &BuildOptions) -> Result<Vec<u8>> {
        let next = Next {
            plugins: &self.plugins,
            options,
        };
        next.run(&mut self.data).await?;

        ensure_concrete(&self.data)?;

        if options.only_transaction_kind {
            serde_json::to_vec(&self.data.commands).context("serialize transaction kind")
        } else {
            serde_json::to_vec(&self.data).context("serialize transaction")
        }
    }
}

/// Every package must be an address and every type argument a concrete Move type.
fn ensure_concrete(tx: &TransactionData) -> Result<()> {
    let unresolved = |command: usize, reference: &str| ResolutionError::UnresolvedReference {
        command,
        reference: reference.to_string(),
    };

    for (index, command) in tx.commands.iter().enumerate() {
        match command {
            Command::MoveCall(call) => {
                if parse_address(&call.package).is_none() {
                    return Err(unresolved(index, &call.package).into());
                }
                if let Some(bad) = call
                    .type_arguments
                    .iter()
                    .find(|t| parse_type_tag(t).is_none())
                {
                    return Err(unresolved(index, bad).into());
                }
            }
            Command::MakeMoveVec {
                type_arg: Some(type_arg),
                ..
            } if parse_type_tag(type_arg).is_none() => {
                return Err(unresolved(index, type_arg).into());
            }
            _ => {}
        }
    }
    Ok(())
}

/// Resolves symbolic names before the rest of the build runs.
pub struct NamedPackagesPlugin {
    client: ResolverClient,
    overrides: ResolutionMap,
}

impl NamedPackagesPlugin {
    /// Plugin talking to `config.endpoint` over HTTP.
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        let transport: Arc<dyn GraphQLTransport> = Arc::new(GraphQLClient::new(&config.endpoint));
        Self::with_transport(config, transport)
    }

    pub fn with_transport(
        config: &ResolverConfig,
        transport: Arc<dyn GraphQLTransport>,
    ) -> Result<Self> {
        config.validate()?;
        let overrides = validate_resolution(&config.overrides.to_resolution_map())
            .inspect_err(|e| tracing::warn!(error = %e, "rejected resolution overrides"))?;
        if !config.overrides.is_empty() {
            tracing::debug!(entries = overrides.len(), "loaded resolution overrides");
        }
        Ok(Self {
            client: ResolverClient::from_config(config, transport, &overrides),
            overrides,
        })
    }

    /// Resolve and rewrite every symbolic reference in `tx`, returning the map used.
    ///
    /// Overridden names are never sent to the resolver. On failure `tx` is untouched.
    pub async fn resolve(&self, tx: &mut TransactionData) -> Result<ResolutionMap> {
        let mut names = extract_names(tx);
        if names.is_empty() {
            return Ok(ResolutionMap::new());
        }

        names.packages.retain(|name| !self.overrides.contains(name));
        names.types.retain(|type_name| !self.overrides.contains(type_name));

        let remote = self.client.resolve(&names).await?;
        let mut resolved = validate_resolution(&remote)?;
        resolved.merge(self.overrides.clone());

        rewrite_transaction(tx, &resolved)?;
        Ok(resolved)
    }
}

#[async_trait::async_trait]
impl TransactionPlugin for NamedPackagesPlugin {
    async fn apply(
        &self,
        tx: &mut TransactionData,
        options: &BuildOptions,
        next: Next<'_>,
    ) -> Result<()> {
        let resolved = self.resolve(tx).await?;
        tracing::debug!(
            entries = resolved.len(),
            only_transaction_kind = options.only_transaction_kind,
            "named packages resolved"
        );
        next.run(tx).await
    }
}
