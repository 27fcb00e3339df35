//! sui-mvr: resolve symbolic Move package names in Sui transactions.
//!
//! ## Example Usage
//!
//! ```bash
//! # Which names does a transaction reference?
//! sui-mvr names tx.json
//!
//! # Resolve them against testnet through the registry protocol
//! sui-mvr resolve tx.json --network testnet --protocol registry
//!
//! # Resolve offline from a static table
//! sui-mvr resolve tx.json --overrides names.json --output resolved.json
//! ```
//!
//! Logs go to stderr (`RUST_LOG`, default `warn`); stdout carries only JSON.

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use sui_mvr_types::env_utils::env_string;
use sui_mvr_types::TransactionData;
use sui_resolver::{
    extract_names, BuildOptions, NamedPackagesPlugin, Overrides, Protocol, RegistryConfig,
    ResolverConfig, TransactionBuilder, NAMED_PACKAGES_PLUGIN_KEY,
};
use sui_transport::network::{infer_network_from_url, resolve_graphql_endpoint};

mod args;

use args::{Cli, Commands, ProtocolArg, ResolveArgs};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_transaction(path: &Path) -> Result<TransactionData> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read transaction {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse transaction {}", path.display()))
}

fn write_output(path: Option<&Path>, rendered: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, format!("{}\n", rendered))
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{}", rendered);
            Ok(())
        }
    }
}

/// Environment first, then flags on top.
fn resolver_config(args: &ResolveArgs) -> Result<ResolverConfig> {
    let mut config = ResolverConfig::from_env_with_endpoint(args.endpoint.as_deref())?;

    // Eager metadata fetch needs an unselected network, so the endpoint URL
    // is not used to pick one.
    let network = args
        .network
        .clone()
        .or_else(|| env_string("SUI_MVR_NETWORK"))
        .or_else(|| {
            if args.eager_metadata_fetch {
                return None;
            }
            args.endpoint
                .as_deref()
                .and_then(infer_network_from_url)
                .map(String::from)
        });
    if let Some(network) = network.as_deref() {
        config = config.with_network(Some(network));
    }

    config = match &args.endpoint {
        Some(endpoint) => config.with_endpoint(endpoint.clone()),
        None => config.with_endpoint(resolve_graphql_endpoint(network.as_deref())?),
    };

    if let Some(protocol) = args.protocol {
        config = config.with_protocol(match protocol {
            ProtocolArg::Direct => Protocol::Direct,
            ProtocolArg::Registry => Protocol::Registry(RegistryConfig::default()),
        });
    }
    if args.eager_metadata_fetch {
        config = config.with_eager_metadata_fetch()?;
    }
    if let Some(page_size) = args.page_size {
        config = config.with_page_size(page_size);
    }
    if let Some(path) = &args.overrides {
        config = config.with_overrides(Overrides::from_file(path)?);
    }

    config.validate()?;
    Ok(config)
}

fn names(tx_path: &Path) -> Result<()> {
    let tx = read_transaction(tx_path)?;
    let names = extract_names(&tx);
    write_output(None, &serde_json::to_string_pretty(&names)?)
}

async fn resolve(args: ResolveArgs) -> Result<()> {
    let tx = read_transaction(&args.tx)?;
    let config = resolver_config(&args)?;
    tracing::debug!(
        endpoint = %config.endpoint,
        network = ?config.network,
        page_size = config.page_size,
        "resolver configured"
    );

    let mut builder = TransactionBuilder::new(tx);
    builder.add_plugin(
        NAMED_PACKAGES_PLUGIN_KEY,
        Arc::new(NamedPackagesPlugin::new(&config)?),
    );
    let bytes = builder.build(&BuildOptions::default()).await?;

    let built: Value = serde_json::from_slice(&bytes).context("Failed to decode built transaction")?;
    write_output(args.output.as_deref(), &serde_json::to_string_pretty(&built)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let Cli { command } = Cli::parse();

    match command {
        Commands::Names { tx } => names(&tx),
        Commands::Resolve(args) => resolve(args).await,
    }
}
