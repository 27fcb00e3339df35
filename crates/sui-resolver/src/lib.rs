//! Sui Resolver
//!
//! Symbolic package name resolution for Sui transactions.
//!
//! This crate provides:
//! - [`extract`]: find `<app>@<org>` names in move-call targets and type arguments
//! - [`batch`]: split the names into indexed, paged resolution requests
//! - [`protocol`]: resolve a page over GraphQL (direct or registry + layout)
//! - [`client`]: run pages concurrently and merge the results
//! - [`rewrite`]: substitute resolved values back into the transaction
//! - [`plugin`]: the build-time plugin chain and the name-resolution plugin
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sui_resolver::{BuildOptions, NamedPackagesPlugin, ResolverConfig, TransactionBuilder};
//!
//! let mut builder = TransactionBuilder::new(tx);
//! builder.add_plugin(
//!     sui_resolver::NAMED_PACKAGES_PLUGIN_KEY,
//!     Arc::new(NamedPackagesPlugin::new(&ResolverConfig::mainnet())?),
//! );
//! let bytes = builder.build(&BuildOptions::default()).await?;
//! ```

pub mod batch;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod plugin;
pub mod protocol;
pub mod resolution;
pub mod rewrite;

pub use batch::{batch_requests, build_requests, RequestKind, ResolutionRequest};
pub use client::{validate_resolution, ResolverClient};
pub use config::{Overrides, Protocol, RegistryConfig, ResolverConfig};
pub use error::{resolution_error, ResolutionError};
pub use extract::{extract_names, ExtractedNames};
pub use plugin::{
    BuildOptions, NamedPackagesPlugin, Next, TransactionBuilder, TransactionPlugin,
    NAMED_PACKAGES_PLUGIN_KEY,
};
pub use protocol::{DirectResolver, NameResolver, RegistryResolver};
pub use resolution::ResolutionMap;
pub use rewrite::rewrite_transaction;
