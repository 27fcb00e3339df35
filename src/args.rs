use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum ProtocolArg {
    /// `packageByName` / `typeByName` queries.
    Direct,
    /// Registry records, metadata objects, then type layouts.
    Registry,
}

#[derive(Debug, Parser)]
#[command(
    name = "sui-mvr",
    author,
    version,
    about = "Resolve symbolic Move package names in Sui transactions"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the symbolic package names and types a transaction references
    Names {
        /// Transaction JSON file
        #[arg(value_name = "TX_JSON")]
        tx: PathBuf,
    },

    /// Resolve every symbolic reference and print the rewritten transaction
    Resolve(ResolveArgs),
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Transaction JSON file
    #[arg(value_name = "TX_JSON")]
    pub tx: PathBuf,

    /// Network name (`mainnet`, `testnet`) or raw chain identifier.
    /// Defaults to `SUI_MVR_NETWORK`, then to the network the endpoint points at.
    /// A raw chain identifier needs `--endpoint`.
    #[arg(long)]
    pub network: Option<String>,

    /// GraphQL endpoint (default: per network, or `SUI_MVR_GRAPHQL_ENDPOINT`).
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Resolution protocol (default: `SUI_MVR_PROTOCOL`, then direct).
    #[arg(long, value_enum)]
    pub protocol: Option<ProtocolArg>,

    /// Requests per GraphQL query.
    #[arg(long)]
    pub page_size: Option<usize>,

    /// JSON file of static `{ "packages": {..}, "types": {..} }` resolutions.
    #[arg(long, value_name = "PATH")]
    pub overrides: Option<PathBuf>,

    /// Fetch every metadata object a registry record lists.
    /// Registry protocol only, and only with no network selected.
    #[arg(long, default_value_t = false)]
    pub eager_metadata_fetch: bool,

    /// Write the rewritten transaction here instead of stdout.
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,
}
