//! Shared types for the sui-mvr workspace.
//!
//! - [`transaction`]: the PTB data model the resolver rewrites in place
//! - [`name`]: parsed `<app>@<org>[/<version>]` symbolic names
//! - [`address`]: address normalization
//! - [`type_parsing`]: concrete Move type string parsing
//! - [`env_utils`]: environment variable helpers

pub mod address;
pub mod env_utils;
pub mod name;
pub mod transaction;
pub mod type_parsing;

pub use address::{normalize_address, normalize_address_checked, parse_address};
pub use name::{has_symbolic_name, SymbolicName, NAME_DELIMITER};
pub use transaction::{Argument, Command, MoveCall, TransactionData};
pub use type_parsing::{parse_type_tag, split_type_params};
